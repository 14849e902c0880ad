//! The recommendation workflow.
//!
//! One user action — "get a recommendation" — drives the whole
//! pipeline: validate filters, acquire a candidate list, pick one
//! uniformly at random, fetch its details, normalize, publish.
//!
//! Movies and anime sample their candidate pools differently. Movie
//! requests always hit the catalog at the current page cursor, and
//! the cursor advances after every successful fetch so repeated
//! requests sample fresh upstream pages. Anime requests reuse a
//! cached list page while the filter key is unchanged.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use tokio::sync::{Mutex, RwLock};

use erabu_api::jikan::types::{AnimeData, AnimeQuery};
use erabu_api::traits::{AnimeCatalog, MovieCatalog};

use crate::error::RecommendError;
use crate::filters::{FilterSet, MovieFilterKey, DEFAULT_MOVIE_MIN_SCORE};
use crate::models::{AnimeSuggestion, ContentKind, MovieSuggestion, Recommendation};

/// State published to the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct RecommendState {
    /// The latest successful suggestion. A failed request leaves the
    /// previous suggestion in place.
    pub suggestion: Option<Recommendation>,
    /// Human-readable message for the latest failure, cleared on the
    /// next success.
    pub error: Option<String>,
    pub loading: bool,
}

/// Mutable sampling state behind one lock.
#[derive(Debug, Default)]
struct Cursor {
    /// Filter selection the page cursor belongs to.
    movie_key: Option<MovieFilterKey>,
    movie_page: u32,
    /// Last fetched anime list page, keyed by the query it answered.
    anime_cache: Option<(AnimeQuery, Vec<AnimeData>)>,
}

/// Orchestrates the two catalogs into normalized recommendations.
pub struct Recommender<M, A> {
    movies: M,
    anime: A,
    cursor: Mutex<Cursor>,
    state: RwLock<RecommendState>,
    /// Request-generation counter. A completion only publishes if it
    /// is still the newest generation; stale completions are dropped
    /// so overlapping requests cannot clobber newer results.
    generation: AtomicU64,
}

impl<M, A> Recommender<M, A>
where
    M: MovieCatalog,
    A: AnimeCatalog,
{
    pub fn new(movies: M, anime: A) -> Self {
        Self {
            movies,
            anime,
            cursor: Mutex::new(Cursor::default()),
            state: RwLock::new(RecommendState::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the published state.
    pub async fn state(&self) -> RecommendState {
        self.state.read().await.clone()
    }

    /// Run the full pipeline for one request and publish the outcome.
    ///
    /// Errors are also returned to the caller; the published state
    /// carries their Display form.
    pub async fn get_recommendation(
        &self,
        filters: &FilterSet,
    ) -> Result<Recommendation, RecommendError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.state.write().await;
            state.loading = true;
        }

        let result = match filters.kind {
            ContentKind::Movie => self.recommend_movie(filters).await,
            ContentKind::Anime => self.recommend_anime(filters).await,
        };

        self.publish(generation, &result).await;
        result
    }

    /// Forget the page cursor, the anime cache, and the published
    /// state.
    pub async fn reset(&self) {
        *self.cursor.lock().await = Cursor::default();
        *self.state.write().await = RecommendState::default();
    }

    async fn publish(&self, generation: u64, result: &Result<Recommendation, RecommendError>) {
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "discarding stale recommendation");
            return;
        }

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(rec) => {
                tracing::info!(kind = %rec.kind(), title = rec.title(), "publishing suggestion");
                state.suggestion = Some(rec.clone());
                state.error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "recommendation failed");
                state.error = Some(err.to_string());
            }
        }
    }

    async fn recommend_movie(&self, filters: &FilterSet) -> Result<Recommendation, RecommendError> {
        let (Some(genre_id), Some(mood)) = (filters.genre, filters.mood()) else {
            return Err(RecommendError::MissingFilters);
        };
        let min_score = filters.min_score.unwrap_or(DEFAULT_MOVIE_MIN_SCORE);

        let page = {
            let mut cursor = self.cursor.lock().await;
            let key = filters.movie_key();
            if cursor.movie_key.as_ref() != Some(&key) {
                cursor.movie_key = Some(key);
                cursor.movie_page = 1;
            }
            cursor.movie_page
        };

        let candidates = self
            .movies
            .discover(genre_id, min_score, page)
            .await
            .map_err(RecommendError::upstream)?;

        if candidates.is_empty() {
            return Err(RecommendError::NoMatches(ContentKind::Movie.plural_label()));
        }

        let picked = &candidates[pick_index(candidates.len(), &mut rand::rng())];
        let details = self
            .movies
            .movie_details(picked.id)
            .await
            .map_err(RecommendError::upstream)?;

        // Advance only after the whole pipeline succeeded; a failed
        // detail fetch retries the same page on the next request.
        self.cursor.lock().await.movie_page = page + 1;

        Ok(Recommendation::Movie(MovieSuggestion::from_details(
            &details, mood,
        )))
    }

    async fn recommend_anime(&self, filters: &FilterSet) -> Result<Recommendation, RecommendError> {
        let query = filters.anime_query();

        let cached = {
            let cursor = self.cursor.lock().await;
            cursor
                .anime_cache
                .as_ref()
                .filter(|(key, _)| *key == query)
                .map(|(_, list)| list.clone())
        };

        let candidates = match cached {
            Some(list) => list,
            None => {
                let list = self
                    .anime
                    .list_anime(&query, 1)
                    .await
                    .map_err(RecommendError::upstream)?;
                if !list.is_empty() {
                    let mut cursor = self.cursor.lock().await;
                    cursor.anime_cache = Some((query.clone(), list.clone()));
                }
                list
            }
        };

        if candidates.is_empty() {
            return Err(RecommendError::NoMatches(ContentKind::Anime.plural_label()));
        }

        let picked = &candidates[pick_index(candidates.len(), &mut rand::rng())];
        let details = self
            .anime
            .anime_details(picked.mal_id)
            .await
            .map_err(RecommendError::upstream)?;

        Ok(Recommendation::Anime(AnimeSuggestion::from(details)))
    }
}

/// Uniform random index into a non-empty candidate list.
fn pick_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> usize {
    debug_assert!(len > 0);
    rng.random_range(0..len)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use erabu_api::jikan::types::MalEntity;
    use erabu_api::jikan::JikanError;
    use erabu_api::tmdb::types::{Genre, MovieDetails, MovieListItem};
    use erabu_api::tmdb::TmdbError;

    use super::*;

    fn movie_item(id: u64) -> MovieListItem {
        MovieListItem {
            id,
            title: format!("movie-{id}"),
            overview: None,
            release_date: None,
            vote_average: 7.5,
            poster_path: None,
            genre_ids: vec![28],
        }
    }

    fn movie_details(id: u64) -> MovieDetails {
        MovieDetails {
            id,
            title: "X".into(),
            overview: Some("...".into()),
            release_date: Some("2020-05-01".into()),
            vote_average: 8.1,
            vote_count: 500,
            poster_path: Some("/p.jpg".into()),
            genres: vec![Genre {
                id: 28,
                name: "Action".into(),
            }],
        }
    }

    fn anime_item(mal_id: u64) -> AnimeData {
        AnimeData {
            mal_id,
            url: format!("https://myanimelist.net/anime/{mal_id}"),
            images: None,
            title: format!("anime-{mal_id}"),
            title_japanese: None,
            synopsis: Some("story".into()),
            rating: Some("PG-13".into()),
            episodes: Some(12),
            score: Some(8.4),
            genres: vec![MalEntity {
                mal_id: 1,
                name: "Action".into(),
            }],
            status: None,
        }
    }

    /// Movie catalog stub recording every discover call.
    #[derive(Default)]
    struct StubMovies {
        pages: Vec<Vec<MovieListItem>>,
        calls: StdMutex<Vec<u32>>,
        detail_delay: Option<Duration>,
        /// Fail this many detail fetches before succeeding.
        detail_failures: AtomicU32,
    }

    impl StubMovies {
        fn single_page(items: Vec<MovieListItem>) -> Self {
            Self {
                pages: vec![items],
                ..Default::default()
            }
        }

        fn pages_requested(&self) -> Vec<u32> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl MovieCatalog for StubMovies {
        type Error = TmdbError;

        async fn discover(
            &self,
            _genre_id: u32,
            _min_score: f32,
            page: u32,
        ) -> Result<Vec<MovieListItem>, TmdbError> {
            self.calls.lock().unwrap().push(page);
            Ok(self.pages.first().cloned().unwrap_or_default())
        }

        async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails, TmdbError> {
            if let Some(delay) = self.detail_delay {
                tokio::time::sleep(delay).await;
            }
            if self
                .detail_failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(TmdbError::Api {
                    status: 500,
                    message: String::new(),
                });
            }
            let mut details = movie_details(movie_id);
            details.title = format!("movie-{movie_id}");
            Ok(details)
        }
    }

    /// Anime catalog stub counting list fetches.
    struct StubAnime {
        list: Vec<AnimeData>,
        list_calls: AtomicU32,
    }

    impl StubAnime {
        fn new(list: Vec<AnimeData>) -> Self {
            Self {
                list,
                list_calls: AtomicU32::new(0),
            }
        }
    }

    impl AnimeCatalog for StubAnime {
        type Error = JikanError;

        async fn list_anime(
            &self,
            _query: &AnimeQuery,
            _page: u32,
        ) -> Result<Vec<AnimeData>, JikanError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.list.clone())
        }

        async fn anime_details(&self, mal_id: u64) -> Result<AnimeData, JikanError> {
            Ok(anime_item(mal_id))
        }
    }

    fn movie_filters() -> FilterSet {
        let mut filters = FilterSet::movies();
        filters.genre = Some(28);
        filters.mood = Some("Action".into());
        filters.min_score = Some(7.0);
        filters
    }

    #[tokio::test]
    async fn movie_request_without_mood_issues_no_network_call() {
        let movies = StubMovies::single_page(vec![movie_item(1)]);
        let rec = Recommender::new(movies, StubAnime::new(vec![]));

        let mut filters = movie_filters();
        filters.mood = None;

        let err = rec.get_recommendation(&filters).await.unwrap_err();
        assert!(matches!(err, RecommendError::MissingFilters));
        assert_eq!(err.to_string(), "Please select both mood and genre!");
        assert!(rec.movies.pages_requested().is_empty());

        // Empty-string mood behaves the same as a missing one.
        let mut filters = movie_filters();
        filters.mood = Some(String::new());
        let err = rec.get_recommendation(&filters).await.unwrap_err();
        assert!(matches!(err, RecommendError::MissingFilters));
        assert!(rec.movies.pages_requested().is_empty());
    }

    #[tokio::test]
    async fn empty_discover_page_publishes_exact_message() {
        let rec = Recommender::new(StubMovies::single_page(vec![]), StubAnime::new(vec![]));

        let err = rec.get_recommendation(&movie_filters()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "No movies found with these criteria. Try different filters!"
        );

        let state = rec.state().await;
        assert_eq!(state.error.as_deref(), Some(err.to_string().as_str()));
        assert!(state.suggestion.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn empty_anime_list_publishes_exact_message() {
        let rec = Recommender::new(StubMovies::default(), StubAnime::new(vec![]));

        let mut filters = FilterSet::anime();
        filters.genre = Some(1);

        let err = rec.get_recommendation(&filters).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "No anime found with these criteria. Try different filters!"
        );
    }

    #[tokio::test]
    async fn movie_end_to_end_normalization() {
        let rec = Recommender::new(
            StubMovies::single_page(vec![movie_item(1)]),
            StubAnime::new(vec![]),
        );

        let result = rec.get_recommendation(&movie_filters()).await.unwrap();
        let Recommendation::Movie(m) = result else {
            panic!("expected a movie");
        };
        assert_eq!(m.genre, "Action");
        assert_eq!(m.mood, "Action");
        assert!(m.hidden_gem);
        assert_eq!(m.rating, 8.1);
        assert_eq!(m.year.as_deref(), Some("2020"));
        assert_eq!(
            m.poster.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/p.jpg")
        );

        let state = rec.state().await;
        assert!(state.suggestion.is_some());
        assert!(state.error.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn failure_leaves_previous_suggestion_in_place() {
        let rec = Recommender::new(
            StubMovies::single_page(vec![movie_item(1)]),
            StubAnime::new(vec![]),
        );

        rec.get_recommendation(&movie_filters()).await.unwrap();

        let mut missing = movie_filters();
        missing.genre = None;
        rec.get_recommendation(&missing).await.unwrap_err();

        let state = rec.state().await;
        assert!(state.suggestion.is_some());
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn movie_page_cursor_advances_and_resets_on_filter_change() {
        let rec = Recommender::new(
            StubMovies::single_page(vec![movie_item(1)]),
            StubAnime::new(vec![]),
        );
        let filters = movie_filters();

        rec.get_recommendation(&filters).await.unwrap();
        rec.get_recommendation(&filters).await.unwrap();
        assert_eq!(rec.movies.pages_requested(), vec![1, 2]);

        let mut changed = filters.clone();
        changed.genre = Some(35);
        rec.get_recommendation(&changed).await.unwrap();
        assert_eq!(rec.movies.pages_requested(), vec![1, 2, 1]);
    }

    #[tokio::test]
    async fn failed_detail_fetch_retries_the_same_page() {
        let movies = StubMovies {
            pages: vec![vec![movie_item(1)]],
            detail_failures: AtomicU32::new(1),
            ..Default::default()
        };
        let rec = Recommender::new(movies, StubAnime::new(vec![]));
        let filters = movie_filters();

        let err = rec.get_recommendation(&filters).await.unwrap_err();
        assert!(matches!(err, RecommendError::Upstream(_)));

        // The cursor did not advance past the failed request.
        rec.get_recommendation(&filters).await.unwrap();
        rec.get_recommendation(&filters).await.unwrap();
        assert_eq!(rec.movies.pages_requested(), vec![1, 1, 2]);
    }

    #[tokio::test]
    async fn anime_list_is_cached_until_filters_change() {
        let rec = Recommender::new(
            StubMovies::default(),
            StubAnime::new(vec![anime_item(1), anime_item(2)]),
        );

        let mut filters = FilterSet::anime();
        filters.genre = Some(1);
        filters.min_score = Some(8.0);

        rec.get_recommendation(&filters).await.unwrap();
        rec.get_recommendation(&filters).await.unwrap();
        assert_eq!(rec.anime.list_calls.load(Ordering::SeqCst), 1);

        // Each of genre, rating, and score invalidates the cache.
        filters.genre = Some(4);
        rec.get_recommendation(&filters).await.unwrap();
        assert_eq!(rec.anime.list_calls.load(Ordering::SeqCst), 2);

        filters.age_rating = Some("pg13".parse().unwrap());
        rec.get_recommendation(&filters).await.unwrap();
        assert_eq!(rec.anime.list_calls.load(Ordering::SeqCst), 3);

        filters.min_score = Some(9.0);
        rec.get_recommendation(&filters).await.unwrap();
        assert_eq!(rec.anime.list_calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn reset_clears_cursor_cache_and_state() {
        let rec = Recommender::new(
            StubMovies::single_page(vec![movie_item(1)]),
            StubAnime::new(vec![anime_item(1)]),
        );

        rec.get_recommendation(&movie_filters()).await.unwrap();
        rec.reset().await;

        let state = rec.state().await;
        assert!(state.suggestion.is_none());
        assert!(state.error.is_none());

        // Cursor restarted: the next request asks for page 1 again.
        rec.get_recommendation(&movie_filters()).await.unwrap();
        assert_eq!(rec.movies.pages_requested(), vec![1, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_completion_does_not_overwrite_newer_result() {
        use std::sync::Arc;

        let slow = StubMovies {
            pages: vec![vec![movie_item(1)]],
            detail_delay: Some(Duration::from_millis(5000)),
            ..Default::default()
        };
        let rec = Arc::new(Recommender::new(slow, StubAnime::new(vec![anime_item(7)])));

        // First request stalls in its detail fetch; the second (anime)
        // request completes immediately and must win.
        let first = tokio::spawn({
            let rec = rec.clone();
            async move { rec.get_recommendation(&movie_filters()).await }
        });
        tokio::task::yield_now().await;

        let mut anime_filters = FilterSet::anime();
        anime_filters.genre = Some(1);
        rec.get_recommendation(&anime_filters).await.unwrap();

        first.await.unwrap().unwrap();

        let state = rec.state().await;
        match state.suggestion {
            Some(Recommendation::Anime(ref a)) => assert_eq!(a.mal_id, 7),
            other => panic!("stale movie result overwrote anime suggestion: {other:?}"),
        }
    }

    #[test]
    fn pick_index_stays_in_bounds_and_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(42);
        let len = 5;
        let trials = 10_000;
        let mut counts = vec![0u32; len];

        for _ in 0..trials {
            let idx = pick_index(len, &mut rng);
            assert!(idx < len);
            counts[idx] += 1;
        }

        // Expected 2000 per bucket; allow 20% slack.
        for count in counts {
            assert!((1600..=2400).contains(&count), "skewed bucket: {count}");
        }
    }
}
