//! Normalized result model.
//!
//! Upstream catalog shapes are heterogeneous; the workflow flattens
//! them into [`Recommendation`], an explicitly tagged enum, so
//! downstream code never has to probe for a field to tell a movie
//! from an anime.

use serde::{Deserialize, Serialize};

use erabu_api::jikan::types::AnimeData;
use erabu_api::tmdb::types::MovieDetails;
use erabu_api::tmdb::IMAGE_BASE_URL;

/// A movie is a hidden gem when few people rated it but those who did
/// rated it highly.
const HIDDEN_GEM_MAX_VOTES: u64 = 1000;
const HIDDEN_GEM_MIN_RATING: f64 = 7.0;

/// Which catalog a piece of content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Anime,
}

impl ContentKind {
    /// Plural label used in user-facing messages ("No movies found…").
    pub fn plural_label(self) -> &'static str {
        match self {
            Self::Movie => "movies",
            Self::Anime => "anime",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Movie => write!(f, "movie"),
            Self::Anime => write!(f, "anime"),
        }
    }
}

/// A normalized recommendation, tagged by content kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Recommendation {
    Movie(MovieSuggestion),
    Anime(AnimeSuggestion),
}

impl Recommendation {
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Movie(_) => ContentKind::Movie,
            Self::Anime(_) => ContentKind::Anime,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Movie(m) => &m.title,
            Self::Anime(a) => &a.title,
        }
    }
}

/// A movie suggestion normalized from TMDB detail data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSuggestion {
    pub title: String,
    /// Primary genre name from the detail record.
    pub genre: String,
    /// The mood the user filtered on, echoed back for display; never
    /// sent upstream.
    pub mood: String,
    pub hidden_gem: bool,
    /// Vote average on the 0-10 scale.
    pub rating: f64,
    pub poster: Option<String>,
    pub plot: Option<String>,
    /// Release year, taken from the leading segment of the release
    /// date string.
    pub year: Option<String>,
}

impl MovieSuggestion {
    pub fn from_details(details: &MovieDetails, mood: &str) -> Self {
        let genre = details
            .genres
            .first()
            .map(|g| g.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        let year = details
            .release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
            .map(str::to_string);

        let poster = details
            .poster_path
            .as_deref()
            .map(|path| format!("{IMAGE_BASE_URL}{path}"));

        Self {
            title: details.title.clone(),
            genre,
            mood: mood.to_string(),
            hidden_gem: details.vote_count < HIDDEN_GEM_MAX_VOTES
                && details.vote_average >= HIDDEN_GEM_MIN_RATING,
            rating: details.vote_average,
            poster,
            plot: details.overview.clone(),
            year,
        }
    }
}

/// An anime suggestion normalized from a Jikan record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeSuggestion {
    pub mal_id: u64,
    pub title: String,
    pub synopsis: Option<String>,
    pub image: Option<String>,
    /// MAL community score on the 0-10 scale.
    pub score: Option<f64>,
    pub episodes: Option<u32>,
    pub genres: Vec<String>,
    /// Age-rating string as MAL reports it.
    pub age_rating: Option<String>,
    /// Link back to the MAL page.
    pub url: String,
}

impl From<AnimeData> for AnimeSuggestion {
    fn from(data: AnimeData) -> Self {
        let image = data.image_url().map(str::to_string);
        Self {
            mal_id: data.mal_id,
            title: data.title,
            synopsis: data.synopsis,
            image,
            score: data.score,
            episodes: data.episodes,
            genres: data.genres.into_iter().map(|g| g.name).collect(),
            age_rating: data.rating,
            url: data.url,
        }
    }
}
