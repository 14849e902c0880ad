//! Facade over the recommender and the favorites store.
//!
//! One `Session` per running app. It owns both halves and is the only
//! surface the presentation layer talks to.

use tokio::sync::Mutex;

use erabu_api::traits::{AnimeCatalog, MovieCatalog};

use crate::error::RecommendError;
use crate::favorites::{FavoriteEntry, FavoritesStore};
use crate::filters::FilterSet;
use crate::models::Recommendation;
use crate::recommend::{RecommendState, Recommender};

pub struct Session<M, A> {
    recommender: Recommender<M, A>,
    favorites: Mutex<FavoritesStore>,
}

impl<M, A> Session<M, A>
where
    M: MovieCatalog,
    A: AnimeCatalog,
{
    pub fn new(movies: M, anime: A, favorites: FavoritesStore) -> Self {
        Self {
            recommender: Recommender::new(movies, anime),
            favorites: Mutex::new(favorites),
        }
    }

    pub async fn get_recommendation(
        &self,
        filters: &FilterSet,
    ) -> Result<Recommendation, RecommendError> {
        self.recommender.get_recommendation(filters).await
    }

    pub async fn state(&self) -> RecommendState {
        self.recommender.state().await
    }

    /// Toggle the recommendation in the favorites list. Returns true
    /// when it ended up favorited.
    pub async fn toggle_favorite(&self, rec: &Recommendation) -> bool {
        self.favorites.lock().await.toggle(rec)
    }

    pub async fn is_favorite(&self, rec: &Recommendation) -> bool {
        self.favorites.lock().await.is_favorite(rec)
    }

    pub async fn favorites(&self) -> Vec<FavoriteEntry> {
        self.favorites.lock().await.list().to_vec()
    }

    pub async fn clear_favorites(&self) {
        self.favorites.lock().await.clear();
    }

    /// Wipe everything: favorites, published state, and sampling
    /// cursors.
    pub async fn reset_all(&self) {
        self.favorites.lock().await.clear();
        self.recommender.reset().await;
    }
}
