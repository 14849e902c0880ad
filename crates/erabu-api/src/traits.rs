//! Trait definitions for the two content catalogs.
//!
//! The recommendation workflow is generic over these traits, allowing
//! it to be exercised against in-memory stub catalogs in tests.

use std::future::Future;

use crate::jikan::types::{AnimeData, AnimeQuery};
use crate::tmdb::types::{MovieDetails, MovieListItem};

/// A paginated, filterable movie catalog.
pub trait MovieCatalog: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch one page of movies matching a genre and minimum score,
    /// sorted by descending popularity. An empty page is a valid
    /// result, not an error.
    fn discover(
        &self,
        genre_id: u32,
        min_score: f32,
        page: u32,
    ) -> impl Future<Output = Result<Vec<MovieListItem>, Self::Error>> + Send;

    /// Fetch the full detail record for a movie.
    fn movie_details(
        &self,
        movie_id: u64,
    ) -> impl Future<Output = Result<MovieDetails, Self::Error>> + Send;
}

/// A paginated, filterable anime catalog.
pub trait AnimeCatalog: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch one page of anime matching the query, sorted by
    /// descending popularity. Unset query fields are not sent
    /// upstream.
    fn list_anime(
        &self,
        query: &AnimeQuery,
        page: u32,
    ) -> impl Future<Output = Result<Vec<AnimeData>, Self::Error>> + Send;

    /// Fetch the full record for a single anime.
    fn anime_details(
        &self,
        mal_id: u64,
    ) -> impl Future<Output = Result<AnimeData, Self::Error>> + Send;
}
