//! Catalog clients for the erabu recommendation picker.
//!
//! Two external catalogs are wrapped here: TMDB for movies and Jikan
//! (MyAnimeList) for anime. The `traits` module defines the
//! service-agnostic interfaces the recommendation workflow is written
//! against, so it can run over stub catalogs in tests.

pub mod jikan;
pub mod tmdb;
pub mod traits;
