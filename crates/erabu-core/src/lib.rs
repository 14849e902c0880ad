//! Core domain for erabu: filter model, recommendation workflow,
//! favorites store, and configuration.
//!
//! The workflow is generic over the catalog traits in `erabu-api`, so
//! everything here runs against stub catalogs in tests and against
//! TMDB/Jikan in the binary.

pub mod config;
pub mod error;
pub mod favorites;
pub mod filters;
pub mod models;
pub mod recommend;
pub mod session;

pub use config::{AppConfig, ConfigError};
pub use error::RecommendError;
pub use favorites::{FavoriteEntry, FavoritesStore};
pub use filters::FilterSet;
pub use models::{AnimeSuggestion, ContentKind, MovieSuggestion, Recommendation};
pub use recommend::{RecommendState, Recommender};
pub use session::Session;
