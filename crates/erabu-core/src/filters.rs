//! User-selected filters narrowing a catalog query.

use erabu_api::jikan::types::{AgeRating, AnimeQuery};

use crate::models::ContentKind;

/// Minimum score applied to movie discovery when the user picked none.
pub const DEFAULT_MOVIE_MIN_SCORE: f32 = 6.0;

/// The set of constraints for one recommendation request.
///
/// Immutable per request. Mood only applies to movies and is never
/// sent upstream; it is echoed into the normalized result for
/// display. For movies, genre and mood must be selected before a
/// fetch is issued; anime filters are all optional.
#[derive(Debug, Clone)]
pub struct FilterSet {
    pub kind: ContentKind,
    pub genre: Option<u32>,
    pub mood: Option<String>,
    pub age_rating: Option<AgeRating>,
    pub min_score: Option<f32>,
}

impl FilterSet {
    pub fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            genre: None,
            mood: None,
            age_rating: None,
            min_score: None,
        }
    }

    pub fn movies() -> Self {
        Self::new(ContentKind::Movie)
    }

    pub fn anime() -> Self {
        Self::new(ContentKind::Anime)
    }

    /// The mood selection, with an empty string treated as unset.
    pub fn mood(&self) -> Option<&str> {
        self.mood.as_deref().filter(|m| !m.is_empty())
    }

    /// Key identifying the movie filter selection. When it changes
    /// between requests, the discover page cursor restarts at 1.
    pub(crate) fn movie_key(&self) -> MovieFilterKey {
        MovieFilterKey {
            genre: self.genre,
            mood: self.mood().map(str::to_string),
            min_score: self.min_score.map(f32::to_bits),
        }
    }

    /// The upstream anime query. Doubles as the list-cache key: a
    /// cached page is reused only while genre, age rating, and
    /// minimum score are all unchanged.
    pub fn anime_query(&self) -> AnimeQuery {
        AnimeQuery {
            genre_id: self.genre,
            rating: self.age_rating,
            min_score: self.min_score,
        }
    }
}

/// Movie filter selection, comparable across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MovieFilterKey {
    genre: Option<u32>,
    mood: Option<String>,
    min_score: Option<u32>,
}
