//! Jikan API v4 response types.

use serde::{Deserialize, Serialize};

/// Data wrapper around every Jikan response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Narrowing parameters for an anime list query.
///
/// Unset fields are omitted from the upstream request entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimeQuery {
    pub genre_id: Option<u32>,
    pub rating: Option<AgeRating>,
    pub min_score: Option<f32>,
}

/// MAL age-rating buckets accepted by the `rating` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeRating {
    G,
    Pg,
    Pg13,
    R17,
}

impl AgeRating {
    pub fn as_query_str(self) -> &'static str {
        match self {
            Self::G => "g",
            Self::Pg => "pg",
            Self::Pg13 => "pg13",
            Self::R17 => "r17",
        }
    }
}

impl std::str::FromStr for AgeRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "g" => Ok(Self::G),
            "pg" => Ok(Self::Pg),
            "pg13" => Ok(Self::Pg13),
            "r17" => Ok(Self::R17),
            other => Err(format!("unknown age rating: {other}")),
        }
    }
}

/// An anime record as returned by both the list and detail endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeData {
    pub mal_id: u64,
    pub url: String,
    #[serde(default)]
    pub images: Option<AnimeImages>,
    pub title: String,
    #[serde(default)]
    pub title_japanese: Option<String>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub genres: Vec<MalEntity>,
    #[serde(default)]
    pub status: Option<String>,
}

impl AnimeData {
    /// The standard-size JPG cover, if the record carries one.
    pub fn image_url(&self) -> Option<&str> {
        self.images
            .as_ref()
            .and_then(|i| i.jpg.image_url.as_deref())
    }
}

/// Image variants for an anime record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeImages {
    pub jpg: ImageSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSet {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub large_image_url: Option<String>,
}

/// MAL entity (genre, theme, demographic).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MalEntity {
    pub mal_id: u64,
    pub name: String,
}
