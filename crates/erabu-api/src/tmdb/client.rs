use reqwest::Client;

use super::error::TmdbError;
use super::types::{DiscoverResponse, MovieDetails};
use crate::traits::MovieCatalog;

const BASE_URL: &str = "https://api.themoviedb.org/3";

/// Base URL for building absolute poster URLs from TMDB poster paths.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// TMDB v3 client.
///
/// All requests carry the API key as a query parameter and ask for
/// `en-US` content. TMDB publishes no hard rate limit, so no pacing
/// is applied here.
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl TmdbClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    /// Build a client against a non-default base URL (used in tests).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    /// Check the HTTP response for errors and return the body text on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, TmdbError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "TMDB API error");
            Err(TmdbError::Api {
                status,
                message: body,
            })
        }
    }
}

impl MovieCatalog for TmdbClient {
    type Error = TmdbError;

    async fn discover(
        &self,
        genre_id: u32,
        min_score: f32,
        page: u32,
    ) -> Result<Vec<super::types::MovieListItem>, TmdbError> {
        tracing::debug!(genre_id, min_score, page, "discovering movies");

        let resp = self
            .http
            .get(format!("{}/discover/movie", self.base_url))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("with_genres", &genre_id.to_string()),
                ("page", &page.to_string()),
                ("vote_average.gte", &min_score.to_string()),
                ("language", "en-US"),
                ("sort_by", "popularity.desc"),
            ])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let body: DiscoverResponse = resp
            .json()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))?;

        Ok(body.results)
    }

    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails, TmdbError> {
        tracing::debug!(movie_id, "fetching movie details");

        let resp = self
            .http
            .get(format!("{}/movie/{movie_id}", self.base_url))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", "en-US"),
            ])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))
    }
}
