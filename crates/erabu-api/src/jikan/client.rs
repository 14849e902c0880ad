use std::time::Duration;

use reqwest::Client;

use super::error::JikanError;
use super::pacer::RequestPacer;
use super::types::{AnimeData, AnimeQuery, DataResponse};
use crate::traits::AnimeCatalog;

const BASE_URL: &str = "https://api.jikan.moe/v4";

/// Minimum spacing between requests; Jikan allows 1 request/second.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(1000);

/// Fixed page size for list queries.
const PAGE_LIMIT: u32 = 25;

/// Jikan API v4 client.
///
/// Every request passes through the owned [`RequestPacer`] first, so
/// anime calls are serialized at one per second regardless of which
/// endpoint they hit. No key is required, and failed requests are not
/// retried.
pub struct JikanClient {
    base_url: String,
    http: Client,
    pacer: RequestPacer,
}

impl JikanClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL.to_string())
    }

    /// Build a client against a non-default base URL (used in tests).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url,
            http: Client::new(),
            pacer: RequestPacer::new(MIN_REQUEST_INTERVAL),
        }
    }

    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, JikanError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "Jikan API error");
            Err(JikanError::Api {
                status,
                message: body,
            })
        }
    }
}

impl Default for JikanClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimeCatalog for JikanClient {
    type Error = JikanError;

    async fn list_anime(&self, query: &AnimeQuery, page: u32) -> Result<Vec<AnimeData>, JikanError> {
        self.pacer.acquire().await;
        tracing::debug!(?query, page, "listing anime");

        let mut params: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("limit", PAGE_LIMIT.to_string()),
            ("order_by", "popularity".into()),
            ("sort", "desc".into()),
        ];
        if let Some(genre_id) = query.genre_id {
            params.push(("genres", genre_id.to_string()));
        }
        if let Some(rating) = query.rating {
            params.push(("rating", rating.as_query_str().into()));
        }
        if let Some(min_score) = query.min_score {
            params.push(("min_score", min_score.to_string()));
        }

        let resp = self
            .http
            .get(format!("{}/anime", self.base_url))
            .query(&params)
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let body: DataResponse<Vec<AnimeData>> = resp
            .json()
            .await
            .map_err(|e| JikanError::Parse(e.to_string()))?;

        Ok(body.data)
    }

    async fn anime_details(&self, mal_id: u64) -> Result<AnimeData, JikanError> {
        self.pacer.acquire().await;
        tracing::debug!(mal_id, "fetching anime details");

        let resp = self
            .http
            .get(format!("{}/anime/{mal_id}", self.base_url))
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let body: DataResponse<AnimeData> = resp
            .json()
            .await
            .map_err(|e| JikanError::Parse(e.to_string()))?;

        Ok(body.data)
    }
}
