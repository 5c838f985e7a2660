//! HTTP client for the hosted object store.
//!
//! Endpoints used:
//! - `GET {base}/objects/{type}?limit=N&order=desc` returns an [`ObjectList`]
//! - `GET {base}/objects/{type}/{id}` returns a single [`StoredObject`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ObjectList, RecordStore, StoreError, StoreResult};
use crate::models::StoredObject;

/// Record store reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    client: Client,

    /// Parsed base URL, trailing slash removed
    base_url: Url,

    /// Base URL as configured, for logging
    name: String,

    /// Optional bearer token
    api_token: Option<String>,
}

impl HttpRecordStore {
    /// Create a client for the store at `base_url`.
    ///
    /// # Errors
    /// Returns `StoreError::Config` if the URL is empty or invalid, or the
    /// HTTP client cannot be built
    pub fn new(base_url: &str, api_token: Option<String>, timeout: Duration) -> StoreResult<Self> {
        let name = base_url.trim().trim_end_matches('/').to_string();
        if name.is_empty() {
            return Err(StoreError::Config("store base URL is empty".to_string()));
        }
        let base_url = Url::parse(&name)
            .map_err(|e| StoreError::Config(format!("invalid store base URL {}: {}", name, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Config(format!("store base URL {} cannot hold a path", name)));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            name,
            api_token,
        })
    }

    /// `{base}/objects/{segments..}` with every segment percent-encoded.
    fn objects_url(&self, segments: &[&str]) -> StoreResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                StoreError::Config(format!("store base URL {} cannot hold a path", self.name))
            })?
            .pop_if_empty()
            .push("objects")
            .extend(segments);
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
        not_found: Option<&str>,
    ) -> StoreResult<T> {
        debug!(url = %url, "Requesting record store");

        let mut request = self.client.get(url).query(query);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            if let Some(what) = not_found {
                return Err(StoreError::NotFound(what.to_string()));
            }
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| StoreError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn list_objects(
        &self,
        object_type: &str,
        limit: Option<usize>,
        newest_first: bool,
    ) -> StoreResult<ObjectList> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if newest_first {
            query.push(("order", "desc".to_string()));
        }

        let url = self.objects_url(&[object_type])?;
        let mut page: ObjectList = self.fetch(url, &query, None).await?;

        // Guard against stores that ignore the limit parameter
        if let Some(limit) = limit {
            page.items.truncate(limit);
        }
        Ok(page)
    }

    async fn get_object(&self, object_type: &str, object_id: &str) -> StoreResult<StoredObject> {
        let url = self.objects_url(&[object_type, object_id])?;
        let what = format!("{}/{}", object_type, object_id);
        self.fetch(url, &[], Some(&what)).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
