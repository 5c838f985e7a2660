//! Record store abstraction and implementations.
//!
//! The catalog does not own its data: publications live in an external,
//! hosted object collection. This module defines the narrow interface the
//! dashboard needs from that collection ("list the first N objects of a
//! type" and "get one object by id") and ships three backends:
//!
//! - [`http::HttpRecordStore`]: the hosted object store over HTTP
//! - [`json::JsonFileStore`]: a local JSON export
//! - [`memory::InMemoryStore`]: a vector, used in tests and when nothing is configured

pub mod http;
pub mod json;
pub mod memory;

use std::cmp::Reverse;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::StoreConfig;
use crate::models::{PublicationRecord, StoredObject};

/// Errors that can occur when talking to a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure (connection refused, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status
    #[error("Store returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Requested object does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Response body could not be decoded
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Failed to read a local export
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Store is deliberately unavailable (unconfigured or simulated outage)
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Invalid store configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// One page of objects returned by a list call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectList {
    pub items: Vec<StoredObject>,

    /// Continuation token reported by the store. Never followed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Trait for record store backends.
///
/// Implementations only fetch; the catalog never writes to the store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List objects of one type.
    ///
    /// # Arguments
    /// * `object_type` - Collection name (e.g. "publications")
    /// * `limit` - Upper bound on the number of objects returned
    /// * `newest_first` - Order by creation time, most recent first
    async fn list_objects(
        &self,
        object_type: &str,
        limit: Option<usize>,
        newest_first: bool,
    ) -> StoreResult<ObjectList>;

    /// Fetch a single object by id.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if no object has this id
    async fn get_object(&self, object_type: &str, object_id: &str) -> StoreResult<StoredObject>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// List publications and unwrap them from their envelopes.
pub async fn list_publications<S>(
    store: &S,
    object_type: &str,
    limit: Option<usize>,
    newest_first: bool,
) -> StoreResult<Vec<PublicationRecord>>
where
    S: RecordStore + ?Sized,
{
    let page = store.list_objects(object_type, limit, newest_first).await?;
    debug!(store = store.name(), count = page.items.len(), "Listed publications");
    Ok(page.items.into_iter().map(StoredObject::into_record).collect())
}

/// Fetch one publication by id.
pub async fn get_publication<S>(
    store: &S,
    object_type: &str,
    id: &str,
) -> StoreResult<PublicationRecord>
where
    S: RecordStore + ?Sized,
{
    store
        .get_object(object_type, id)
        .await
        .map(StoredObject::into_record)
}

/// Apply list ordering and the count limit to an in-process object list.
///
/// Newest-first sorts by the instant in `createdAt`, latest first, so
/// timestamps with different UTC offsets compare correctly. Objects without
/// a parseable timestamp sort last. Ties keep their relative order.
pub(crate) fn order_and_limit(
    mut objects: Vec<StoredObject>,
    limit: Option<usize>,
    newest_first: bool,
) -> Vec<StoredObject> {
    if newest_first {
        objects.sort_by_cached_key(|object| Reverse(created_instant(object)));
    }
    if let Some(limit) = limit {
        objects.truncate(limit);
    }
    objects
}

fn created_instant(object: &StoredObject) -> Option<DateTime<FixedOffset>> {
    object
        .created_at
        .as_deref()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts.trim()).ok())
}

/// Store selected from configuration at startup.
///
/// Wraps the concrete backends so front ends can hold a single type.
pub enum ConfiguredStore {
    Http(http::HttpRecordStore),
    JsonFile(json::JsonFileStore),
    Memory(memory::InMemoryStore),
}

impl ConfiguredStore {
    /// Pick a backend: an explicit data file wins, then the HTTP store.
    ///
    /// With neither configured the store is permanently unavailable, so every
    /// page falls back to the built-in sample data.
    pub fn from_config(config: &StoreConfig, data_file: Option<PathBuf>) -> StoreResult<Self> {
        if let Some(path) = data_file.or_else(|| config.data_file.clone()) {
            return Ok(Self::JsonFile(json::JsonFileStore::new(path)));
        }
        if let Some(base_url) = &config.base_url {
            let store = http::HttpRecordStore::new(
                base_url,
                config.api_token.clone(),
                std::time::Duration::from_secs(config.timeout_secs),
            )?;
            return Ok(Self::Http(store));
        }
        Ok(Self::Memory(memory::InMemoryStore::unavailable(
            "no record store configured",
        )))
    }
}

#[async_trait]
impl RecordStore for ConfiguredStore {
    async fn list_objects(
        &self,
        object_type: &str,
        limit: Option<usize>,
        newest_first: bool,
    ) -> StoreResult<ObjectList> {
        match self {
            ConfiguredStore::Http(s) => s.list_objects(object_type, limit, newest_first).await,
            ConfiguredStore::JsonFile(s) => s.list_objects(object_type, limit, newest_first).await,
            ConfiguredStore::Memory(s) => s.list_objects(object_type, limit, newest_first).await,
        }
    }

    async fn get_object(&self, object_type: &str, object_id: &str) -> StoreResult<StoredObject> {
        match self {
            ConfiguredStore::Http(s) => s.get_object(object_type, object_id).await,
            ConfiguredStore::JsonFile(s) => s.get_object(object_type, object_id).await,
            ConfiguredStore::Memory(s) => s.get_object(object_type, object_id).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            ConfiguredStore::Http(s) => s.name(),
            ConfiguredStore::JsonFile(s) => s.name(),
            ConfiguredStore::Memory(s) => s.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(id: &str, created_at: Option<&str>) -> StoredObject {
        let mut object = StoredObject::from_record("publications", PublicationRecord::new(id, id));
        object.created_at = created_at.map(str::to_string);
        object
    }

    #[test]
    fn test_order_and_limit_newest_first() {
        let objects = vec![
            object("a", Some("2024-01-01T00:00:00Z")),
            object("b", None),
            object("c", Some("2024-06-01T00:00:00Z")),
        ];
        let ordered = order_and_limit(objects, None, true);
        let ids: Vec<_> = ordered.iter().map(|o| o.object_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_newest_first_compares_instants_across_offsets() {
        let objects = vec![
            // 08:00 UTC
            object("east", Some("2024-06-01T10:00:00+02:00")),
            object("utc", Some("2024-06-01T09:00:00Z")),
            object("junk", Some("yesterday")),
            // 09:30 UTC
            object("west", Some("2024-06-01T04:30:00-05:00")),
        ];
        let ordered = order_and_limit(objects, None, true);
        let ids: Vec<_> = ordered.iter().map(|o| o.object_id.as_str()).collect();
        assert_eq!(ids, vec!["west", "utc", "east", "junk"]);
    }

    #[test]
    fn test_order_and_limit_keeps_order_when_not_sorting() {
        let objects = vec![object("a", None), object("b", None), object("c", None)];
        let ordered = order_and_limit(objects, Some(2), false);
        let ids: Vec<_> = ordered.iter().map(|o| o.object_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_unconfigured_store_is_unavailable() {
        let store = ConfiguredStore::from_config(&StoreConfig::default(), None).unwrap();
        assert!(matches!(store, ConfiguredStore::Memory(_)));
    }

    #[test]
    fn test_data_file_takes_precedence() {
        let config = StoreConfig {
            base_url: Some("http://localhost:9".to_string()),
            ..StoreConfig::default()
        };
        let data_file = Some(PathBuf::from("export.json"));
        let store = ConfiguredStore::from_config(&config, data_file).unwrap();
        assert!(matches!(store, ConfiguredStore::JsonFile(_)));
    }

    #[tokio::test]
    async fn test_list_publications_unwraps_envelopes() {
        let store = memory::InMemoryStore::from_records(
            "publications",
            vec![PublicationRecord::new("1", "Bone Density Study")],
        );
        let records = list_publications(&store, "publications", Some(10), true).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1");

        let record = get_publication(&store, "publications", "1").await.unwrap();
        assert_eq!(record.title, "Bone Density Study");
    }
}
