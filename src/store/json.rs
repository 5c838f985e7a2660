//! Local JSON export of the record store.
//!
//! Accepts three layouts so that both raw store dumps and hand-written seed
//! files work:
//! - a list page: `{ "items": [ { "objectId": …, "objectData": { … } } ] }`
//! - a bare array of envelopes
//! - a bare array of records (ids are taken from each record's `id`, or
//!   assigned from the lowest unused number starting at 1 when missing)
//!
//! The layout is chosen from the document's shape, then every element is
//! decoded on its own. An element that cannot be decoded is skipped with a
//! warning and never changes how its neighbours are read.
//!
//! The file is re-read on every call, matching the store's fetch-per-page
//! semantics.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::{order_and_limit, ObjectList, RecordStore, StoreError, StoreResult};
use crate::models::{PublicationRecord, StoredObject};

/// Record store backed by a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    name: String,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("json:{}", path.display());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn malformed(&self, reason: impl std::fmt::Display) -> StoreError {
        StoreError::Malformed(format!("{}: {}", self.path.display(), reason))
    }

    async fn load(&self, object_type: &str) -> StoreResult<Vec<StoredObject>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let document: Value = serde_json::from_str(&content).map_err(|e| self.malformed(e))?;

        let objects = match document {
            Value::Object(mut page) => match page.remove("items") {
                Some(Value::Array(items)) => self.decode_each::<StoredObject>(items),
                Some(_) => return Err(self.malformed("\"items\" is not an array")),
                None => return Err(self.malformed("object without an \"items\" list")),
            },
            Value::Array(items) if items.iter().any(is_envelope) => {
                self.decode_each::<StoredObject>(items)
            }
            Value::Array(items) => {
                let records = assign_missing_ids(self.decode_each::<PublicationRecord>(items));
                records
                    .into_iter()
                    .map(|record| StoredObject::from_record(object_type, record))
                    .collect()
            }
            _ => return Err(self.malformed("expected an array or an object with \"items\"")),
        };

        // Untyped envelopes are assumed to belong to the requested collection
        let objects: Vec<StoredObject> = objects
            .into_iter()
            .filter(|o| o.object_type.is_empty() || o.object_type == object_type)
            .collect();

        debug!(path = %self.path.display(), count = objects.len(), "Loaded JSON export");
        Ok(objects)
    }

    fn decode_each<T: DeserializeOwned>(&self, items: Vec<Value>) -> Vec<T> {
        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        index,
                        error = %e,
                        "Skipping undecodable entry"
                    );
                    None
                }
            })
            .collect()
    }
}

/// An element is treated as a store envelope when it carries envelope keys.
fn is_envelope(item: &Value) -> bool {
    item.get("objectId").is_some() || item.get("objectData").is_some()
}

/// Give records without an id the lowest number not already used as an id.
fn assign_missing_ids(mut records: Vec<PublicationRecord>) -> Vec<PublicationRecord> {
    let mut taken: HashSet<String> = records
        .iter()
        .filter(|r| !r.id.is_empty())
        .map(|r| r.id.clone())
        .collect();

    let mut next = 1usize;
    for record in records.iter_mut().filter(|r| r.id.is_empty()) {
        while taken.contains(&next.to_string()) {
            next += 1;
        }
        record.id = next.to_string();
        taken.insert(record.id.clone());
    }
    records
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn list_objects(
        &self,
        object_type: &str,
        limit: Option<usize>,
        newest_first: bool,
    ) -> StoreResult<ObjectList> {
        let objects = self.load(object_type).await?;
        Ok(ObjectList {
            items: order_and_limit(objects, limit, newest_first),
            next_page_token: None,
        })
    }

    async fn get_object(&self, object_type: &str, object_id: &str) -> StoreResult<StoredObject> {
        self.load(object_type)
            .await?
            .into_iter()
            .find(|o| o.object_id == object_id)
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", object_type, object_id)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
