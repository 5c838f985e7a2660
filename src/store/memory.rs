//! Vector-backed record store.

use async_trait::async_trait;

use super::{order_and_limit, ObjectList, RecordStore, StoreError, StoreResult};
use crate::models::{PublicationRecord, StoredObject};

/// In-process store holding a fixed set of objects.
///
/// Can also be built permanently unavailable, which is how an unconfigured
/// deployment (and the outage tests) exercise the fallback path.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    objects: Vec<StoredObject>,
    outage: Option<String>,
}

impl InMemoryStore {
    pub fn new(objects: Vec<StoredObject>) -> Self {
        Self {
            objects,
            outage: None,
        }
    }

    /// Wrap plain records as objects of `object_type`, keyed by record id.
    pub fn from_records(object_type: &str, records: Vec<PublicationRecord>) -> Self {
        Self::new(
            records
                .into_iter()
                .map(|record| StoredObject::from_record(object_type, record))
                .collect(),
        )
    }

    /// A store whose every call fails with `StoreError::Unavailable`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            objects: Vec::new(),
            outage: Some(reason.into()),
        }
    }

    fn check_available(&self) -> StoreResult<()> {
        match &self.outage {
            Some(reason) => Err(StoreError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn list_objects(
        &self,
        object_type: &str,
        limit: Option<usize>,
        newest_first: bool,
    ) -> StoreResult<ObjectList> {
        self.check_available()?;
        let objects = self
            .objects
            .iter()
            .filter(|o| o.object_type == object_type)
            .cloned()
            .collect();
        Ok(ObjectList {
            items: order_and_limit(objects, limit, newest_first),
            next_page_token: None,
        })
    }

    async fn get_object(&self, object_type: &str, object_id: &str) -> StoreResult<StoredObject> {
        self.check_available()?;
        self.objects
            .iter()
            .find(|o| o.object_type == object_type && o.object_id == object_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", object_type, object_id)))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = InMemoryStore::unavailable("offline");
        assert!(matches!(
            store.list_objects("publications", None, false).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            store.get_object("publications", "1").await,
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_list_respects_type_and_limit() {
        let mut objects: Vec<StoredObject> = (1..=5)
            .map(|i| PublicationRecord::new(i.to_string(), "t"))
            .map(|record| StoredObject::from_record("publications", record))
            .collect();
        objects.push(StoredObject::from_record("contacts", PublicationRecord::new("c1", "t")));
        let store = InMemoryStore::new(objects);

        let page = store.list_objects("publications", Some(3), false).await.unwrap();
        assert_eq!(page.items.len(), 3);
        assert!(page.items.iter().all(|o| o.object_type == "publications"));
        assert!(store.get_object("publications", "c1").await.is_err());
    }
}
