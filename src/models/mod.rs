//! Core data models for the publication catalog.
//!
//! This module contains the record type fetched from the record store, the
//! store's object envelope, and the derived aggregation types handed to the
//! renderer.

use std::collections::BTreeMap;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Bucket label for records that carry no category.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// A single bioscience publication.
///
/// Every field except `id` may be missing in records coming from the store.
/// Missing or malformed values deserialize to empty defaults instead of
/// rejecting the whole record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PublicationRecord {
    /// Opaque identifier, unique within a loaded collection
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,

    /// Publication title
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,

    /// Author names in publication order
    #[serde(default, deserialize_with = "lenient_list")]
    pub authors: Vec<String>,

    /// Year of publication
    #[serde(default, deserialize_with = "lenient_year")]
    pub year: Option<i32>,

    /// Research category (e.g. "Plant Biology")
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub category: Option<String>,

    /// Mission or platform the study flew on
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub mission: Option<String>,

    /// Abstract text
    #[serde(
        rename = "abstract",
        default,
        deserialize_with = "lenient_optional_text"
    )]
    pub abstract_text: Option<String>,

    /// Keyword tags in the order they were assigned
    #[serde(default, deserialize_with = "lenient_list")]
    pub keywords: Vec<String>,

    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub doi: Option<String>,

    /// Principal investigator
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub pi: Option<String>,

    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub affiliation: Option<String>,

    /// Study status (e.g. "Completed", "Ongoing")
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub status: Option<String>,

    /// Link to the upstream task book or paper
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub source_url: Option<String>,
}

impl PublicationRecord {
    /// Create a record with the given id and title and no other metadata.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Category label used for bucketing, `"Unknown"` when absent.
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNKNOWN_CATEGORY)
    }

    /// Authors joined for single-line display.
    pub fn authors_display(&self) -> String {
        self.authors.join(", ")
    }
}

/// Envelope the record store wraps around every stored record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    /// Store-assigned identifier
    #[serde(deserialize_with = "lenient_id")]
    pub object_id: String,

    /// Collection the object belongs to (e.g. "publications")
    #[serde(default)]
    pub object_type: String,

    /// The record payload
    pub object_data: PublicationRecord,

    /// RFC 3339 creation timestamp, when the store reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl StoredObject {
    /// Wrap a record in an envelope, keyed by the record's own id.
    pub fn from_record(object_type: impl Into<String>, record: PublicationRecord) -> Self {
        Self {
            object_id: record.id.clone(),
            object_type: object_type.into(),
            object_data: record,
            created_at: None,
            updated_at: None,
        }
    }

    /// Unwrap into a record whose `id` is the store's object id.
    pub fn into_record(self) -> PublicationRecord {
        let mut record = self.object_data;
        record.id = self.object_id;
        record
    }
}

/// Number of publications in a single year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Statistical summary of a record list.
///
/// Recomputed on demand from the current snapshot and never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregationResult {
    /// Count of records per category, records without one under `"Unknown"`
    pub category_counts: BTreeMap<String, usize>,

    /// Publications per year, strictly ascending by year
    pub yearly_trend: Vec<YearCount>,

    /// Most frequent keywords, highest first
    pub top_keywords: Vec<String>,
}

impl AggregationResult {
    /// Whether the summary was computed over an empty record list.
    pub fn is_empty(&self) -> bool {
        self.category_counts.is_empty()
            && self.yearly_trend.is_empty()
            && self.top_keywords.is_empty()
    }
}

// Lenient field decoders. The store holds hand-entered data, so a bad value
// in one field must not take the rest of the record down with it.

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseScalar>::deserialize(deserializer)?;
    Ok(match raw {
        Some(LooseScalar::Int(n)) => i32::try_from(n).ok(),
        Some(LooseScalar::Float(f)) if f.is_finite() && f.fract() == 0.0 => {
            let whole = f as i64;
            i32::try_from(whole).ok()
        }
        Some(LooseScalar::Text(s)) => s.trim().parse::<i32>().ok(),
        _ => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseScalar>::deserialize(deserializer)?;
    Ok(match raw {
        Some(LooseScalar::Int(n)) => n.to_string(),
        Some(LooseScalar::Float(f)) => f.to_string(),
        Some(LooseScalar::Text(s)) => s,
        _ => String::new(),
    })
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseScalar>::deserialize(deserializer)?;
    Ok(match raw {
        Some(LooseScalar::Text(s)) if !s.trim().is_empty() => Some(s),
        Some(LooseScalar::Int(n)) => Some(n.to_string()),
        Some(LooseScalar::Float(f)) => Some(f.to_string()),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_optional_text(deserializer).map(Option::unwrap_or_default)
}

/// Accepts a JSON array of strings or a single comma-separated string.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LooseList {
        Items(Vec<serde_json::Value>),
        Joined(String),
        Other(IgnoredAny),
    }

    let raw = Option::<LooseList>::deserialize(deserializer)?;
    Ok(match raw {
        Some(LooseList::Items(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(LooseList::Joined(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_record_deserializes() {
        let record: PublicationRecord = serde_json::from_value(json!({
            "id": "7",
            "title": "Bone Density Study",
            "authors": ["Dr. Chen", "Dr. Rodriguez"],
            "year": 2024,
            "category": "Human Physiology",
            "mission": "ISS Expedition 70",
            "abstract": "Bone loss in microgravity.",
            "keywords": ["bone", "ISS"],
            "doi": "10.1234/nasa.hp.2024.001",
            "source_url": "https://example.org/hp"
        }))
        .unwrap();

        assert_eq!(record.id, "7");
        assert_eq!(record.authors.len(), 2);
        assert_eq!(record.year, Some(2024));
        assert_eq!(record.abstract_text.as_deref(), Some("Bone loss in microgravity."));
        assert_eq!(record.source_url.as_deref(), Some("https://example.org/hp"));
        assert!(record.pi.is_none());
    }

    #[test]
    fn test_missing_fields_degrade_to_defaults() {
        let record: PublicationRecord = serde_json::from_value(json!({ "title": "Bare" })).unwrap();
        assert_eq!(record.title, "Bare");
        assert!(record.authors.is_empty());
        assert!(record.year.is_none());
        assert_eq!(record.category_label(), UNKNOWN_CATEGORY);
    }

    #[test]
    fn test_malformed_year_is_dropped_not_fatal() {
        let record: PublicationRecord =
            serde_json::from_value(json!({ "title": "A", "year": "circa 2019" })).unwrap();
        assert!(record.year.is_none());

        let record: PublicationRecord =
            serde_json::from_value(json!({ "title": "A", "year": " 2021 " })).unwrap();
        assert_eq!(record.year, Some(2021));

        let record: PublicationRecord =
            serde_json::from_value(json!({ "title": "A", "year": 2022.0 })).unwrap();
        assert_eq!(record.year, Some(2022));

        let record: PublicationRecord =
            serde_json::from_value(json!({ "title": "A", "year": [2020] })).unwrap();
        assert!(record.year.is_none());
    }

    #[test]
    fn test_authors_as_joined_string() {
        let record: PublicationRecord =
            serde_json::from_value(json!({ "authors": "Dr. Watson, Dr. Park" })).unwrap();
        assert_eq!(record.authors, vec!["Dr. Watson", "Dr. Park"]);
    }

    #[test]
    fn test_unexpected_shapes_are_absorbed() {
        let record: PublicationRecord = serde_json::from_value(json!({
            "title": "A",
            "authors": { "lead": "Dr. Chen" },
            "keywords": true,
            "year": { "value": 2020 },
            "doi": ["10.1234/x"]
        }))
        .unwrap();
        assert!(record.authors.is_empty());
        assert!(record.keywords.is_empty());
        assert!(record.year.is_none());
        assert!(record.doi.is_none());
    }

    #[test]
    fn test_null_and_blank_fields() {
        let record: PublicationRecord = serde_json::from_value(json!({
            "id": 12,
            "category": null,
            "mission": "  ",
            "keywords": null
        }))
        .unwrap();
        assert_eq!(record.id, "12");
        assert!(record.category.is_none());
        assert!(record.mission.is_none());
        assert!(record.keywords.is_empty());
    }

    #[test]
    fn test_stored_object_into_record_takes_object_id() {
        let object: StoredObject = serde_json::from_value(json!({
            "objectId": "abc123",
            "objectType": "publications",
            "objectData": { "title": "Plant Growth in Orbit", "year": 2023 },
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(object.created_at.as_deref(), Some("2024-05-01T10:00:00Z"));
        let record = object.into_record();
        assert_eq!(record.id, "abc123");
        assert_eq!(record.title, "Plant Growth in Orbit");
    }

    #[test]
    fn test_abstract_serializes_under_abstract_key() {
        let mut record = PublicationRecord::new("1", "T");
        record.abstract_text = Some("text".to_string());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["abstract"], "text");
    }
}
