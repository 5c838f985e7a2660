//! Search and filtering over an in-memory publication list.
//!
//! Everything here is a pure function of its inputs: the caller owns the
//! record snapshot and the query, and results borrow from the snapshot.
//!
//! # Usage
//!
//! ```rust
//! use bioscience_catalog::models::PublicationRecord;
//! use bioscience_catalog::query::{search, QuerySpec};
//!
//! let mut record = PublicationRecord::new("1", "Bone Density Study");
//! record.year = Some(2024);
//! let records = vec![record];
//!
//! let query = QuerySpec::new().with_text("bone").with_year_range(Some(2020), None);
//! let matches = search(&records, &query);
//! assert_eq!(matches.len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::PublicationRecord;

/// Normalized search parameters for a single search invocation.
///
/// Unset fields, and text fields holding an empty string, impose no
/// constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Case-insensitive substring matched against title and authors
    pub text: Option<String>,

    /// Exact category match
    pub category: Option<String>,

    /// Inclusive lower bound on publication year
    pub year_from: Option<i32>,

    /// Inclusive upper bound on publication year
    pub year_to: Option<i32>,

    /// Mission filter. Accepted but not applied to results.
    pub mission: Option<String>,
}

impl QuerySpec {
    /// Create an empty query that matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_year_range(mut self, from: Option<i32>, to: Option<i32>) -> Self {
        self.year_from = from;
        self.year_to = to;
        self
    }

    pub fn with_mission(mut self, mission: impl Into<String>) -> Self {
        self.mission = Some(mission.into());
        self
    }

    /// True when no predicate is active.
    pub fn is_empty(&self) -> bool {
        active(&self.text).is_none()
            && active(&self.category).is_none()
            && self.year_from.is_none()
            && self.year_to.is_none()
    }

    /// Check one record against every active predicate.
    ///
    /// Predicates are evaluated in a fixed order: text, category, year lower
    /// bound, year upper bound. A record without a year fails any active
    /// year bound.
    pub fn matches(&self, record: &PublicationRecord) -> bool {
        let needle = active(&self.text).map(str::to_lowercase);
        self.matches_with_needle(record, needle.as_deref())
    }

    fn matches_with_needle(&self, record: &PublicationRecord, needle: Option<&str>) -> bool {
        if let Some(needle) = needle {
            let in_title = record.title.to_lowercase().contains(needle);
            let in_authors = || {
                record
                    .authors
                    .iter()
                    .any(|author| author.to_lowercase().contains(needle))
            };
            if !in_title && !in_authors() {
                return false;
            }
        }

        if let Some(category) = active(&self.category) {
            if record.category.as_deref() != Some(category) {
                return false;
            }
        }

        if let Some(from) = self.year_from {
            if !record.year.is_some_and(|year| year >= from) {
                return false;
            }
        }

        if let Some(to) = self.year_to {
            if !record.year.is_some_and(|year| year <= to) {
                return false;
            }
        }

        true
    }
}

fn active(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// Un-validated query input, exactly as typed into a search form or CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuery {
    pub text: String,
    pub category: String,
    pub year_from: String,
    pub year_to: String,
    pub mission: String,
}

impl RawQuery {
    /// Normalize into a [`QuerySpec`].
    ///
    /// Blank fields become unset. Year bounds that are not integers are
    /// logged and treated as unset.
    pub fn normalize(&self) -> QuerySpec {
        QuerySpec {
            text: non_blank(&self.text),
            category: non_blank(&self.category),
            year_from: year_bound("year_from", &self.year_from),
            year_to: year_bound("year_to", &self.year_to),
            mission: non_blank(&self.mission),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn year_bound(field: &str, input: &str) -> Option<i32> {
    let parsed = parse_year_bound(input);
    if parsed.is_none() && !input.trim().is_empty() {
        warn!(field, input, "Ignoring non-numeric year bound");
    }
    parsed
}

/// Parse a user-supplied year bound.
///
/// Returns `None` for blank or non-integer input so that the bound is
/// skipped instead of excluding every record.
pub fn parse_year_bound(input: &str) -> Option<i32> {
    input.trim().parse::<i32>().ok()
}

/// Filter records by a query.
///
/// Returns the records satisfying all active predicates, in their original
/// order. An empty query returns every record.
pub fn search<'a>(
    records: &'a [PublicationRecord],
    query: &QuerySpec,
) -> Vec<&'a PublicationRecord> {
    let needle = active(&query.text).map(str::to_lowercase);
    records
        .iter()
        .filter(|record| query.matches_with_needle(record, needle.as_deref()))
        .collect()
}

/// Records sharing a category with the one being viewed.
///
/// Records without a category are related to each other through the
/// `"Unknown"` bucket. The viewed record is never included, input order is
/// kept, and at most `limit` records are returned.
pub fn related_publications<'a>(
    records: &'a [PublicationRecord],
    category: Option<&str>,
    exclude_id: Option<&str>,
    limit: usize,
) -> Vec<&'a PublicationRecord> {
    let wanted = category.unwrap_or(crate::models::UNKNOWN_CATEGORY);
    records
        .iter()
        .filter(|record| record.category_label() == wanted)
        .filter(|record| exclude_id.map_or(true, |id| record.id != id))
        .take(limit)
        .collect()
}
