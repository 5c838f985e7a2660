//! Statistical aggregation over a publication list.
//!
//! Produces the category distribution, the publications-per-year trend and
//! the keyword ranking shown on the insights page, plus the import summary
//! shown on the system preview page. All functions are pure and return the
//! same output for the same input.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{AggregationResult, PublicationRecord, YearCount};

/// Number of keywords kept by [`aggregate`].
pub const TOP_KEYWORD_LIMIT: usize = 10;

/// Compute the full aggregation with the default keyword limit.
///
/// An empty input yields an empty result, never an error.
pub fn aggregate(records: &[PublicationRecord]) -> AggregationResult {
    aggregate_with_limit(records, TOP_KEYWORD_LIMIT)
}

/// Compute the full aggregation keeping at most `keyword_limit` keywords.
pub fn aggregate_with_limit(
    records: &[PublicationRecord],
    keyword_limit: usize,
) -> AggregationResult {
    AggregationResult {
        category_counts: category_counts(records),
        yearly_trend: yearly_trend(records),
        top_keywords: rank_keywords(records, keyword_limit),
    }
}

/// Count records per category.
///
/// Every record lands in exactly one bucket; records with no category are
/// counted under `"Unknown"`, so the counts always sum to `records.len()`.
pub fn category_counts(records: &[PublicationRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.category_label().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Publications per year, ascending. Records without a year are skipped.
pub fn yearly_trend(records: &[PublicationRecord]) -> Vec<YearCount> {
    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    for year in records.iter().filter_map(|record| record.year) {
        *years.entry(year).or_insert(0) += 1;
    }
    years
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Rank keywords by how many times they occur across all records.
///
/// Keywords are compared case-sensitively. Ties keep the order in which the
/// keywords were first seen. Only the labels are returned.
pub fn rank_keywords(records: &[PublicationRecord], limit: usize) -> Vec<String> {
    // (keyword, count) in first-seen order
    let mut tally: Vec<(&str, usize)> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();

    for keyword in records.iter().flat_map(|record| record.keywords.iter()) {
        let seen = position.get(keyword.as_str()).copied();
        match seen {
            Some(idx) => tally[idx].1 += 1,
            None => {
                position.insert(keyword.as_str(), tally.len());
                tally.push((keyword.as_str(), 1));
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally
        .into_iter()
        .take(limit)
        .map(|(keyword, _)| keyword.to_string())
        .collect()
}

/// Editorial research-area labels shown alongside the computed insights.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchTrends {
    pub growing: Vec<String>,
    pub stable: Vec<String>,
    pub emerging: Vec<String>,
}

impl ResearchTrends {
    /// The curated trend labels published with the catalog.
    pub fn curated() -> Self {
        let labels = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            growing: labels(&["Plant Biology", "Radiation Biology"]),
            stable: labels(&["Human Physiology", "Microbiology"]),
            emerging: labels(&["Synthetic Biology", "AI-assisted Research"]),
        }
    }
}

/// Everything the insights page displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub total_publications: usize,
    #[serde(flatten)]
    pub aggregation: AggregationResult,
    pub trends: ResearchTrends,
}

impl InsightsReport {
    pub fn from_records(records: &[PublicationRecord]) -> Self {
        Self::from_records_with_limit(records, TOP_KEYWORD_LIMIT)
    }

    pub fn from_records_with_limit(records: &[PublicationRecord], keyword_limit: usize) -> Self {
        Self {
            total_publications: records.len(),
            aggregation: aggregate_with_limit(records, keyword_limit),
            trends: ResearchTrends::curated(),
        }
    }
}

/// Data-quality overview of a loaded collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_records: usize,
    pub category_counts: BTreeMap<String, usize>,

    /// Records that cannot be placed on the yearly timeline
    pub missing_year: usize,

    /// Records whose non-empty id repeats an earlier record's id
    pub duplicate_ids: usize,

    /// The first records of the collection, for spot checks
    pub sample_records: Vec<PublicationRecord>,
}

impl ImportSummary {
    pub fn from_records(records: &[PublicationRecord], sample_size: usize) -> Self {
        let mut seen = HashSet::new();
        let duplicate_ids = records
            .iter()
            .filter(|record| !record.id.is_empty())
            .filter(|record| !seen.insert(record.id.as_str()))
            .count();

        Self {
            total_records: records.len(),
            category_counts: category_counts(records),
            missing_year: records.iter().filter(|record| record.year.is_none()).count(),
            duplicate_ids,
            sample_records: records.iter().take(sample_size).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN_CATEGORY;

    fn create_test_record(
        id: &str,
        year: Option<i32>,
        category: Option<&str>,
        keywords: &[&str],
    ) -> PublicationRecord {
        PublicationRecord {
            id: id.to_string(),
            title: format!("Study {}", id),
            year,
            category: category.map(str::to_string),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            ..PublicationRecord::default()
        }
    }

    #[test]
    fn test_empty_input_yields_empty_aggregation() {
        let result = aggregate(&[]);
        assert!(result.is_empty());
        assert_eq!(result, AggregationResult::default());
    }

    #[test]
    fn test_category_counts_include_unknown_bucket() {
        let records = vec![
            create_test_record("1", Some(2020), Some("Plant Biology"), &[]),
            create_test_record("2", Some(2021), None, &[]),
            create_test_record("3", Some(2021), Some("Plant Biology"), &[]),
        ];
        let counts = category_counts(&records);
        assert_eq!(counts.get("Plant Biology"), Some(&2));
        assert_eq!(counts.get(UNKNOWN_CATEGORY), Some(&1));
        assert_eq!(counts.values().sum::<usize>(), records.len());
    }

    #[test]
    fn test_yearly_trend_ascending_without_missing_years() {
        let records = vec![
            create_test_record("1", Some(2024), None, &[]),
            create_test_record("2", None, None, &[]),
            create_test_record("3", Some(2019), None, &[]),
            create_test_record("4", Some(2024), None, &[]),
        ];
        let trend = yearly_trend(&records);
        assert_eq!(
            trend,
            vec![
                YearCount { year: 2019, count: 1 },
                YearCount { year: 2024, count: 2 },
            ]
        );
    }

    #[test]
    fn test_keywords_ranked_by_frequency_with_first_seen_ties() {
        let records = vec![
            create_test_record("1", None, None, &["bone", "ISS"]),
            create_test_record("2", None, None, &["plant", "ISS"]),
            create_test_record("3", None, None, &["radiation", "plant"]),
        ];
        assert_eq!(rank_keywords(&records, 10), vec!["ISS", "plant", "bone", "radiation"]);
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let records = vec![create_test_record("1", None, None, &["ISS", "iss", "ISS"])];
        assert_eq!(rank_keywords(&records, 10), vec!["ISS", "iss"]);
    }

    #[test]
    fn test_keywords_truncated_to_limit() {
        let keywords: Vec<String> = (0..15).map(|i| format!("kw{}", i)).collect();
        let refs: Vec<&str> = keywords.iter().map(String::as_str).collect();
        let records = vec![create_test_record("1", None, None, &refs)];

        let top = aggregate(&records).top_keywords;
        assert_eq!(top.len(), TOP_KEYWORD_LIMIT);
        assert_eq!(top[0], "kw0");
        assert_eq!(top[9], "kw9");
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let records = vec![
            create_test_record("1", Some(2024), Some("Human Physiology"), &["bone", "ISS"]),
            create_test_record("2", Some(2023), Some("Plant Biology"), &["plant", "ISS"]),
        ];
        let first = serde_json::to_string(&aggregate(&records)).unwrap();
        let second = serde_json::to_string(&aggregate(&records)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_insights_report() {
        let records = vec![create_test_record(
            "1",
            Some(2024),
            Some("Human Physiology"),
            &["bone"],
        )];
        let report = InsightsReport::from_records(&records);
        assert_eq!(report.total_publications, 1);
        assert_eq!(report.aggregation.top_keywords, vec!["bone"]);
        assert_eq!(report.trends, ResearchTrends::curated());

        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("category_counts").is_some());
        assert!(value.get("yearly_trend").is_some());
    }

    #[test]
    fn test_import_summary_counts_quality_issues() {
        let records = vec![
            create_test_record("1", Some(2024), Some("Human Physiology"), &[]),
            create_test_record("1", None, None, &[]),
            create_test_record("", None, Some("Plant Biology"), &[]),
            create_test_record("", Some(2020), Some("Plant Biology"), &[]),
        ];
        let summary = ImportSummary::from_records(&records, 2);
        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.missing_year, 2);
        assert_eq!(summary.duplicate_ids, 1);
        assert_eq!(summary.sample_records.len(), 2);
        assert_eq!(summary.category_counts.get(UNKNOWN_CATEGORY), Some(&1));
    }
}
