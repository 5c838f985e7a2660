//! View models handed to the renderer.
//!
//! Flattened, display-ready shapes: every optional record field is either
//! replaced by a placeholder or skipped during serialization, so a renderer
//! never has to handle a missing value itself.

use serde::{Deserialize, Serialize};

use crate::insights::{InsightsReport, ResearchTrends};
use crate::models::{AggregationResult, PublicationRecord};

/// Shown in place of a missing title.
pub const UNTITLED: &str = "Untitled";

/// Shown in place of any other missing scalar.
pub const PLACEHOLDER: &str = "—";

/// Link to the detail page for a record.
pub fn detail_link(id: &str) -> String {
    format!("project.html?id={}", id)
}

/// Clickable summary card in a result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCard {
    pub id: String,
    pub title: String,

    /// Publication year, or the placeholder
    pub year: String,

    /// Comma-joined author names
    pub authors: String,

    pub category: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mission: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,

    pub detail_link: String,
}

impl From<&PublicationRecord> for SearchCard {
    fn from(record: &PublicationRecord) -> Self {
        let title = if record.title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            record.title.clone()
        };

        Self {
            id: record.id.clone(),
            title,
            year: record
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            authors: record.authors_display(),
            category: record.category_label().to_string(),
            mission: record.mission.clone(),
            abstract_text: record.abstract_text.clone(),
            detail_link: detail_link(&record.id),
        }
    }
}

/// Build cards for a list of matches.
pub fn search_cards<'a, I>(records: I) -> Vec<SearchCard>
where
    I: IntoIterator<Item = &'a PublicationRecord>,
{
    records.into_iter().map(SearchCard::from).collect()
}

/// Labels and values for the category pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryChart {
    pub labels: Vec<String>,
    pub data: Vec<usize>,
}

impl From<&AggregationResult> for CategoryChart {
    fn from(result: &AggregationResult) -> Self {
        let (labels, data): (Vec<String>, Vec<usize>) = result
            .category_counts
            .iter()
            .map(|(label, count)| (label.clone(), *count))
            .unzip();
        Self { labels, data }
    }
}

/// Labels and values for the publications-per-year line chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendChart {
    pub labels: Vec<i32>,
    pub data: Vec<usize>,
}

impl From<&AggregationResult> for TrendChart {
    fn from(result: &AggregationResult) -> Self {
        let (labels, data): (Vec<i32>, Vec<usize>) = result
            .yearly_trend
            .iter()
            .map(|point| (point.year, point.count))
            .unzip();
        Self { labels, data }
    }
}

/// Headline numbers and chart series for the insights page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightsPanel {
    pub total_publications: usize,
    pub category_total: usize,
    pub years_of_data: usize,
    pub category_chart: CategoryChart,
    pub trend_chart: TrendChart,
    pub top_keywords: Vec<String>,
    pub trends: ResearchTrends,
}

impl From<&InsightsReport> for InsightsPanel {
    fn from(report: &InsightsReport) -> Self {
        Self {
            total_publications: report.total_publications,
            category_total: report.aggregation.category_counts.len(),
            years_of_data: report.aggregation.yearly_trend.len(),
            category_chart: CategoryChart::from(&report.aggregation),
            trend_chart: TrendChart::from(&report.aggregation),
            top_keywords: report.aggregation.top_keywords.clone(),
            trends: report.trends.clone(),
        }
    }
}

/// Full detail view of one record plus related projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetail {
    pub record: PublicationRecord,
    pub related: Vec<SearchCard>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::aggregate;
    use crate::models::UNKNOWN_CATEGORY;

    #[test]
    fn test_card_placeholders_for_missing_fields() {
        let record = PublicationRecord::new("42", "  ");
        let card = SearchCard::from(&record);
        assert_eq!(card.title, UNTITLED);
        assert_eq!(card.year, PLACEHOLDER);
        assert_eq!(card.authors, "");
        assert_eq!(card.category, UNKNOWN_CATEGORY);
        assert_eq!(card.detail_link, "project.html?id=42");

        let value = serde_json::to_value(&card).unwrap();
        assert!(value.get("mission").is_none());
        assert!(value.get("abstract_text").is_none());
    }

    #[test]
    fn test_card_from_full_record() {
        let mut record = PublicationRecord::new("1", "Bone Density Study");
        record.year = Some(2024);
        record.authors = vec!["Dr. Chen".to_string(), "Dr. Rodriguez".to_string()];
        record.mission = Some("ISS Expedition 70".to_string());

        let card = SearchCard::from(&record);
        assert_eq!(card.year, "2024");
        assert_eq!(card.authors, "Dr. Chen, Dr. Rodriguez");
        assert_eq!(card.mission.as_deref(), Some("ISS Expedition 70"));
    }

    #[test]
    fn test_chart_series_follow_aggregation_order() {
        let mut a = PublicationRecord::new("1", "A");
        a.year = Some(2024);
        a.category = Some("Plant Biology".to_string());
        let mut b = PublicationRecord::new("2", "B");
        b.year = Some(2023);
        b.category = Some("Human Physiology".to_string());

        let result = aggregate(&[a, b]);
        let pie = CategoryChart::from(&result);
        assert_eq!(pie.labels, vec!["Human Physiology", "Plant Biology"]);
        assert_eq!(pie.data, vec![1, 1]);

        let line = TrendChart::from(&result);
        assert_eq!(line.labels, vec![2023, 2024]);
        assert_eq!(line.data, vec![1, 1]);
    }
}
