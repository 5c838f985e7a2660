//! Built-in sample data.
//!
//! Substituted whenever the record store cannot be reached, so every page
//! still has something deterministic to show.

use std::collections::BTreeMap;

use crate::insights::{InsightsReport, ResearchTrends};
use crate::models::{AggregationResult, PublicationRecord, YearCount};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The sample publication set.
pub fn sample_publications() -> Vec<PublicationRecord> {
    vec![
        PublicationRecord {
            id: "1".to_string(),
            title: "Bone Density Changes in Long-Duration Spaceflight".to_string(),
            authors: strings(&["Dr. Sarah Chen", "Dr. Michael Rodriguez"]),
            year: Some(2024),
            category: Some("Human Physiology".to_string()),
            mission: Some("ISS Expedition 70".to_string()),
            abstract_text: Some(
                "Comprehensive study of bone mineral density changes in astronauts during \
                 6-month ISS missions. This research examines the effects of microgravity on \
                 skeletal health and evaluates countermeasures for bone loss prevention during \
                 long-duration space exploration missions to Mars and beyond."
                    .to_string(),
            ),
            keywords: strings(&["bone density", "microgravity", "astronaut health", "ISS"]),
            doi: Some("10.1234/nasa.hp.2024.001".to_string()),
            pi: Some("Dr. Sarah Chen".to_string()),
            affiliation: Some("NASA Johnson Space Center".to_string()),
            status: Some("Completed".to_string()),
            source_url: Some("https://taskbook.nasaprs.com/tbp/studies/hp2024001".to_string()),
        },
        PublicationRecord {
            id: "2".to_string(),
            title: "Arabidopsis Growth Patterns in Microgravity".to_string(),
            authors: strings(&["Dr. Emily Watson", "Dr. James Park"]),
            year: Some(2024),
            category: Some("Plant Biology".to_string()),
            mission: Some("ISS Advanced Plant Habitat".to_string()),
            abstract_text: Some(
                "Analysis of root and shoot development in Arabidopsis under microgravity."
                    .to_string(),
            ),
            keywords: strings(&["plant growth", "microgravity", "arabidopsis"]),
            doi: Some("10.1234/nasa.pb.2024.002".to_string()),
            pi: Some("Dr. Emily Watson".to_string()),
            affiliation: Some("NASA Ames Research Center".to_string()),
            status: Some("Ongoing".to_string()),
            source_url: None,
        },
        PublicationRecord {
            id: "3".to_string(),
            title: "Immune System Response to Space Radiation".to_string(),
            year: Some(2023),
            category: Some("Human Physiology".to_string()),
            keywords: strings(&["radiation", "immune response", "astronaut health"]),
            ..PublicationRecord::default()
        },
        PublicationRecord {
            id: "4".to_string(),
            title: "Cardiovascular Changes in Microgravity".to_string(),
            year: Some(2022),
            category: Some("Human Physiology".to_string()),
            keywords: strings(&["cardiovascular", "microgravity"]),
            ..PublicationRecord::default()
        },
    ]
}

/// The sample record shown on the project page when a lookup fails.
pub fn sample_project() -> PublicationRecord {
    sample_publications()
        .into_iter()
        .next()
        .unwrap_or_else(|| {
            PublicationRecord::new("1", "Bone Density Changes in Long-Duration Spaceflight")
        })
}

/// Precomputed insights for the full published catalog of 608 studies.
pub fn sample_insights() -> InsightsReport {
    let category_counts: BTreeMap<String, usize> = [
        ("Human Physiology", 145),
        ("Plant Biology", 120),
        ("Microbiology", 98),
        ("Radiation Biology", 87),
        ("Animal Studies", 65),
        ("Other", 93),
    ]
    .into_iter()
    .map(|(category, count)| (category.to_string(), count))
    .collect();

    let yearly_trend = [
        (2015, 25),
        (2016, 32),
        (2017, 45),
        (2018, 52),
        (2019, 68),
        (2020, 75),
        (2021, 85),
        (2022, 92),
        (2023, 98),
        (2024, 106),
    ]
    .into_iter()
    .map(|(year, count)| YearCount { year, count })
    .collect();

    InsightsReport {
        total_publications: 608,
        aggregation: AggregationResult {
            category_counts,
            yearly_trend,
            top_keywords: strings(&[
                "microgravity",
                "ISS",
                "bone loss",
                "plant growth",
                "radiation",
                "astronaut health",
            ]),
        },
        trends: ResearchTrends::curated(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_ids_unique() {
        let records = sample_publications();
        let ids: HashSet<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), records.len());
    }

    #[test]
    fn test_sample_data_is_deterministic() {
        assert_eq!(sample_publications(), sample_publications());
        assert_eq!(sample_insights(), sample_insights());
    }

    #[test]
    fn test_sample_insights_consistent() {
        let insights = sample_insights();
        let categorized: usize = insights.aggregation.category_counts.values().sum();
        assert_eq!(categorized, insights.total_publications);

        let years: Vec<i32> = insights.aggregation.yearly_trend.iter().map(|t| t.year).collect();
        assert!(years.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sample_project_is_fully_populated() {
        let project = sample_project();
        assert_eq!(project.id, "1");
        assert!(project.source_url.is_some());
        assert!(project.keywords.contains(&"ISS".to_string()));
    }
}
