//! Page-level orchestration.
//!
//! Each page fetches a fresh snapshot from the record store, runs the pure
//! engine over it and hands back a view tagged with where its data came
//! from. Store failures arrive here as `Err` values and are replaced by the
//! built-in sample data before any view is built.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::DashboardConfig;
use crate::fallback;
use crate::insights::{ImportSummary, InsightsReport};
use crate::models::PublicationRecord;
use crate::query::{related_publications, search, RawQuery};
use crate::store::{get_publication, list_publications, RecordStore, StoreResult};
use crate::views::{search_cards, ProjectDetail};

/// Where the data behind a view came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataOrigin {
    /// Fetched from the named store
    Store { name: String },

    /// Store failed; built-in sample data substituted
    Fallback { reason: String },
}

impl DataOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, DataOrigin::Fallback { .. })
    }
}

/// A value together with its origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loaded<T> {
    pub data: T,
    pub origin: DataOrigin,
}

/// Resolve a store result, substituting `fallback` on error.
pub fn with_fallback<T>(
    result: StoreResult<T>,
    store_name: &str,
    fallback: impl FnOnce() -> T,
) -> Loaded<T> {
    match result {
        Ok(data) => Loaded {
            data,
            origin: DataOrigin::Store {
                name: store_name.to_string(),
            },
        },
        Err(e) => {
            warn!(store = store_name, error = %e, "Record store unavailable, using sample data");
            Loaded {
                data: fallback(),
                origin: DataOrigin::Fallback {
                    reason: e.to_string(),
                },
            }
        }
    }
}

/// State of the search page.
///
/// Owned by the caller and passed into [`Dashboard::run_search`]; the
/// engine itself keeps no state between searches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    /// Query as typed by the user
    pub query: RawQuery,

    /// Matches from the most recent search
    pub results: Vec<PublicationRecord>,

    /// Origin of `results`, `None` before the first search
    pub origin: Option<DataOrigin>,

    pub loading: bool,
}

impl SearchState {
    pub fn new(query: RawQuery) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }
}

/// State of the project detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectView {
    /// The record, `None` when no id was given or the id does not exist
    pub project: Option<PublicationRecord>,

    /// Other records in the same category
    pub related: Vec<PublicationRecord>,

    pub origin: DataOrigin,

    /// Origin of `related`, `None` when no project was shown
    pub related_origin: Option<DataOrigin>,
}

impl ProjectView {
    /// Detail DTO for the renderer, if there is a project to show.
    pub fn detail(&self) -> Option<ProjectDetail> {
        self.project.as_ref().map(|record| ProjectDetail {
            record: record.clone(),
            related: search_cards(&self.related),
        })
    }
}

/// Page controller over a record store.
pub struct Dashboard<S> {
    store: S,
    config: DashboardConfig,
}

impl<S: RecordStore> Dashboard<S> {
    pub fn new(store: S, config: DashboardConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn object_type(&self) -> &str {
        &self.config.store.object_type
    }

    /// Fetch publications, returning the store's error untouched.
    pub async fn fetch_publications(
        &self,
        limit: usize,
        newest_first: bool,
    ) -> StoreResult<Vec<PublicationRecord>> {
        list_publications(&self.store, self.object_type(), Some(limit), newest_first).await
    }

    /// Fetch publications, falling back to the sample set on any error.
    pub async fn load_publications(
        &self,
        limit: usize,
        newest_first: bool,
    ) -> Loaded<Vec<PublicationRecord>> {
        let result = self.fetch_publications(limit, newest_first).await;
        with_fallback(result, self.store.name(), fallback::sample_publications)
    }

    /// Run the search described by `state.query` and store the matches.
    pub async fn run_search(&self, state: &mut SearchState) {
        state.loading = true;

        let query = state.query.normalize();
        let loaded = self
            .load_publications(self.config.search.fetch_limit, self.config.search.newest_first)
            .await;

        let matches = search(&loaded.data, &query);
        debug!(
            fetched = loaded.data.len(),
            matched = matches.len(),
            "Search complete"
        );

        state.results = matches.into_iter().cloned().collect();
        state.origin = Some(loaded.origin);
        state.loading = false;
    }

    /// Build the insights report from the latest snapshot.
    ///
    /// Falls back to the precomputed catalog-wide insights when the store
    /// fails. Calling again regenerates from a fresh fetch.
    pub async fn load_insights(&self) -> Loaded<InsightsReport> {
        let settings = &self.config.insights;
        let result = self
            .fetch_publications(settings.fetch_limit, true)
            .await
            .map(|records| {
                InsightsReport::from_records_with_limit(&records, settings.top_keywords)
            });
        with_fallback(result, self.store.name(), fallback::sample_insights)
    }

    /// Summarize the loaded collection for the system preview page.
    pub async fn load_import_summary(&self) -> Loaded<ImportSummary> {
        let settings = &self.config.insights;
        let sample_size = settings.preview_sample_size;
        let result = self
            .fetch_publications(settings.fetch_limit, false)
            .await
            .map(|records| ImportSummary::from_records(&records, sample_size));
        with_fallback(result, self.store.name(), || {
            ImportSummary::from_records(&fallback::sample_publications(), sample_size)
        })
    }

    /// Load one project and its related projects.
    ///
    /// A missing or blank id yields the "not found" state. Any store error
    /// on a given id, including an unknown id, shows the sample project.
    pub async fn load_project(&self, id: Option<&str>) -> ProjectView {
        let store_origin = DataOrigin::Store {
            name: self.store.name().to_string(),
        };

        let Some(id) = id.filter(|id| !id.trim().is_empty()) else {
            return ProjectView {
                project: None,
                related: Vec::new(),
                origin: store_origin,
                related_origin: None,
            };
        };

        let result = get_publication(&self.store, self.object_type(), id).await;
        let loaded = with_fallback(result, self.store.name(), fallback::sample_project);

        let project = loaded.data;
        let related = self.load_related(&project).await;

        ProjectView {
            project: Some(project),
            related: related.data,
            origin: loaded.origin,
            related_origin: Some(related.origin),
        }
    }

    async fn load_related(&self, project: &PublicationRecord) -> Loaded<Vec<PublicationRecord>> {
        let settings = &self.config.project;
        let category = project.category.as_deref();
        let pick = |records: &[PublicationRecord]| -> Vec<PublicationRecord> {
            let exclude = Some(project.id.as_str());
            related_publications(records, category, exclude, settings.related_limit)
                .into_iter()
                .cloned()
                .collect()
        };

        let result = self
            .fetch_publications(settings.related_fetch_limit, true)
            .await
            .map(|records| pick(records.as_slice()));
        with_fallback(result, self.store.name(), || {
            pick(fallback::sample_publications().as_slice())
        })
    }
}
