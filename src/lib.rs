//! Bioscience Catalog - search and insights over NASA bioscience publications.
//!
//! This library provides the core of the publication dashboard: fetching
//! records from a hosted object store, filtering them for search, and
//! aggregating them into the statistics shown on the insights page.
//!
//! # Architecture
//!
//! - **models**: Core data structures (PublicationRecord, AggregationResult, etc.)
//! - **query**: Multi-field search over an in-memory record list
//! - **insights**: Category, yearly and keyword aggregation
//! - **store**: Record store trait with HTTP, JSON-file and in-memory backends
//! - **fallback**: Built-in sample data used when the store is unreachable
//! - **dashboard**: Page state containers and the fetch-with-fallback policy
//! - **views**: Renderer-facing DTOs (search cards, chart series)
//! - **config**: TOML configuration
//!
//! # Workflow
//!
//! 1. Fetch the first N publications from the record store
//! 2. On any store error, substitute the sample dataset
//! 3. Run `search` or `aggregate` over the snapshot
//! 4. Convert the output into view models for rendering
//!
//! # Example
//!
//! ```ignore
//! use bioscience_catalog::{
//!     config::DashboardConfig,
//!     dashboard::{Dashboard, SearchState},
//!     query::RawQuery,
//!     store::ConfiguredStore,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DashboardConfig::load(None)?;
//!     let store = ConfiguredStore::from_config(&config.store, None)?;
//!     let dashboard = Dashboard::new(store, config);
//!
//!     let mut state = SearchState::new(RawQuery {
//!         text: "bone".to_string(),
//!         ..RawQuery::default()
//!     });
//!     dashboard.run_search(&mut state).await;
//!
//!     for record in &state.results {
//!         println!("{} ({:?})", record.title, record.year);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dashboard;
pub mod fallback;
pub mod insights;
pub mod models;
pub mod query;
pub mod store;
pub mod views;

// Re-export commonly used types at the crate root
pub use insights::{aggregate, ImportSummary, InsightsReport};
pub use models::{AggregationResult, PublicationRecord, StoredObject, YearCount, UNKNOWN_CATEGORY};
pub use query::{search, QuerySpec, RawQuery};
pub use store::{RecordStore, StoreError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
