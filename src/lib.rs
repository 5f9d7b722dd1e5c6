pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::AuditConfig;

pub use adapters::serpapi::SerpApiClient;
pub use adapters::sink::{CsvReportSink, FormSubmissionSink};
pub use crate::core::{
    auditor::ReviewAuditor,
    engine::AuditEngine,
    fetcher::{FetchOptions, ReviewFetcher},
    report::AuditReport,
};
pub use domain::model::{AuditOutcome, AuditResult, FetchOutcome, PlaceId, RawReview, SortOrder};
pub use utils::error::{AuditError, Result};
