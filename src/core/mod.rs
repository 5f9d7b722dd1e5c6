pub mod auditor;
pub mod engine;
pub mod fetcher;
pub mod report;

pub use crate::domain::model::{AuditOutcome, AuditResult, FetchOutcome, RawReview};
pub use crate::domain::ports::{ReportSink, ReviewSource, SearchSource};
pub use crate::utils::error::Result;
