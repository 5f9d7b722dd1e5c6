use crate::core::report::AuditReport;
use crate::domain::model::{BusinessProfile, ReviewPage, ReviewPageRequest};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Paginated review source. One call is one round trip.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    async fn fetch_page(&self, request: &ReviewPageRequest) -> Result<ReviewPage>;
}

/// Single-shot knowledge-graph lookup for a free-text business query.
#[async_trait]
pub trait SearchSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<BusinessProfile>;
}

/// Destination for finished reports.
#[async_trait]
pub trait ReportSink: Send + Sync {
    fn name(&self) -> &str;
    async fn submit(&self, report: &AuditReport) -> Result<()>;
}
