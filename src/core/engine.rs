use crate::core::auditor::ReviewAuditor;
use crate::core::report::AuditReport;
use crate::domain::ports::{ReportSink, ReviewSource, SearchSource};
use crate::utils::error::{AuditError, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Runs the whole lookup: knowledge-graph search, review audit, report, sinks.
pub struct AuditEngine<Q: SearchSource, R: ReviewSource> {
    search: Q,
    auditor: ReviewAuditor<R>,
    sinks: Vec<Box<dyn ReportSink>>,
    max_reviews: usize,
}

impl<Q: SearchSource, R: ReviewSource> AuditEngine<Q, R> {
    pub fn new(search: Q, auditor: ReviewAuditor<R>, max_reviews: usize) -> Self {
        Self {
            search,
            auditor,
            sinks: Vec::new(),
            max_reviews,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn ReportSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|sink| sink.name()).collect()
    }

    pub async fn run(&self, query: &str) -> Result<AuditReport> {
        tracing::info!("🔍 Looking up '{}'", query);
        let profile = self.search.search(query).await?;

        match &profile.place_id {
            Some(place_id) => tracing::info!(
                "📍 Found {} ({})",
                profile.title.as_deref().unwrap_or("untitled place"),
                place_id
            ),
            None => tracing::warn!("⚠️ No knowledge graph place for '{}'", query),
        }

        let outcome = self
            .auditor
            .audit(profile.place_id.as_ref(), self.max_reviews)
            .await?;

        let report = AuditReport::new(query, profile, outcome);

        for sink in &self.sinks {
            tracing::debug!("Submitting report to {}", sink.name());
            sink.submit(&report).await?;
            tracing::info!("📤 Report submitted to {}", sink.name());
        }

        Ok(report)
    }
}

impl<Q, R> AuditEngine<Q, R>
where
    Q: SearchSource + 'static,
    R: ReviewSource + 'static,
{
    /// Audits several queries with at most `concurrency` in flight.
    /// Results come back in the order of `queries`.
    pub async fn run_batch(
        self: Arc<Self>,
        queries: Vec<String>,
        concurrency: usize,
    ) -> Vec<(String, Result<AuditReport>)> {
        let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (index, query) in queries.iter().cloned().enumerate() {
            let engine = Arc::clone(&self);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                // 信號量不會被關閉
                let _permit = semaphore.acquire_owned().await.ok();
                let report = engine.run(&query).await;
                (index, report)
            });
        }

        let mut results: Vec<Option<Result<AuditReport>>> = queries.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, report)) => results[index] = Some(report),
                Err(e) => tracing::error!("❌ Audit task panicked: {}", e),
            }
        }

        queries
            .into_iter()
            .zip(results)
            .map(|(query, report)| {
                let report = report.unwrap_or_else(|| {
                    Err(AuditError::ProcessingError {
                        message: format!("audit task for '{}' did not finish", query),
                    })
                });
                (query, report)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fetcher::tests::{snippets, ScriptedSource};
    use crate::core::fetcher::{FetchOptions, ReviewFetcher};
    use crate::domain::model::{AuditOutcome, BusinessProfile, PlaceId, ReviewPage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StaticSearch;

    #[async_trait]
    impl SearchSource for StaticSearch {
        async fn search(&self, query: &str) -> Result<BusinessProfile> {
            if query.contains("unknown") {
                return Ok(BusinessProfile::default());
            }
            Ok(BusinessProfile {
                title: Some(query.to_uppercase()),
                place_id: PlaceId::parse(format!("place-{}", query)),
                ..Default::default()
            })
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        seen: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl ReportSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        async fn submit(&self, report: &AuditReport) -> Result<()> {
            if self.fail {
                return Err(AuditError::SubmissionError {
                    sink: self.name().to_string(),
                    message: "rejected".to_string(),
                });
            }
            self.seen.lock().unwrap().push(report.query.clone());
            Ok(())
        }
    }

    fn engine(source: ScriptedSource) -> AuditEngine<StaticSearch, ScriptedSource> {
        let auditor = ReviewAuditor::new(ReviewFetcher::new(source, FetchOptions::default()));
        AuditEngine::new(StaticSearch, auditor, 18)
    }

    #[tokio::test]
    async fn test_run_audits_and_submits() {
        let source = ScriptedSource::new(vec![ReviewPage {
            reviews: snippets(&["pizza heaven", "great wine list"]),
            next_page_token: None,
        }]);
        let sink = RecordingSink::default();
        let engine = engine(source).with_sink(Box::new(sink.clone()));

        let report = engine.run("luigis").await.unwrap();

        let result = report.result().copied().unwrap();
        assert_eq!(result.usable_reviews, 2);
        assert_eq!(result.pizza_mentions, 1);
        assert_eq!(result.alcohol_mentions, 1);
        assert_eq!(*sink.seen.lock().unwrap(), vec!["luigis".to_string()]);
    }

    #[tokio::test]
    async fn test_run_without_place_skips_reviews() {
        let source = ScriptedSource::endless(10);
        let engine = engine(source.clone());

        let report = engine.run("unknown diner").await.unwrap();

        assert_eq!(report.outcome, AuditOutcome::NoPlaceId);
        assert!(source.requests().is_empty());
    }

    #[tokio::test]
    async fn test_sink_failure_propagates() {
        let source = ScriptedSource::new(vec![ReviewPage::default()]);
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let engine = engine(source).with_sink(Box::new(sink));

        let err = engine.run("luigis").await.unwrap_err();

        assert!(matches!(err, AuditError::SubmissionError { .. }));
    }

    #[tokio::test]
    async fn test_run_batch_keeps_query_order() {
        let engine = Arc::new(engine(ScriptedSource::endless(5)));
        let queries = vec!["alpha".to_string(), "unknown".to_string(), "gamma".to_string()];

        let results = engine.run_batch(queries.clone(), 2).await;

        let order: Vec<_> = results.iter().map(|(q, _)| q.clone()).collect();
        assert_eq!(order, queries);
        assert_eq!(results[1].1.as_ref().unwrap().outcome, AuditOutcome::NoPlaceId);
        assert_eq!(
            results[2].1.as_ref().unwrap().profile.title.as_deref(),
            Some("GAMMA")
        );
    }
}
