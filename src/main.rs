use clap::Parser;
use review_audit::utils::error::ErrorSeverity;
use review_audit::utils::{logger, validation::Validate};
use review_audit::{
    AuditConfig, AuditEngine, AuditError, CliConfig, CsvReportSink, FormSubmissionSink,
    ReviewAuditor, ReviewFetcher, SerpApiClient,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting review-audit");

    let mut config = match AuditConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    cli.apply_overrides(&mut config);

    if cli.verbose {
        tracing::debug!("Effective config: {:?}", config);
    }

    // 驗證配置；dry run 不需要 api_key
    let validated = if cli.dry_run {
        config.validate_offline()
    } else {
        config.validate()
    };
    if let Err(e) = validated {
        fail(&e);
    }

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No requests will be sent");
        println!("Would audit {} query(s):", cli.queries.len());
        for query in &cli.queries {
            println!("  - {}", query);
        }
        println!(
            "Max reviews: {}, locale: {}, sort order: {}",
            config.max_reviews(),
            config.serpapi.locale,
            config.serpapi.sort_order
        );
        if let Some(path) = &config.report.csv_path {
            println!("CSV report: {}", path);
        }
        if let Some(form) = &config.report.form {
            println!("Form submission: {} ({} fields)", form.url, form.fields.len());
        }
        return Ok(());
    }

    let client = match SerpApiClient::new(&config.serpapi) {
        Ok(client) => client,
        Err(e) => fail(&e),
    };
    let fetcher = ReviewFetcher::new(client.clone(), config.serpapi.fetch_options());
    let mut engine = AuditEngine::new(client, ReviewAuditor::new(fetcher), config.max_reviews());

    if let Some(path) = &config.report.csv_path {
        engine = engine.with_sink(Box::new(CsvReportSink::new(path)));
    }
    if let Some(form) = config.report.form.clone() {
        let timeout = Duration::from_secs(config.serpapi.timeout_seconds);
        match FormSubmissionSink::new(form, timeout) {
            Ok(sink) => engine = engine.with_sink(Box::new(sink)),
            Err(e) => fail(&e),
        }
    }

    tracing::info!("📋 Report sinks: {:?}", engine.sink_names());

    let results = Arc::new(engine)
        .run_batch(cli.queries.clone(), config.concurrent_requests())
        .await;

    let mut worst: Option<ErrorSeverity> = None;
    for (query, result) in results {
        match result {
            Ok(report) => {
                println!("{}\n", report);
            }
            Err(e) => {
                // 記錄詳細錯誤信息
                tracing::error!(
                    "❌ Audit of '{}' failed: {} (Category: {:?}, Severity: {:?})",
                    query,
                    e,
                    e.category(),
                    e.severity()
                );
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                eprintln!("❌ {}: {}", query, e.user_friendly_message());
                worst = worst.max(Some(e.severity()));
            }
        }
    }

    if let Some(severity) = worst {
        let exit_code = exit_code(severity);
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    tracing::info!("✅ All audits completed");
    Ok(())
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    // 根據錯誤嚴重程度決定退出碼
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: &AuditError) -> ! {
    tracing::error!("❌ Setup failed: {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(exit_code(e.severity()).max(1));
}
