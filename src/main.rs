use anyhow::Context;
use clap::Parser;
use link_import::config::toml_config::LogFormat;
use link_import::utils::error::ErrorSeverity;
use link_import::utils::{logger, validation::Validate};
use link_import::{
    build_runner, CliConfig, ImportConfig, ImportError, ImportLinksRequest, RunReport,
};

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn report_error(e: &ImportError) {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
}

fn print_report(report: &RunReport) {
    match &report.outcome {
        Ok(stats) => println!(
            "✅ {}: {} new link(s), checkpoint {}",
            report.source,
            stats.links_count,
            stats.dt.to_rfc3339()
        ),
        Err(e) => {
            println!("❌ {}: {}", report.source, e);
            report_error(e);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = ImportConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config))?;

    match config.logging.format {
        LogFormat::Json => logger::init_json_logger(),
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
    }
    tracing::info!(config = %cli.config, "Starting link-import");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        report_error(&e);
        std::process::exit(exit_code(e.severity()));
    }

    let only = cli.source_filter()?;
    let runner = build_runner(&config, only)?;

    if cli.dry_run {
        for engine in runner.engines() {
            match engine.checkpoint().await? {
                Some(stats) => println!(
                    "{}: last import at {} ({} link(s))",
                    engine.source(),
                    stats.dt.to_rfc3339(),
                    stats.links_count
                ),
                None => println!("{}: never imported, next run fetches everything", engine.source()),
            }
        }
        return Ok(());
    }

    let request = if cli.send_results {
        ImportLinksRequest::with_results()
    } else {
        config.request()
    };

    let reports = runner.run_all(&request).await;
    for report in &reports {
        print_report(report);
    }

    let worst = reports
        .iter()
        .filter_map(|r| r.outcome.as_ref().err())
        .map(ImportError::severity)
        .max();

    if let Some(severity) = worst {
        let code = exit_code(severity);
        if code > 0 {
            std::process::exit(code);
        }
    }

    Ok(())
}
