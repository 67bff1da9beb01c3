mod cli;
mod report;
mod settings;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use lexcrawl_engine::{BatchOrchestrator, EngineConfig, SingleDocumentPipeline};
use lexcrawl_logging::{crawl_debug, crawl_error, crawl_info, crawl_warn, LogDestination};
use log::LevelFilter;
use tokio_util::sync::CancellationToken;

use crate::cli::{Cli, Commands};
use crate::settings::FileConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    lexcrawl_logging::initialize(
        log_destination(cli.log_file.clone()),
        level_for(cli.verbose),
    );

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            crawl_error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn log_destination(log_file: Option<PathBuf>) -> LogDestination {
    match log_file {
        Some(path) => LogDestination::Both(path),
        None => LogDestination::Terminal,
    }
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let file = match &cli.settings.config {
        Some(path) => settings::load_file_config(path)?,
        None => FileConfig::default(),
    };
    let config = settings::resolve(&cli.settings, file)?;
    crawl_debug!("Effective settings: {:?}", config);

    match cli.command {
        Commands::Fetch { url } => fetch_one(&config, &url).await,
        Commands::Batch {
            urls,
            input,
            report,
        } => {
            let urls = settings::collect_urls(&urls, input.as_deref())?;
            run_batch(&config, &urls, report.as_deref()).await
        }
    }
}

async fn fetch_one(config: &EngineConfig, url: &str) -> Result<ExitCode> {
    let pipeline = SingleDocumentPipeline::from_config(config)
        .context("cannot set up the document pipeline")?;
    match pipeline.run(url, &config.output_dir).await {
        Ok(path) => {
            crawl_info!("Saved {} -> {:?}", url, path);
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            crawl_warn!("Failed {} at {} stage: {}", url, err.stage(), err.reason());
            eprintln!("{url}: {} failed: {}", err.stage(), err.reason());
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_batch(
    config: &EngineConfig,
    urls: &[String],
    report_path: Option<&Path>,
) -> Result<ExitCode> {
    let pipeline = SingleDocumentPipeline::from_config(config)
        .context("cannot set up the document pipeline")?;
    let orchestrator = BatchOrchestrator::new(pipeline, config.delay);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            crawl_warn!("Interrupted; remaining items will be skipped");
            on_interrupt.cancel();
        }
    });

    let report = orchestrator
        .run_until_cancelled(urls, &config.output_dir, &cancel)
        .await;
    for line in report::summary_lines(&report) {
        println!("{line}");
    }

    if let Some(path) = report_path {
        let written = report::write_json_report(&report, path, (config.clock)())?;
        crawl_info!("Report written to {:?}", written);
    }
    Ok(ExitCode::SUCCESS)
}
