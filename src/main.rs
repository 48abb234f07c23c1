use anyhow::{Context, Result};
use log::{error, info};
use std::process;

use prodcon::cli;
use prodcon::config::{AppConfig, PipelineConfig};
use prodcon::logging;
use prodcon::output::{ConsoleSink, FileSink, MultiSink, ReportSink};
use prodcon::pipeline::Pipeline;
use prodcon::queue::QueueStrategy;
use prodcon::AnalysisReport;

/// Demonstration scenarios as (capacity, item count)
const DEMO_SCENARIOS: [(i64, i64); 4] = [(5, 20), (5, 0), (5, 1), (100, 50)];

fn main() {
    if let Err(e) = run() {
        error!("Application error: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::parse_args();
    cli::validate_args(&args)?;

    let mut config = match &args.config_file {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load()?,
    };
    cli::apply_overrides(&args, &mut config);

    logging::init_logger(config.logging.to_log_config()?)?;

    if args.demo {
        return run_demo(&config);
    }

    let settings = config.pipeline.validate()?;
    let mut pipeline = Pipeline::from_config(&config.pipeline)?.with_sink(build_sink(&config));
    let report = pipeline.run(settings.item_count)?;
    finish(&report)
}

fn run_demo(config: &AppConfig) -> Result<()> {
    info!("=== Producer-Consumer Pattern Demonstration ===");

    let mut failures = 0usize;
    for strategy in QueueStrategy::ALL {
        for (capacity, item_count) in DEMO_SCENARIOS {
            let pipeline_config = PipelineConfig {
                capacity,
                item_count,
                strategy,
                ..PipelineConfig::demo()
            };
            info!(
                "--- {} | capacity {} | {} items ---",
                strategy, capacity, item_count
            );

            let settings = pipeline_config.validate()?;
            let mut pipeline = Pipeline::from_config(&pipeline_config)?.with_sink(build_sink(config));
            let report = pipeline
                .run(settings.item_count)
                .with_context(|| format!("Demo scenario failed: {} capacity {} items {}", strategy, capacity, item_count))?;
            if !report.integrity_passed() {
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(anyhow::anyhow!("{} demonstration run(s) failed verification", failures));
    }
    info!("All demonstration runs completed successfully");
    Ok(())
}

fn build_sink(config: &AppConfig) -> Box<dyn ReportSink> {
    let mut sink = MultiSink::new().push(Box::new(ConsoleSink::new()));
    if let Some(path) = &config.report.file {
        sink = sink.push(Box::new(FileSink::new(path.clone(), config.report.format)));
    }
    Box::new(sink)
}

fn finish(report: &AnalysisReport) -> Result<()> {
    if report.integrity_passed() {
        Ok(())
    } else {
        Err(anyhow::anyhow!("Transfer verification failed for run {}", report.run_id))
    }
}
