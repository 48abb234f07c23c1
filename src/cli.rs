use anyhow::Result;
use clap::Parser;
use log::debug;
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::output::ReportFormat;
use crate::queue::QueueStrategy;

/// Bounded-buffer producer/consumer pipeline
#[derive(Parser, Debug)]
#[command(name = "prodcon")]
#[command(about = "Run a bounded-buffer producer/consumer pipeline and analyse the transfer")]
#[command(version)]
pub struct Args {
    /// Queue capacity (overrides configuration)
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    pub capacity: Option<i64>,

    /// Number of items to transfer (overrides configuration)
    #[arg(short = 'n', long, value_name = "N", allow_negative_numbers = true)]
    pub items: Option<i64>,

    /// Queue strategy: native-blocking or condition-gated
    #[arg(short, long, value_name = "STRATEGY")]
    pub strategy: Option<QueueStrategy>,

    /// Run the demonstration scenarios with both strategies
    #[arg(long)]
    pub demo: bool,

    /// Verbose output (debug level logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (error level logging only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug output (trace level logging)
    #[arg(long)]
    pub debug: bool,

    /// Log format: text or json
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Log file path for file output
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Append each report to this results file
    #[arg(long, value_name = "FILE")]
    pub report_file: Option<PathBuf>,

    /// Results file format: text or json
    #[arg(long, value_name = "FORMAT")]
    pub report_format: Option<ReportFormat>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    let args = Args::parse();
    debug!("Parsed CLI arguments: {:?}", args);
    args
}

/// Validate CLI argument combinations
pub fn validate_args(args: &Args) -> Result<()> {
    let log_flags_count = [args.verbose, args.quiet, args.debug]
        .iter()
        .filter(|&&flag| flag)
        .count();

    if log_flags_count > 1 {
        return Err(anyhow::anyhow!(
            "Conflicting log level flags: only one of --verbose, --quiet, or --debug may be specified"
        ));
    }

    if let Some(format) = &args.log_format {
        match format.to_lowercase().as_str() {
            "text" | "json" => {}
            _ => {
                return Err(anyhow::anyhow!(
                    "Invalid log format '{}'. Valid options: text, json",
                    format
                ))
            }
        }
    }

    if args.demo && (args.capacity.is_some() || args.items.is_some() || args.strategy.is_some()) {
        return Err(anyhow::anyhow!(
            "--demo runs fixed scenarios and cannot be combined with --capacity, --items or --strategy"
        ));
    }

    Ok(())
}

/// Fold command line overrides into the loaded configuration
pub fn apply_overrides(args: &Args, config: &mut AppConfig) {
    if let Some(capacity) = args.capacity {
        config.pipeline.capacity = capacity;
    }
    if let Some(items) = args.items {
        config.pipeline.item_count = items;
    }
    if let Some(strategy) = args.strategy {
        config.pipeline.strategy = strategy;
    }

    let level = if args.debug {
        Some("trace")
    } else if args.verbose {
        Some("debug")
    } else if args.quiet {
        Some("error")
    } else {
        None
    };
    if let Some(level) = level {
        config.logging.console_level = level.to_string();
    }
    if let Some(format) = &args.log_format {
        config.logging.format = format.clone();
    }
    if let Some(file) = &args.log_file {
        config.logging.file = Some(file.clone());
    }

    if let Some(file) = &args.report_file {
        config.report.file = Some(file.clone());
    }
    if let Some(format) = args.report_format {
        config.report.format = format;
    }
}
