//! Report sinks
//!
//! A [`ReportSink`] accepts a finished [`AnalysisReport`] and delivers it
//! somewhere: the log, stdout, a results file, or memory. Sinks are the only
//! place report I/O happens.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::output::reports::render_text;
use crate::stats::AnalysisReport;

/// Receives the report of each completed run
pub trait ReportSink: Send {
    fn emit(&self, report: &AnalysisReport) -> Result<()>;

    /// Name used when logging sink failures
    fn name(&self) -> &str;
}

/// Serialised form written by file sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Invalid report format: {}. Valid options: text, json", s)),
        }
    }
}

/// Logs every rendered line at info level
#[derive(Debug, Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

impl ReportSink for LogSink {
    fn emit(&self, report: &AnalysisReport) -> Result<()> {
        for line in render_text(report, false).lines() {
            log::info!("{}", line);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Prints the rendered report to stdout
#[derive(Debug)]
pub struct ConsoleSink {
    colours: bool,
}

impl ConsoleSink {
    /// Colour is enabled unless `NO_COLOR` is set
    pub fn new() -> Self {
        Self {
            colours: std::env::var_os("NO_COLOR").is_none(),
        }
    }

    pub fn with_colours(colours: bool) -> Self {
        Self { colours }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for ConsoleSink {
    fn emit(&self, report: &AnalysisReport) -> Result<()> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", render_text(report, self.colours)).context("Failed to write report to stdout")?;
        stdout.flush().context("Failed to flush stdout")
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Appends each report to a results file, creating parent directories
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    format: ReportFormat,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>, format: ReportFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for FileSink {
    fn emit(&self, report: &AnalysisReport) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create results directory: {}", parent.display()))?;
        }

        let entry = match self.format {
            ReportFormat::Text => render_text(report, false),
            ReportFormat::Json => {
                let mut line = serde_json::to_string(report).context("Failed to serialize report to JSON")?;
                line.push('\n');
                line
            }
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open results file: {}", self.path.display()))?;
        file.write_all(entry.as_bytes())
            .with_context(|| format!("Failed to write results file: {}", self.path.display()))?;

        log::info!("Analysis results saved to: {}", self.path.display());
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Collects reports in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    reports: Arc<Mutex<Vec<AnalysisReport>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the collected reports; stays valid after the sink is
    /// moved into a pipeline
    pub fn handle(&self) -> Arc<Mutex<Vec<AnalysisReport>>> {
        Arc::clone(&self.reports)
    }
}

impl ReportSink for MemorySink {
    fn emit(&self, report: &AnalysisReport) -> Result<()> {
        self.reports.lock().push(report.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Fans a report out to several sinks.
///
/// Every sink is attempted; the first failure is returned after the rest ran.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn ReportSink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, sink: Box<dyn ReportSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ReportSink for MultiSink {
    fn emit(&self, report: &AnalysisReport) -> Result<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.emit(report) {
                log::warn!("Report sink '{}' failed: {:#}", sink.name(), e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "multi"
    }
}
