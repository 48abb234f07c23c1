//! Report output module

pub mod reports;
pub mod sink;

pub use reports::{format_compact_table, render_text};
pub use sink::{ConsoleSink, FileSink, LogSink, MemorySink, MultiSink, ReportFormat, ReportSink};
