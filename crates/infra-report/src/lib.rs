// devsweep Infrastructure - File Reports
// Implements: ReportSink as JSON/CSV files in an output directory

mod config;
mod file_sink;

pub use config::ReportConfig;
pub use file_sink::FileReportSink;
