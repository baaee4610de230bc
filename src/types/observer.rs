//! Notifications emitted while a request moves through the pipeline.
//!
//! The client holds an `Arc<dyn PipelineObserver>`; the default [`LogObserver`]
//! forwards everything to the `log` facade. Supply your own to collect warnings
//! programmatically.

use log::{debug, info, warn};
use std::fmt;
use std::sync::Mutex;

/// A non-fatal condition worth surfacing to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineWarning {
    /// The query succeeded but matched no records.
    EmptyResult,
    /// A column named in the field map is not present in the response.
    ColumnNotFound(String),
    /// The requested index column is not present in the table.
    IndexColumnNotFound(String),
    /// Rows without a timestamp were left out of the pivot.
    MissingTimestamps(usize),
    /// Rows without a station or parameter were left out of the pivot.
    MissingSeriesKeys(usize),
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineWarning::EmptyResult => write!(f, "No records found for the query"),
            PipelineWarning::ColumnNotFound(column) => {
                write!(f, "Column '{}' not found in response", column)
            }
            PipelineWarning::IndexColumnNotFound(column) => {
                write!(f, "Index column '{}' not found in data", column)
            }
            PipelineWarning::MissingTimestamps(count) => {
                write!(f, "Dropped {} rows without a timestamp", count)
            }
            PipelineWarning::MissingSeriesKeys(count) => {
                write!(f, "Dropped {} rows without a station or parameter", count)
            }
        }
    }
}

pub trait PipelineObserver: Send + Sync {
    /// Called with every SQL statement right before it is sent.
    fn on_sql(&self, _sql: &str) {}

    /// Called once a successful response has been decoded.
    fn on_records(&self, _count: usize) {}

    fn on_warning(&self, warning: PipelineWarning);
}

/// Forwards pipeline events to the `log` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn on_sql(&self, sql: &str) {
        info!("{}", sql);
    }

    fn on_records(&self, count: usize) {
        debug!("Retrieved {} records", count);
    }

    fn on_warning(&self, warning: PipelineWarning) {
        warn!("{}", warning);
    }
}

/// Keeps every event in memory; handy for tests and for callers that want to
/// inspect warnings after a call.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    statements: Mutex<Vec<String>>,
    warnings: Mutex<Vec<PipelineWarning>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn warnings(&self) -> Vec<PipelineWarning> {
        self.warnings
            .lock()
            .map(|w| w.clone())
            .unwrap_or_default()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_sql(&self, sql: &str) {
        if let Ok(mut statements) = self.statements.lock() {
            statements.push(sql.to_string());
        }
    }

    fn on_warning(&self, warning: PipelineWarning) {
        if let Ok(mut warnings) = self.warnings.lock() {
            warnings.push(warning);
        }
    }
}
