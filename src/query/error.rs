use chrono::NaiveDateTime;
use thiserror::Error;

/// Input rejected before any request is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Table name cannot be empty")]
    EmptyTable,

    #[error("Stations list cannot be empty")]
    EmptyStations,

    #[error("Parameters list cannot be empty")]
    EmptyParameters,

    #[error("{bound} date is not a valid timestamp: '{value}'")]
    NotTemporal { bound: &'static str, value: String },

    #[error("Start date ({start}) must be before end date ({end})")]
    InvalidDateRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("SQL query cannot be empty")]
    EmptySql,

    #[error("Duplicate observation for station '{station}', parameter '{param}' at {date}")]
    DuplicateSeriesKey {
        station: String,
        param: String,
        date: NaiveDateTime,
    },

    #[error("Series column '{column}' is produced by more than one station/parameter pair")]
    DuplicateColumnName { column: String },

    #[error("Index column '{column}' contains duplicate values")]
    DuplicateIndex { column: String },
}
