//! Wide time-series tables produced by the reshape step.

use crate::types::typed_table::TypedTable;
use chrono::{DateTime, Utc};
use polars::prelude::{DataFrame, PolarsResult};
use std::fmt;

/// Name of the row-key column of a [`PivotedTable`].
pub const DATE_COLUMN: &str = "date";

/// Identifies one series (one column) of a [`PivotedTable`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesKey {
    pub station: String,
    pub param: String,
}

impl SeriesKey {
    pub fn new(station: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            param: param.into(),
        }
    }
}

/// Formats as the column name used in the pivoted frame, `"<station>/<param>"`.
impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.station, self.param)
    }
}

/// A single long-format measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub station: String,
    pub param: String,
    pub date: DateTime<Utc>,
    pub value: f64,
}

/// A wrapper around a wide Polars `DataFrame`: one row per timestamp and one
/// `Float64` column per station/parameter pair.
///
/// The first column, [`DATE_COLUMN`], is a `Datetime(Milliseconds, "UTC")` sorted
/// ascending without repeats. Series columns follow in [`SeriesKey`] order and are
/// named after the key (`"RIGASLU/HTDRY"`). A cell is null where the series has
/// no observation at that time.
#[derive(Debug, Clone)]
pub struct PivotedTable {
    /// The underlying Polars frame.
    pub frame: DataFrame,
    keys: Vec<SeriesKey>,
}

impl PivotedTable {
    pub(crate) fn new(frame: DataFrame, keys: Vec<SeriesKey>) -> Self {
        Self { frame, keys }
    }

    /// The series in column order.
    pub fn keys(&self) -> &[SeriesKey] {
        &self.keys
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Row keys in order.
    pub fn timestamps(&self) -> PolarsResult<Vec<DateTime<Utc>>> {
        let dates = self.frame.column(DATE_COLUMN)?.datetime()?;
        Ok(dates
            .into_iter()
            .flatten()
            .filter_map(DateTime::from_timestamp_millis)
            .collect())
    }

    /// Values of one series aligned with [`PivotedTable::timestamps`].
    ///
    /// `None` if the series is not part of the table.
    pub fn series(&self, station: &str, param: &str) -> PolarsResult<Option<Vec<Option<f64>>>> {
        let key = SeriesKey::new(station, param);
        if !self.keys.contains(&key) {
            return Ok(None);
        }
        let values = self.frame.column(&key.to_string())?.f64()?;
        Ok(Some(values.into_iter().collect()))
    }

    /// Turns the table back into long observations, ordered by series then time.
    ///
    /// Null cells are skipped, so for inputs with unique keys and non-null values
    /// this recovers exactly the rows that were pivoted.
    pub fn unpivot(&self) -> PolarsResult<Vec<Observation>> {
        let dates = self.frame.column(DATE_COLUMN)?.datetime()?;
        let dates: Vec<Option<DateTime<Utc>>> = dates
            .into_iter()
            .map(|ms| ms.and_then(DateTime::from_timestamp_millis))
            .collect();

        let mut observations = Vec::new();
        for key in &self.keys {
            let values = self.frame.column(&key.to_string())?.f64()?;
            for (date, value) in dates.iter().zip(values.into_iter()) {
                if let (Some(date), Some(value)) = (date, value) {
                    observations.push(Observation {
                        station: key.station.clone(),
                        param: key.param.clone(),
                        date: *date,
                        value,
                    });
                }
            }
        }
        Ok(observations)
    }
}

/// Result of a time-series request.
///
/// The pivot needs rows and a `date` column; when either is missing the
/// normalized table is handed back untouched as [`SeriesTable::Flat`].
#[derive(Debug, Clone)]
pub enum SeriesTable {
    Pivoted(PivotedTable),
    Flat(TypedTable),
}

impl SeriesTable {
    pub fn frame(&self) -> &DataFrame {
        match self {
            SeriesTable::Pivoted(table) => &table.frame,
            SeriesTable::Flat(table) => &table.frame,
        }
    }

    pub fn into_frame(self) -> DataFrame {
        match self {
            SeriesTable::Pivoted(table) => table.frame,
            SeriesTable::Flat(table) => table.frame,
        }
    }

    pub fn height(&self) -> usize {
        self.frame().height()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    pub fn as_pivoted(&self) -> Option<&PivotedTable> {
        match self {
            SeriesTable::Pivoted(table) => Some(table),
            SeriesTable::Flat(_) => None,
        }
    }

    pub fn into_pivoted(self) -> Option<PivotedTable> {
        match self {
            SeriesTable::Pivoted(table) => Some(table),
            SeriesTable::Flat(_) => None,
        }
    }
}
