use crate::error::LvMeteoError;
use crate::query::error::ValidationError;
use crate::types::observer::{PipelineObserver, PipelineWarning};
use crate::types::pivoted_table::{PivotedTable, SeriesKey, SeriesTable, DATE_COLUMN};
use crate::types::typed_table::TypedTable;
use chrono::DateTime;
use polars::prelude::{Column, DataFrame, DataType, NamedFrom, Series, TimeUnit};
use std::collections::{BTreeMap, BTreeSet, HashSet};

pub const STATION_COLUMN: &str = "station_id";
pub const PARAM_COLUMN: &str = "param";
pub const VALUE_COLUMN: &str = "value";

/// Pivots long observation rows (`station_id`, `param`, `date`, `value`) into a
/// [`PivotedTable`] with one column per station/parameter pair.
///
/// Exact duplicate rows are dropped, keeping the first. Rows without a
/// timestamp are dropped and reported as [`PipelineWarning::MissingTimestamps`];
/// rows without a station or parameter as [`PipelineWarning::MissingSeriesKeys`].
/// Tables with no rows or without a `date` column are returned unchanged as
/// [`SeriesTable::Flat`].
///
/// # Errors
///
/// [`ValidationError::DuplicateSeriesKey`] if two rows share station, parameter
/// and timestamp but differ in value. [`ValidationError::DuplicateColumnName`] if
/// two distinct pairs render to the same `station/param` column name. Missing or
/// mistyped columns surface as Polars errors.
pub fn pivot_series(
    table: TypedTable,
    observer: &dyn PipelineObserver,
) -> Result<SeriesTable, LvMeteoError> {
    if table.is_empty() || !table.has_column(DATE_COLUMN) {
        return Ok(SeriesTable::Flat(table));
    }
    let frame = table.frame();

    let stations = frame.column(STATION_COLUMN)?.cast(&DataType::String)?;
    let stations = stations.str()?;
    let params = frame.column(PARAM_COLUMN)?.cast(&DataType::String)?;
    let params = params.str()?;
    let values = frame.column(VALUE_COLUMN)?.cast(&DataType::Float64)?;
    let values = values.f64()?;
    let dates = frame.column(DATE_COLUMN)?.datetime()?;
    let to_millis = millis_per_unit(dates.time_unit());

    let mut seen_rows = HashSet::new();
    let mut series: BTreeMap<SeriesKey, BTreeMap<i64, Option<f64>>> = BTreeMap::new();
    let mut timestamps = BTreeSet::new();
    let mut undated = 0usize;
    let mut unkeyed = 0usize;

    for row in 0..frame.height() {
        let (Some(station), Some(param)) = (stations.get(row), params.get(row)) else {
            unkeyed += 1;
            continue;
        };
        let value = values.get(row);
        let Some(date) = dates.get(row).map(to_millis) else {
            undated += 1;
            continue;
        };

        if !seen_rows.insert((station, param, date, value.map(f64::to_bits))) {
            continue;
        }

        let key = SeriesKey::new(station, param);
        let cells = series.entry(key).or_default();
        if cells.insert(date, value).is_some() {
            return Err(ValidationError::DuplicateSeriesKey {
                station: station.to_string(),
                param: param.to_string(),
                date: DateTime::from_timestamp_millis(date)
                    .map(|dt| dt.naive_utc())
                    .unwrap_or_default(),
            }
            .into());
        }
        timestamps.insert(date);
    }

    if undated > 0 {
        observer.on_warning(PipelineWarning::MissingTimestamps(undated));
    }
    if unkeyed > 0 {
        observer.on_warning(PipelineWarning::MissingSeriesKeys(unkeyed));
    }

    let row_keys: Vec<i64> = timestamps.into_iter().collect();
    let date_column = Series::new(DATE_COLUMN.into(), row_keys.clone()).cast(
        &DataType::Datetime(TimeUnit::Milliseconds, Some("UTC".into())),
    )?;

    let mut names = HashSet::with_capacity(series.len());
    let mut columns = Vec::with_capacity(series.len() + 1);
    columns.push(Column::from(date_column));
    for (key, cells) in &series {
        let name = key.to_string();
        if !names.insert(name.clone()) {
            return Err(ValidationError::DuplicateColumnName { column: name }.into());
        }
        let aligned: Vec<Option<f64>> = row_keys
            .iter()
            .map(|ts| cells.get(ts).copied().flatten())
            .collect();
        columns.push(Column::new(name.into(), aligned));
    }

    let keys = series.into_keys().collect();
    Ok(SeriesTable::Pivoted(PivotedTable::new(
        DataFrame::new(columns)?,
        keys,
    )))
}

fn millis_per_unit(unit: TimeUnit) -> fn(i64) -> i64 {
    match unit {
        TimeUnit::Nanoseconds => |v| v.div_euclid(1_000_000),
        TimeUnit::Microseconds => |v| v.div_euclid(1_000),
        TimeUnit::Milliseconds => |v| v,
    }
}
