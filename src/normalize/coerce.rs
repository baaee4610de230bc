//! Per-cell coercion of raw JSON values into the declared column type.
//!
//! None of these functions fail: a value that does not fit the target type
//! becomes `None`, which ends up as a null in the frame.

use crate::types::datetime_input::parse_timestamp;
use crate::types::envelope::FieldType;
use chrono::NaiveDateTime;
use polars::prelude::{Column, DataType, NamedFrom, PolarsResult, Series, TimeUnit};
use serde_json::Value;

pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

pub fn coerce_numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| !v.is_nan())
}

/// UTC wall-clock time of a timestamp cell.
pub fn coerce_timestamp(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_timestamp(s),
        _ => None,
    }
}

/// Builds a typed Polars column from the raw cells of one response column.
///
/// `None` cells stand for keys absent from a record.
pub(crate) fn typed_column<'a, I>(name: &str, field_type: FieldType, cells: I) -> PolarsResult<Column>
where
    I: Iterator<Item = Option<&'a Value>>,
{
    let series = match field_type {
        FieldType::Numeric => {
            let values: Vec<Option<f64>> = cells.map(|c| c.and_then(coerce_numeric)).collect();
            Series::new(name.into(), values)
        }
        FieldType::Timestamp => {
            let millis: Vec<Option<i64>> = cells
                .map(|c| {
                    c.and_then(coerce_timestamp)
                        .map(|dt| dt.and_utc().timestamp_millis())
                })
                .collect();
            Series::new(name.into(), millis)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        }
        FieldType::Text | FieldType::Unknown => {
            let values: Vec<Option<String>> = cells.map(|c| c.and_then(coerce_text)).collect();
            Series::new(name.into(), values)
        }
    };
    Ok(Column::from(series))
}
