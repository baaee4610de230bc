//! SQL generation for the datastore endpoint.
//!
//! Identifiers are placed between quotes verbatim. Nothing is escaped, so
//! station ids, parameter codes and table ids must not contain quote characters
//! or other SQL syntax; this is not a sanitizer.

use crate::query::error::ValidationError;
use crate::types::datetime_input::DateTimeInput;
use crate::types::selection::Selection;
use chrono::NaiveDateTime;

/// A validated time-series query. Build it with [`QuerySpec::new`] and render it
/// with [`QuerySpec::to_sql`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    table: String,
    stations: Vec<String>,
    parameters: Vec<String>,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl QuerySpec {
    /// Validates the inputs of a time-series query.
    ///
    /// # Errors
    ///
    /// A [`ValidationError`] if the table id is empty, no stations or parameters
    /// remain after dropping blanks, a bound is not a timestamp, or `start` is not
    /// strictly before `end`.
    pub fn new(
        table: &str,
        stations: impl Into<Selection>,
        parameters: impl Into<Selection>,
        start: impl Into<DateTimeInput>,
        end: impl Into<DateTimeInput>,
    ) -> Result<Self, ValidationError> {
        if table.trim().is_empty() {
            return Err(ValidationError::EmptyTable);
        }
        let stations = stations.into().into_vec();
        if stations.is_empty() {
            return Err(ValidationError::EmptyStations);
        }
        let parameters = parameters.into().into_vec();
        if parameters.is_empty() {
            return Err(ValidationError::EmptyParameters);
        }
        let start = start.into().resolve("Start")?;
        let end = end.into().resolve("End")?;
        if start >= end {
            return Err(ValidationError::InvalidDateRange { start, end });
        }

        Ok(Self {
            table: table.to_string(),
            stations,
            parameters,
            start,
            end,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn to_sql(&self) -> String {
        format!(
            r#"SELECT * FROM "{table}" WHERE "STATION_ID" IN ({stations}) AND "ABBREVIATION" IN ({parameters}) AND "DATETIME" BETWEEN '{start}' AND '{end}'"#,
            table = self.table,
            stations = quoted_list(&self.stations),
            parameters = quoted_list(&self.parameters),
            start = iso_format(self.start),
            end = iso_format(self.end),
        )
    }
}

/// `SELECT *` over a whole resource.
pub fn select_all_sql(resource_id: &str) -> Result<String, ValidationError> {
    if resource_id.trim().is_empty() {
        return Err(ValidationError::EmptyTable);
    }
    Ok(format!(r#"SELECT * FROM "{}""#, resource_id))
}

/// Rejects statements that are empty or only whitespace.
pub fn ensure_sql(sql: &str) -> Result<&str, ValidationError> {
    if sql.trim().is_empty() {
        Err(ValidationError::EmptySql)
    } else {
        Ok(sql)
    }
}

fn quoted_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(",")
}

fn iso_format(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Timelike, Utc};

    fn jan(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn renders_expected_statement() {
        let query = QuerySpec::new("T1", ["A", "B"], ["P1", "P2"], jan(1), jan(2)).unwrap();
        assert_eq!(
            query.to_sql(),
            r#"SELECT * FROM "T1" WHERE "STATION_ID" IN ('A','B') AND "ABBREVIATION" IN ('P1','P2') AND "DATETIME" BETWEEN '2024-01-01T00:00:00' AND '2024-01-02T00:00:00'"#
        );
    }

    #[test]
    fn scalar_and_single_element_list_agree() {
        let scalar = QuerySpec::new("T1", "A", "P1", jan(1), jan(2)).unwrap();
        let list = QuerySpec::new("T1", vec!["A"], vec!["P1".to_string()], jan(1), jan(2)).unwrap();
        assert_eq!(scalar.to_sql(), list.to_sql());
    }

    #[test]
    fn same_inputs_same_sql() {
        let build = || {
            QuerySpec::new("T1", ["A"], ["P1"], jan(1), jan(3))
                .unwrap()
                .to_sql()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn bounds_accept_text_and_offsets() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let a = QuerySpec::new("T1", "A", "P1", utc, "2024-01-02").unwrap();
        let b = QuerySpec::new("T1", "A", "P1", "2024-01-01T02:00:00+02:00", jan(2)).unwrap();
        assert_eq!(a.to_sql(), b.to_sql());
        let c = QuerySpec::new("T1", "A", "P1", "2024-01-01T00:00Z", "2024-01-02 02:00:00+02")
            .unwrap();
        assert_eq!(a.to_sql(), c.to_sql());
    }

    #[test]
    fn fractional_seconds_are_kept() {
        let start = jan(1).with_nanosecond(500_000_000).unwrap();
        let query = QuerySpec::new("T1", "A", "P1", start, jan(2)).unwrap();
        assert!(query.to_sql().contains("'2024-01-01T00:00:00.500'"));
    }

    #[test]
    fn each_invalid_input_is_rejected() {
        assert_eq!(
            QuerySpec::new("", "A", "P1", jan(1), jan(2)),
            Err(ValidationError::EmptyTable)
        );
        assert_eq!(
            QuerySpec::new("T1", Vec::<String>::new(), "P1", jan(1), jan(2)),
            Err(ValidationError::EmptyStations)
        );
        assert_eq!(
            QuerySpec::new("T1", "A", "", jan(1), jan(2)),
            Err(ValidationError::EmptyParameters)
        );
        assert_eq!(
            QuerySpec::new("T1", "A", "P1", jan(2), jan(2)),
            Err(ValidationError::InvalidDateRange {
                start: jan(2),
                end: jan(2)
            })
        );
        assert!(matches!(
            QuerySpec::new("T1", "A", "P1", jan(3), jan(2)),
            Err(ValidationError::InvalidDateRange { .. })
        ));
        assert!(matches!(
            QuerySpec::new("T1", "A", "P1", "last week", jan(2)),
            Err(ValidationError::NotTemporal { bound: "Start", .. })
        ));
    }

    #[test]
    fn whole_table_and_empty_statements() {
        assert_eq!(select_all_sql("abc").unwrap(), r#"SELECT * FROM "abc""#);
        assert_eq!(select_all_sql(" "), Err(ValidationError::EmptyTable));
        assert_eq!(ensure_sql("   "), Err(ValidationError::EmptySql));
        assert_eq!(ensure_sql("SELECT 1"), Ok("SELECT 1"));
    }
}
