//! Start/end bounds for time-series queries and the timestamp parsing shared
//! with response normalization.

use crate::query::error::ValidationError;
use crate::types::into_utc_trait::IntoUtcDateTime;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};

/// A query bound as supplied by the caller.
///
/// Chrono values are resolved immediately; text is kept as given and parsed when
/// the query is built, so a string that is not a timestamp surfaces as
/// [`ValidationError::NotTemporal`] instead of a panic at the call site.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use lvmeteo::DateTimeInput;
///
/// let a = DateTimeInput::from(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
/// let b = DateTimeInput::from("2024-01-01T00:00:00Z");
/// assert_eq!(a.resolve("Start").unwrap(), b.resolve("Start").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTimeInput {
    Instant(DateTime<Utc>),
    Text(String),
}

impl DateTimeInput {
    /// Resolves the bound to UTC wall-clock time.
    ///
    /// `bound` names the argument ("Start" / "End") in the validation error.
    pub fn resolve(self, bound: &'static str) -> Result<NaiveDateTime, ValidationError> {
        match self {
            DateTimeInput::Instant(dt) => Ok(dt.naive_utc()),
            DateTimeInput::Text(value) => {
                parse_timestamp(&value).ok_or(ValidationError::NotTemporal { bound, value })
            }
        }
    }
}

macro_rules! impl_from_chrono {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for DateTimeInput {
                fn from(value: $ty) -> Self {
                    DateTimeInput::Instant(value.into_utc())
                }
            }
        )*
    };
}

impl_from_chrono!(
    DateTime<Utc>,
    DateTime<FixedOffset>,
    DateTime<Local>,
    NaiveDateTime,
    NaiveDate
);

impl From<&str> for DateTimeInput {
    fn from(value: &str) -> Self {
        DateTimeInput::Text(value.to_string())
    }
}

impl From<String> for DateTimeInput {
    fn from(value: String) -> Self {
        DateTimeInput::Text(value)
    }
}

// `%#z` accepts "+02", "+0200" and "+02:00".
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO 8601-ish timestamp into UTC wall-clock time.
///
/// Values with an offset are converted to UTC; naive values are returned as-is.
/// A bare date maps to midnight. Returns `None` for anything else.
pub(crate) fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    let with_offset = match value.strip_suffix(|c| c == 'Z' || c == 'z') {
        Some(rest) => format!("{}+00:00", rest),
        None => value.to_string(),
    };
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&with_offset, format) {
            return Some(dt.naive_utc());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive_dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive_dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
}
