mod error;
mod lvmeteo;
mod normalize;
mod query;
mod reshape;
mod transport;
mod types;

pub use error::LvMeteoError;
pub use lvmeteo::*;

pub use query::builder::{ensure_sql, select_all_sql, QuerySpec};
pub use query::error::ValidationError;

pub use transport::error::ApiError;
pub use transport::{
    CurlTransport, HttpTransport, SqlTransport, Transport, TransportOptions,
    DEFAULT_PROCESS_TIMEOUT, DEFAULT_TIMEOUT,
};

pub use normalize::coerce::{coerce_numeric, coerce_text, coerce_timestamp};
pub use normalize::normalizer::records_to_table;
pub use reshape::pivot::pivot_series;

pub use types::datetime_input::DateTimeInput;
pub use types::envelope::{FieldMeta, FieldType, ResponseEnvelope, ResultSet, Row};
pub use types::field_map::FieldMap;
pub use types::into_utc_trait::IntoUtcDateTime;
pub use types::observer::{LogObserver, PipelineObserver, PipelineWarning, RecordingObserver};
pub use types::pivoted_table::{Observation, PivotedTable, SeriesKey, SeriesTable, DATE_COLUMN};
pub use types::resources::{MeteoTable, ResourceId, API_BASE_URL};
pub use types::selection::Selection;
pub use types::typed_table::TypedTable;
