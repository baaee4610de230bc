//! The JSON document returned by the datastore SQL endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One record as returned by the server: column name to raw JSON scalar.
pub type Row = Map<String, Value>;

/// Top-level response of `datastore_search_sql`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "error_text")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "non_empty_result")]
    pub result: Option<ResultSet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub fields: Vec<FieldMeta>,
    #[serde(default)]
    pub records: Vec<Row>,
}

/// Column metadata reported inline with every result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub id: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
}

/// The declared type of a column, driving value coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Numeric,
    Timestamp,
    /// Any tag the server reports that is not one of the above. Coerced as text.
    #[serde(other)]
    Unknown,
}

impl ResponseEnvelope {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// The server-side error message, or "Unknown error" if none was given.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("Unknown error")
    }
}

// CKAN reports errors either as a string or as an object of details.
fn error_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

// `"result": {}` and `"result": null` both mean there is no result.
fn non_empty_result<'de, D>(deserializer: D) -> Result<Option<ResultSet>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Map<String, Value>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(map) if map.is_empty() => Ok(None),
        Some(map) => ResultSet::deserialize(Value::Object(map))
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
