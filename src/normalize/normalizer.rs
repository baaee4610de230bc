use crate::normalize::coerce::typed_column;
use crate::types::envelope::{FieldMeta, FieldType, Row};
use crate::types::field_map::FieldMap;
use crate::types::observer::{PipelineObserver, PipelineWarning};
use crate::types::typed_table::TypedTable;
use polars::prelude::{Column, DataFrame, PolarsResult};
use std::collections::{HashMap, HashSet};

/// Converts the `fields` + `records` of a successful response into a [`TypedTable`].
///
/// With a field map, the table holds exactly the mapped columns, in map order,
/// under their friendly names. Without one, it holds every column of the
/// response: declared fields first, then any undeclared keys in first-seen order.
///
/// Mapped columns that the response does not contain are reported as
/// [`PipelineWarning::ColumnNotFound`] and filled with nulls. An empty record
/// list produces a zero-row table and a [`PipelineWarning::EmptyResult`].
pub fn records_to_table(
    fields: &[FieldMeta],
    records: &[Row],
    field_map: Option<&FieldMap>,
    observer: &dyn PipelineObserver,
) -> PolarsResult<TypedTable> {
    let field_types: HashMap<&str, FieldType> = fields
        .iter()
        .map(|f| (f.id.as_str(), f.field_type))
        .collect();

    let selected: Vec<(&str, &str)> = match field_map {
        Some(map) => {
            for api_name in map.api_names() {
                let declared = field_types.contains_key(api_name);
                if !declared && !records.iter().any(|r| r.contains_key(api_name)) {
                    observer.on_warning(PipelineWarning::ColumnNotFound(api_name.to_string()));
                }
            }
            map.iter().collect()
        }
        None => response_columns(fields, records)
            .into_iter()
            .map(|name| (name, name))
            .collect(),
    };

    if records.is_empty() {
        observer.on_warning(PipelineWarning::EmptyResult);
    }

    let columns = selected
        .into_iter()
        .map(|(output_name, api_name)| {
            let field_type = field_types
                .get(api_name)
                .copied()
                .unwrap_or(FieldType::Text);
            typed_column(
                output_name,
                field_type,
                records.iter().map(|record| record.get(api_name)),
            )
        })
        .collect::<PolarsResult<Vec<Column>>>()?;

    Ok(TypedTable::new(DataFrame::new(columns)?))
}

fn response_columns<'a>(fields: &'a [FieldMeta], records: &'a [Row]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let declared = fields.iter().map(|f| f.id.as_str());
    let undeclared = records.iter().flat_map(|r| r.keys().map(String::as_str));
    declared
        .chain(undeclared)
        .filter(|name| seen.insert(*name))
        .collect()
}
