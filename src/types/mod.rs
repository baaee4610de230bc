pub mod datetime_input;
pub mod envelope;
pub mod field_map;
pub mod into_utc_trait;
pub mod observer;
pub mod pivoted_table;
pub mod resources;
pub mod selection;
pub mod typed_table;
