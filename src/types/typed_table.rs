//! Contains [`TypedTable`], the normalized result of a datastore query.

use crate::error::LvMeteoError;
use crate::query::error::ValidationError;
use crate::types::observer::{PipelineObserver, PipelineWarning};
use polars::prelude::{DataFrame, DataType};

/// A wrapper around a Polars `DataFrame` holding one datastore result with every
/// column coerced to its declared type.
///
/// Column dtypes follow the field metadata of the response:
///
/// | field type  | Polars dtype                         |
/// |-------------|--------------------------------------|
/// | `text`      | `String`                             |
/// | `numeric`   | `Float64`                            |
/// | `timestamp` | `Datetime(Milliseconds, None)` (UTC) |
///
/// Values that could not be coerced, and keys missing from a record, are null.
///
/// A table may designate one column as its index. The index column stays in the
/// frame; the wrapper only remembers its name and guarantees its values are
/// unique.
///
/// Instances are obtained from [`crate::LvMeteo::table`], [`crate::LvMeteo::sql`]
/// or, when the pivot is skipped, [`crate::LvMeteo::series`].
#[derive(Debug, Clone)]
pub struct TypedTable {
    /// The underlying Polars frame.
    pub frame: DataFrame,
    index: Option<String>,
}

impl TypedTable {
    pub fn new(frame: DataFrame) -> Self {
        Self { frame, index: None }
    }

    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        Self::new(DataFrame::empty())
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_index(name).is_some()
    }

    /// Name of the index column, if one was set.
    pub fn index_column(&self) -> Option<&str> {
        self.index.as_deref()
    }

    /// Designates `column` as the index of this table.
    ///
    /// A missing column is not an error: the observer receives
    /// [`PipelineWarning::IndexColumnNotFound`] and the table is returned
    /// unindexed. Empty tables are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateIndex`] if the column holds repeated
    /// values.
    pub fn with_index(
        mut self,
        column: &str,
        observer: &dyn PipelineObserver,
    ) -> Result<Self, LvMeteoError> {
        if self.is_empty() {
            return Ok(self);
        }
        if !self.has_column(column) {
            observer.on_warning(PipelineWarning::IndexColumnNotFound(column.to_string()));
            return Ok(self);
        }
        let unique = self
            .frame
            .column(column)?
            .as_materialized_series()
            .n_unique()?;
        if unique != self.frame.height() {
            return Err(ValidationError::DuplicateIndex {
                column: column.to_string(),
            }
            .into());
        }
        self.index = Some(column.to_string());
        Ok(self)
    }

    /// Returns the single row whose index value equals `key`.
    ///
    /// `None` if the table has no index or no row matches.
    pub fn lookup(&self, key: &str) -> Result<Option<DataFrame>, LvMeteoError> {
        let Some(index) = &self.index else {
            return Ok(None);
        };
        let as_text = self.frame.column(index)?.cast(&DataType::String)?;
        let position = as_text.str()?.into_iter().position(|v| v == Some(key));
        Ok(position.map(|row| self.frame.slice(row as i64, 1)))
    }
}

impl From<TypedTable> for DataFrame {
    fn from(table: TypedTable) -> Self {
        table.frame
    }
}
