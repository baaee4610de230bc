use crate::query::error::ValidationError;
use crate::transport::error::ApiError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LvMeteoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0}")]
    DataNotFound(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl From<PolarsError> for LvMeteoError {
    fn from(e: PolarsError) -> Self {
        LvMeteoError::Api(ApiError::DataFrame(e))
    }
}

impl From<serde_json::Error> for LvMeteoError {
    fn from(e: serde_json::Error) -> Self {
        LvMeteoError::Api(ApiError::JsonParse(e))
    }
}

impl LvMeteoError {
    pub fn is_validation(&self) -> bool {
        matches!(self, LvMeteoError::Validation(_))
    }

    pub fn is_api(&self) -> bool {
        matches!(self, LvMeteoError::Api(_))
    }

    pub fn is_data_not_found(&self) -> bool {
        matches!(self, LvMeteoError::DataNotFound(_))
    }
}
