use thiserror::Error;

/// Domain failures raised while turning raw cells into order records.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },

    #[error("invalid review score '{value}'")]
    InvalidScore { value: String },

    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },

    #[error("dataset contains no delivered orders")]
    NoDeliveryDates,
}
