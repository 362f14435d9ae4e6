use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonthwiseError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column(s): {0}")]
    Schema(String),

    #[error("Data contains null or missing value(s): {0}")]
    DataIntegrity(String),

    #[error("Invalid field type: {0}")]
    FieldType(String),

    #[error("Invalid value(s): {0}")]
    InvalidValue(String),

    #[error("Invalid date: {0}")]
    DateFormat(String),

    #[error("Unknown category reference: {0}")]
    ReferentialIntegrity(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, MonthwiseError>;
