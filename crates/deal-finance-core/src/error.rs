use thiserror::Error;

#[derive(Debug, Error)]
pub enum DealFinanceError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Nothing to export: scenario history is empty")]
    NothingToExport,

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<serde_json::Error> for DealFinanceError {
    fn from(e: serde_json::Error) -> Self {
        DealFinanceError::SerializationError(e.to_string())
    }
}

#[cfg(feature = "scenarios")]
impl From<csv::Error> for DealFinanceError {
    fn from(e: csv::Error) -> Self {
        DealFinanceError::Csv(e.to_string())
    }
}
