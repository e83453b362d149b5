pub mod config;
pub mod error;
pub mod fields;
pub mod format;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::DealFinanceError;
pub use types::*;

/// Standard result type for all deal-finance operations
pub type DealFinanceResult<T> = Result<T, DealFinanceError>;
