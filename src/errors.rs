use std::result::Result as StdResult;

use thiserror::Error;

/// Error type shared by the forecasting engine, the record readers and the CLI.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("No schedules registered for account: {0}")]
    NoSchedules(String),
    #[error("Invalid record on row {row}: {details}")]
    InvalidRecord { row: usize, details: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
}

pub type Result<T> = StdResult<T, BudgetError>;

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BudgetError),
}
