use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Category must not be empty")]
    EmptyCategory,

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
