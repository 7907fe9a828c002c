// error.rs - error type shared by the query functions and stores

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Counter {0} could not be advanced")]
    Counter(String),

    #[error("Stored timestamp out of range: {0}")]
    Timestamp(i64),
}
