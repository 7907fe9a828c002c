// error.rs - error type for the portal client

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PortalError>;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid server response: {0}")]
    InvalidResponse(String),

    #[error("Pending applicant storage failed: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Pending applicant record is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("No data directory available for the pending applicant record")]
    NoDataDir,

    #[error("No pending applicant; complete the application first")]
    NoPendingApplicant,
}
