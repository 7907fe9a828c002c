// error.rs - API error type and its HTTP rendering

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use database::DbError;
use thiserror::Error;
use tracing::error;

use crate::utils::response;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Payment authentication failed")]
    AuthenticationFailure,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Payment initiation failed: {0}")]
    PaymentInitiation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::AuthenticationFailure => StatusCode::UNAUTHORIZED,
            ApiError::PaymentInitiation(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Configuration(_) | ApiError::Database(_) | ApiError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::Database(e) => {
                error!("{}", e);
                "Internal Server Error".to_string()
            }
            ApiError::Io(e) => {
                error!("{}", e);
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        response(self.status_code(), false, serde_json::json!({}), &message)
    }
}
