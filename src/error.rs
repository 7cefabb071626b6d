use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Every way a request can fail. The `POST /quotes` handler folds these into
/// a `{ success: false, error }` envelope; other routes surface them as
/// status codes. Each message is distinct enough for the frontend to pick a
/// recovery path.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Message text cannot be empty")]
    EmptyMessage,

    #[error("CAPTCHA check failed, please complete the challenge again")]
    CaptchaRejected,

    #[error("Daily limit of {0} messages reached, try again tomorrow")]
    RateLimited(u32),

    #[error("{0} is not configured")]
    Misconfigured(&'static str),

    #[error("Failed to reach storage: {0}")]
    Storage(#[from] redis::RedisError),

    #[error("Failed to decode document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Suggestion service unreachable: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Suggestion service returned an empty reply")]
    EmptySuggestion,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::EmptyMessage => StatusCode::BAD_REQUEST,
            AppError::CaptchaRejected => StatusCode::FORBIDDEN,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream { .. } | AppError::EmptySuggestion => StatusCode::BAD_GATEWAY,
            AppError::Misconfigured { .. } | AppError::Storage { .. } | AppError::Decode { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
