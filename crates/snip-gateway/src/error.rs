use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use snip_core::{RedirectError, ShortenerError};
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

pub const INVALID_REQUEST_MESSAGE: &str = "invalid request";
pub const RATE_LIMITED_MESSAGE: &str = "Too Many Requests, Try after sometime";
const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

#[derive(Debug)]
pub enum AppError {
    /// The request body could not be decoded.
    InvalidRequest,
    RateLimited,
    Shortener(ShortenerError),
    Redirect(RedirectError),
}

impl From<ShortenerError> for AppError {
    fn from(err: ShortenerError) -> Self {
        AppError::Shortener(err)
    }
}

impl From<RedirectError> for AppError {
    fn from(err: RedirectError) -> Self {
        AppError::Redirect(err)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Shortener(err) => match err {
                ShortenerError::InvalidUrl(_) | ShortenerError::InvalidShortCode(_) => {
                    StatusCode::BAD_REQUEST
                }
                ShortenerError::AliasConflict(_) => StatusCode::CONFLICT,
                ShortenerError::NotFound(_) => StatusCode::NOT_FOUND,
                ShortenerError::CodeSpaceExhausted(_) | ShortenerError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::Redirect(err) => match err {
                RedirectError::EmptyShortCode => StatusCode::BAD_REQUEST,
                RedirectError::NotFound(_) => StatusCode::NOT_FOUND,
                RedirectError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::InvalidRequest => INVALID_REQUEST_MESSAGE.to_string(),
            AppError::RateLimited => RATE_LIMITED_MESSAGE.to_string(),
            AppError::Shortener(err) => err.to_string(),
            AppError::Redirect(err) => err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            // Dependency details stay in the logs.
            error!(error = %self.message(), "Request failed");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.message()
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snip_core::StorageError;

    #[test]
    fn maps_domain_errors_to_status_codes() {
        let cases = [
            (
                AppError::from(ShortenerError::InvalidUrl("x".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(ShortenerError::AliasConflict("x".into())),
                StatusCode::CONFLICT,
            ),
            (
                AppError::from(ShortenerError::NotFound("x".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(ShortenerError::CodeSpaceExhausted(10)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::from(RedirectError::EmptyShortCode),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(RedirectError::Storage(StorageError::Timeout("x".into()))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
