use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::models::CustomerId;

/// Application-specific error types.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// A customer with this id is already registered.
    DuplicateId(CustomerId),
    /// Resource not found error.
    NotFound(String),
    /// Purchase amount could not be coerced to a number.
    InvalidAmount(String),
    /// Bad request error (missing or empty input).
    BadRequest(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl AppError {
    /// Shorthand for the error every id-keyed command returns on a miss.
    pub fn customer_not_found(id: CustomerId) -> Self {
        AppError::NotFound(format!("Customer {} not found", id))
    }

    /// Returns the innermost error, skipping any context wrappers.
    pub fn root(&self) -> &AppError {
        match self {
            AppError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DuplicateId(id) => {
                write!(f, "Customer ID {} already exists. Use a unique ID.", id)
            }
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InvalidAmount(msg) => write!(f, "Invalid amount entered: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Maps each error variant to an appropriate HTTP status code and JSON body.
    /// Logs errors appropriately based on their severity.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::DuplicateId(_) => {
                tracing::warn!("Rejected command: {}", self);
                (StatusCode::CONFLICT, self.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InvalidAmount(msg) => {
                tracing::warn!("Rejected purchase amount: {}", msg);
                (StatusCode::BAD_REQUEST, "Invalid amount entered.".to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::WithContext { source, context } => {
                tracing::error!("Error with context: {} -> {}", context, source);
                return self.root().clone().into_response();
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (AppError::DuplicateId(CustomerId(1)), StatusCode::CONFLICT),
            (AppError::customer_not_found(CustomerId(7)), StatusCode::NOT_FOUND),
            (AppError::InvalidAmount("abc".into()), StatusCode::BAD_REQUEST),
            (AppError::BadRequest("empty".into()), StatusCode::BAD_REQUEST),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_context_delegates_to_source() {
        let result: Result<(), AppError> = Err(AppError::customer_not_found(CustomerId(3)));
        let err = result.context("logging purchase").unwrap_err();

        assert_eq!(err.root(), &AppError::customer_not_found(CustomerId(3)));
        assert_eq!(
            err.to_string(),
            "logging purchase: Not found: Customer 3 not found"
        );
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_with_context_is_lazy() {
        let ok: Result<u8, AppError> = Ok(1);
        let value = ok
            .with_context(|| panic!("context must not be built on success"))
            .unwrap();
        assert_eq!(value, 1);
    }
}
