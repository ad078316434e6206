use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// The directory entity a lookup failed to locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// Town (commune) search returned no candidate.
    Town,
    /// Street address search returned no candidate.
    Address,
    /// Building record carried no usable address code.
    AddressCode,
}

/// Application-specific error types.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Required configuration is missing (e.g. the API credential).
    Configuration(String),
    /// A pipeline lookup produced nothing usable.
    NotFound {
        /// Which lookup failed.
        kind: LookupKind,
        /// The search term or identifier that could not be resolved.
        term: String,
    },
    /// The remote API answered with a non-success status.
    ApiError {
        /// HTTP status code.
        status: u16,
        /// HTTP status text.
        status_text: String,
    },
    /// The request could not be sent or its response could not be read.
    RequestFailed(String),
    /// The response body did not have the expected shape.
    InvalidResponse(String),
    /// Bad request error (invalid input).
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
    pub fn town_not_found(town_name: &str) -> Self {
        AppError::NotFound {
            kind: LookupKind::Town,
            term: town_name.to_string(),
        }
    }

    pub fn address_not_found(street_address: &str) -> Self {
        AppError::NotFound {
            kind: LookupKind::Address,
            term: street_address.to_string(),
        }
    }

    pub fn address_code_not_found(building_id: i64) -> Self {
        AppError::NotFound {
            kind: LookupKind::AddressCode,
            term: building_id.to_string(),
        }
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
            AppError::Configuration(msg) => write!(f, "{}", msg),
            AppError::NotFound { kind, term } => match kind {
                LookupKind::Town => write!(f, "No town found for: {}", term),
                LookupKind::Address => write!(f, "No address found for: {}", term),
                LookupKind::AddressCode => {
                    write!(f, "No address code found for building: {}", term)
                }
            },
            AppError::ApiError {
                status,
                status_text,
            } => write!(f, "ARCEP API error: {} {}", status, status_text),
            AppError::RequestFailed(msg) => write!(f, "ARCEP request failed: {}", msg),
            AppError::InvalidResponse(msg) => write!(f, "Invalid ARCEP response: {}", msg),
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
    fn into_response(self) -> Response {
        let status = match self.root() {
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ApiError { .. }
            | AppError::RequestFailed(_)
            | AppError::InvalidResponse(_) => {
                tracing::error!("External API error: {}", self);
                StatusCode::BAD_GATEWAY
            }
            AppError::WithContext { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    /// Converts a `reqwest::Error` into an `AppError`.
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::InvalidResponse(err.to_string())
        } else {
            AppError::RequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidResponse(err.to_string())
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

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e.into()),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e.into()),
            context: f(),
        })
    }
}
