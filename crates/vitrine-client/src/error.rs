//! # Client Error Types
//!
//! Error types for API calls and store operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │  HTTP Status    │  │     Local               │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Network        │  │  Authentication │  │  Busy                   │ │
//! │  │  Decode         │  │  Authorization  │  │  Core (cart, catalog,   │ │
//! │  │                 │  │  Validation     │  │        validation)      │ │
//! │  │                 │  │  NotFound       │  │  InvalidConfig          │ │
//! │  │                 │  │  Server         │  │  ConfigLoad/SaveFailed  │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Mapping
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────────────────┐
//! │ Status       │ Variant                                                  │
//! ├──────────────┼──────────────────────────────────────────────────────────┤
//! │ 401 (login)  │ Authentication  - bad credentials                        │
//! │ 401 / 403    │ Authorization   - missing/expired token, wrong role      │
//! │ 400/409/422  │ Validation      - bad or duplicate input                 │
//! │ 404          │ NotFound        - stale identifier                       │
//! │ other        │ Server          - anything else                          │
//! └──────────────┴──────────────────────────────────────────────────────────┘
//! ```
//! The message is the server's `detail` when present, else
//! `"HTTP error, status N"`.

use serde::Serialize;
use thiserror::Error;
use vitrine_core::{CoreError, ValidationError};

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering every failure a caller can see.
///
/// ## Design Principles
/// - Each variant carries the message the user should be shown
/// - Variants follow the failure taxonomy, not the HTTP status number
/// - All errors are `Send + Sync` for async compatibility
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Connection refused, DNS failure, timeout, TLS failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a body we could not decode.
    #[error("Invalid response: {0}")]
    Decode(String),

    // =========================================================================
    // HTTP Status Errors
    // =========================================================================
    /// Bad credentials at login.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Missing/expired token or insufficient role on a protected route.
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Bad or duplicate input rejected by the server.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The identifier no longer exists server-side.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// The same operation is already in flight.
    #[error("{operation} already in progress")]
    Busy { operation: &'static str },

    /// Cart, catalog, or input rule violation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

/// Machine-readable error codes for front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NetworkError,
    InvalidResponse,
    Unauthenticated,
    Forbidden,
    ValidationError,
    NotFound,
    ServerError,
    Busy,
    CartError,
    InsufficientStock,
    ConfigError,
}

impl ClientError {
    /// Classifies a non-success HTTP status.
    ///
    /// `credentials_request` is true for `/auth/login`, where a 401 means the
    /// email/password pair was rejected rather than a token problem.
    pub fn from_status(status: u16, detail: Option<String>, credentials_request: bool) -> Self {
        let message = detail.unwrap_or_else(|| format!("HTTP error, status {}", status));

        match status {
            401 if credentials_request => ClientError::Authentication(message),
            401 | 403 => ClientError::Authorization(message),
            400 | 409 | 422 => ClientError::Validation(message),
            404 => ClientError::NotFound(message),
            _ => ClientError::Server { status, message },
        }
    }

    /// Returns the machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Network(_) => ErrorCode::NetworkError,
            ClientError::Decode(_) => ErrorCode::InvalidResponse,
            ClientError::Authentication(_) => ErrorCode::Unauthenticated,
            ClientError::Authorization(_) => ErrorCode::Forbidden,
            ClientError::Validation(_) => ErrorCode::ValidationError,
            ClientError::NotFound(_) => ErrorCode::NotFound,
            ClientError::Server { .. } => ErrorCode::ServerError,
            ClientError::Busy { .. } => ErrorCode::Busy,
            ClientError::Core(CoreError::InsufficientStock { .. }) => ErrorCode::InsufficientStock,
            ClientError::Core(CoreError::Validation(_)) => ErrorCode::ValidationError,
            ClientError::Core(CoreError::ProductNotFound(_)) => ErrorCode::NotFound,
            ClientError::Core(_) => ErrorCode::CartError,
            ClientError::InvalidConfig(_)
            | ClientError::ConfigLoadFailed(_)
            | ClientError::ConfigSaveFailed(_) => ErrorCode::ConfigError,
        }
    }

    /// Returns true if the request never got a usable answer.
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    /// Returns true for credential and token failures.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ClientError::Authentication(_) | ClientError::Authorization(_)
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Core(CoreError::Validation(err))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidConfig(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::ProductId;

    #[test]
    fn test_status_classification() {
        let detail = || Some("nope".to_string());

        assert!(matches!(
            ClientError::from_status(401, detail(), true),
            ClientError::Authentication(m) if m == "nope"
        ));
        assert!(matches!(
            ClientError::from_status(401, detail(), false),
            ClientError::Authorization(_)
        ));
        assert!(matches!(
            ClientError::from_status(403, detail(), true),
            ClientError::Authorization(_)
        ));
        for status in [400, 409, 422] {
            assert!(matches!(
                ClientError::from_status(status, detail(), false),
                ClientError::Validation(_)
            ));
        }
        assert!(matches!(
            ClientError::from_status(404, detail(), false),
            ClientError::NotFound(_)
        ));
        assert!(matches!(
            ClientError::from_status(503, detail(), false),
            ClientError::Server { status: 503, .. }
        ));
    }

    #[test]
    fn test_generic_message_without_detail() {
        let err = ClientError::from_status(500, None, false);
        assert_eq!(err.to_string(), "Server error (500): HTTP error, status 500");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ClientError::Network("down".into()).code(),
            ErrorCode::NetworkError
        );
        assert_eq!(
            ClientError::Core(CoreError::ProductNotFound(ProductId(1))).code(),
            ErrorCode::NotFound
        );
        assert_eq!(ClientError::Core(CoreError::EmptyCart).code(), ErrorCode::CartError);
        assert_eq!(
            serde_json::to_string(&ErrorCode::InsufficientStock).unwrap(),
            "\"INSUFFICIENT_STOCK\""
        );
    }

    #[test]
    fn test_categories() {
        assert!(ClientError::Network("x".into()).is_network());
        assert!(ClientError::Authentication("x".into()).is_auth());
        assert!(!ClientError::Validation("x".into()).is_auth());
        assert!(ClientError::InvalidConfig("x".into()).is_config_error());
    }
}
