//! # Client Error Types
//!
//! Error types for everything that crosses the network or the file system.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     API / Session       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Http           │  │  Api { status, msg }    │ │
//! │  │  ConfigLoad     │  │  Timeout        │  │  Unauthorized           │ │
//! │  │                 │  │                 │  │  SessionExpired         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Core (EmptyCart) - wrapped from medstock-core                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use medstock_core::CoreError;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering all possible API and config failures.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Connection, TLS or body decoding failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    // =========================================================================
    // API / Session Errors
    // =========================================================================
    /// The API answered with a failure status or `success: false`.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API rejected the bearer token or the credentials.
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// The session token has expired; log in again.
    #[error("Session expired")]
    SessionExpired,

    /// The token handed over by the OAuth callback could not be read.
    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    // =========================================================================
    // Core Errors
    // =========================================================================
    /// Cart error from medstock-core.
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Http(err.to_string())
        }
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

impl From<jsonwebtoken::errors::Error> for ClientError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ClientError::InvalidToken(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if the same request may succeed when retried.
    ///
    /// A failed checkout leaves the cart intact, so the cashier can simply
    /// press "Complete Sale" again for these.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http(_) | ClientError::Timeout => true,
            ClientError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if the user must log in again.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthorized(_) | ClientError::SessionExpired | ClientError::InvalidToken(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(ClientError::Timeout.is_retryable());
        assert!(ClientError::Http("connection refused".into()).is_retryable());
        assert!(ClientError::Api {
            status: 503,
            message: "maintenance".into()
        }
        .is_retryable());

        assert!(!ClientError::Api {
            status: 400,
            message: "Insufficient stock".into()
        }
        .is_retryable());
        assert!(!ClientError::SessionExpired.is_retryable());
        assert!(!ClientError::Core(CoreError::EmptyCart).is_retryable());
    }

    #[test]
    fn test_requires_login() {
        assert!(ClientError::SessionExpired.requires_login());
        assert!(ClientError::Unauthorized("bad token".into()).requires_login());
        assert!(!ClientError::Timeout.requires_login());
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: ClientError = CoreError::EmptyCart.into();
        assert_eq!(err.to_string(), "Cannot check out an empty cart");
    }

    #[test]
    fn test_api_error_display() {
        let err = ClientError::Api {
            status: 422,
            message: "Medicine not found".into(),
        };
        assert_eq!(err.to_string(), "API error (422): Medicine not found");
    }
}
