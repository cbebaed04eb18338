//! Error types for remote calls

use std::collections::BTreeMap;

use thiserror::Error;

/// Field name -> messages, as reported by the API
pub type ServerFieldErrors = BTreeMap<String, Vec<String>>;

/// Errors produced by API calls
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// No response was received (offline, DNS, CORS, aborted)
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status
    #[error("API error {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Http {
        status: u16,
        message: Option<String>,
        field_errors: ServerFieldErrors,
    },

    /// A 2xx envelope carrying `status: false`
    #[error("Request rejected: {}", .message.as_deref().unwrap_or("no reason given"))]
    Rejected {
        message: Option<String>,
        field_errors: ServerFieldErrors,
    },

    /// The response body did not have the expected shape
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The request could not be assembled
    #[error("Failed to build request: {0}")]
    Request(String),
}

/// Result type for API calls
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message supplied by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { message, .. } | Self::Rejected { message, .. } => {
                message.as_deref().filter(|m| !m.is_empty())
            }
            _ => None,
        }
    }

    /// Field-scoped validation messages supplied by the server
    pub fn field_errors(&self) -> Option<&ServerFieldErrors> {
        match self {
            Self::Http { field_errors, .. } | Self::Rejected { field_errors, .. }
                if !field_errors.is_empty() =>
            {
                Some(field_errors)
            }
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// True when no server response was involved
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::JsError(e) => Self::Network(e.to_string()),
            gloo_net::Error::SerdeError(e) => Self::Decode(e.to_string()),
            gloo_net::Error::GlooError(e) => Self::Request(e),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
