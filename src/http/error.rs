//! Relay error kinds and their HTTP mapping.

use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors produced while relaying a request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The upstream could not be reached (connect failure or timeout).
    #[error("Upstream server not reachable: {0}")]
    UpstreamUnreachable(String),

    /// Anything else that went wrong while handling the request.
    #[error("Relay error: {0}")]
    InternalRelayFault(String),

    /// The configured upstream address cannot be used.
    #[error("Invalid upstream address '{0}'")]
    InvalidUpstream(String),
}

impl RelayError {
    /// Classify an error returned by the upstream client.
    pub fn from_client_error(err: hyper_util::client::legacy::Error) -> Self {
        let message = error_chain(&err);
        if err.is_connect() {
            RelayError::UpstreamUnreachable(message)
        } else {
            RelayError::InternalRelayFault(message)
        }
    }

    /// HTTP status returned to the client for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::UpstreamUnreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
            RelayError::InternalRelayFault(_) | RelayError::InvalidUpstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Render an error with all of its sources, outermost first.
pub fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
