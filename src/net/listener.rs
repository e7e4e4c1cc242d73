//! TCP listener binding over an ordered list of candidate ports.
//!
//! # Responsibilities
//! - Try each configured port in order
//! - Report every failed attempt when none bind
//! - Log which candidate was used

use std::fmt;
use std::io;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// A candidate port that failed to bind.
#[derive(Debug)]
pub struct BindFailure {
    pub port: u16,
    pub error: io::Error,
}

impl fmt::Display for BindFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port {}: {}", self.port, self.error)
    }
}

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The candidate list was empty.
    #[error("No candidate ports configured for {host}")]
    NoCandidates { host: String },

    /// Every candidate port failed.
    #[error("Failed to bind {host} on any candidate port ({})", join_failures(.failures))]
    Exhausted {
        host: String,
        failures: Vec<BindFailure>,
    },
}

fn join_failures(failures: &[BindFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Bind the first candidate port that is free.
///
/// Port `0` asks the OS for an ephemeral port.
pub async fn bind_first(config: &ListenerConfig) -> Result<TcpListener, ListenerError> {
    if config.ports.is_empty() {
        return Err(ListenerError::NoCandidates {
            host: config.host.clone(),
        });
    }

    let mut failures = Vec::new();
    for (attempt, &port) in config.ports.iter().enumerate() {
        match TcpListener::bind((config.host.as_str(), port)).await {
            Ok(listener) => {
                let local_addr = listener.local_addr().ok();
                if attempt > 0 {
                    tracing::warn!(
                        host = %config.host,
                        port,
                        attempt = attempt + 1,
                        "Bound fallback port"
                    );
                }
                tracing::info!(address = ?local_addr, "Listener bound");
                return Ok(listener);
            }
            Err(error) => {
                tracing::warn!(host = %config.host, port, error = %error, "Bind failed");
                failures.push(BindFailure { port, error });
            }
        }
    }

    Err(ListenerError::Exhausted {
        host: config.host.clone(),
        failures,
    })
}
