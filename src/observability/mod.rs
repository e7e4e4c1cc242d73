//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! relay / page servers produce:
//!     → logging.rs (tracing subscriber, env filter)
//!     → metrics.rs (counters, histograms; Prometheus scrape when enabled)
//! ```
//!
//! # Design Decisions
//! - Request ID (`x-request-id`) is attached to every relay log line
//! - Metrics are recorded unconditionally; the exporter is opt-in

pub mod logging;
pub mod metrics;
