//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig { host, ports: [primary, fallback, ...] }
//!     → listener.rs (bind first free candidate)
//!     → Hand off to HTTP layer (axum::serve)
//!
//! probe.rs: one-shot TCP connects used by the port-probe binary and the
//! relay's startup upstream check
//! ```

pub mod listener;
pub mod probe;

pub use listener::{bind_first, ListenerError};
pub use probe::{probe_all, probe_port, ProbeResult};
