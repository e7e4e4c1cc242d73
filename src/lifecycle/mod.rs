//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init logging/metrics → Bind candidate port → Serve
//!
//! Shutdown:
//!     Ctrl+C (signals.rs) → Shutdown::trigger (shutdown.rs)
//!     → axum graceful shutdown → in-flight requests finish → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
