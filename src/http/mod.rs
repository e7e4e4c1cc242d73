//! HTTP forwarding relay.
//!
//! # Data Flow
//! ```text
//! TCP connection (net::listener)
//!     → server.rs (Axum router, request ID, tracing, optional CORS)
//!     → request.rs (rewrite URI onto upstream, drop Host/Connection)
//!     → hyper client, bounded by upstream timeout
//!     → response.rs (drop Connection/Transfer-Encoding, stream body)
//!     → Send to client
//!
//! Failures → error.rs: unreachable upstream = 503, anything else = 500
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use error::RelayError;
pub use server::{serve, RelayServer};
