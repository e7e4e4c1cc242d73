//! Local development helpers: a forwarding relay in front of an app's dev
//! server, placeholder and summary page servers, and a port probe.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod pages;

pub use config::DevConfig;
pub use http::RelayServer;
pub use lifecycle::Shutdown;
pub use pages::{PageServer, SummaryServer};
