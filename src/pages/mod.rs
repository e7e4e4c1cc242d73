//! Generated HTML pages.
//!
//! # Data Flow
//! ```text
//! placeholder.rs: GET /<page> → [build.rs: rebuild if sources are newer] → placeholder HTML
//! summary.rs:     GET /       → implementation summary; other paths → route echo page
//! render.rs:      shared document shell, escaping, timestamps
//! ```

pub mod build;
pub mod placeholder;
pub mod render;
pub mod summary;

pub use placeholder::PageServer;
pub use summary::SummaryServer;
