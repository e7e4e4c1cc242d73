//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DevConfig (validated, immutable)
//!     → sections handed to each server at construction
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; running without a file is the common case
//! - CLI overrides are applied to the loaded struct before servers start
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    BuildConfig, CorsConfig, DevConfig, ListenerConfig, ObservabilityConfig, PagesConfig,
    ProbeConfig, RelayConfig, SummaryConfig, SummarySection, UpstreamConfig,
};
