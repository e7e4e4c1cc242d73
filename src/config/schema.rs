//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dev helpers.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration shared by every helper.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DevConfig {
    /// Forwarding relay settings.
    pub relay: RelayConfig,

    /// Placeholder page server settings.
    pub pages: PagesConfig,

    /// Implementation summary server settings.
    pub summary: SummaryConfig,

    /// Port probe defaults.
    pub probe: ProbeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "127.0.0.1").
    pub host: String,

    /// Candidate ports, tried in order until one binds.
    pub ports: Vec<u16>,
}

impl ListenerConfig {
    pub fn new(host: impl Into<String>, ports: Vec<u16>) -> Self {
        Self {
            host: host.into(),
            ports,
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", vec![5000, 5001])
    }
}

/// Forwarding relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    pub listener: ListenerConfig,

    /// Where requests are forwarded to.
    pub upstream: UpstreamConfig,

    pub cors: CorsConfig,
}

/// Upstream (forwarded-to) server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:3000").
    pub address: String,

    /// Timeout for a single forwarded request in seconds.
    pub timeout_secs: u64,

    /// Refuse to start when the upstream is not accepting connections.
    pub require_reachable: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
            timeout_secs: 10,
            require_reachable: false,
        }
    }
}

/// CORS headers added by the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
}

/// Placeholder page server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PagesConfig {
    pub listener: ListenerConfig,

    /// Application name shown in page titles.
    pub app_name: String,

    /// Page names; each serves every path starting with `/<name>`.
    pub pages: Vec<String>,

    /// Rebuild-on-change settings.
    pub build: BuildConfig,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::new("0.0.0.0", vec![8888]),
            app_name: "Dev App".to_string(),
            pages: ["dashboard", "upload", "company", "signin", "create-account"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            build: BuildConfig::default(),
        }
    }
}

/// Build freshness configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Check freshness and rebuild before serving.
    pub enabled: bool,

    /// Build output directory; its mtime is the build time.
    pub output_dir: String,

    /// Source tree scanned for newer files.
    pub source_dir: String,

    /// File extensions (without dot) that count as sources.
    pub extensions: Vec<String>,

    /// Build command and arguments.
    pub command: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_dir: ".next".to_string(),
            source_dir: "app".to_string(),
            extensions: ["tsx", "ts", "js", "css"].iter().map(|e| e.to_string()).collect(),
            command: ["npm", "run", "build"].iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Implementation summary server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub listener: ListenerConfig,

    /// Page title.
    pub title: String,

    /// Banner text at the top of the page.
    pub headline: String,

    /// Sections rendered in order.
    pub sections: Vec<SummarySection>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::new("0.0.0.0", vec![8000, 8001]),
            title: "Implementation Summary".to_string(),
            headline: "Implementation completed".to_string(),
            sections: Vec::new(),
        }
    }
}

/// One block of the summary page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SummarySection {
    pub name: String,

    /// Badge text (e.g., "COMPLETED", "READY").
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub items: Vec<String>,
}

/// Port probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub hosts: Vec<String>,
    pub ports: Vec<u16>,

    /// Connect timeout per probe in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            hosts: ["127.0.0.1", "localhost", "0.0.0.0"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            ports: vec![3000, 3001, 8080],
            timeout_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
