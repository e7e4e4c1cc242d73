//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that parse but cannot
//! work at runtime. Every problem is reported, not just the first.

use std::net::SocketAddr;

use crate::config::schema::{DevConfig, ListenerConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Accept `ip:port`, `[v6]:port` or `hostname:port`.
fn is_host_port(address: &str) -> bool {
    if address.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match address.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty() && !host.contains(':') && port.parse::<u16>().is_ok()
        }
        None => false,
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &DevConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_listener("relay.listener", &config.relay.listener, &mut errors);
    check_listener("pages.listener", &config.pages.listener, &mut errors);
    check_listener("summary.listener", &config.summary.listener, &mut errors);

    let upstream = &config.relay.upstream;
    if !is_host_port(&upstream.address) {
        errors.push(ValidationError::new(
            "relay.upstream.address",
            format!("'{}' is not a host:port address", upstream.address),
        ));
    }
    if upstream.timeout_secs == 0 {
        errors.push(ValidationError::new(
            "relay.upstream.timeout_secs",
            "must be greater than zero",
        ));
    }

    let build = &config.pages.build;
    if build.enabled && build.command.is_empty() {
        errors.push(ValidationError::new(
            "pages.build.command",
            "must name a program when builds are enabled",
        ));
    }
    for (i, page) in config.pages.pages.iter().enumerate() {
        if page.is_empty() || page.contains('/') {
            errors.push(ValidationError::new(
                format!("pages.pages[{}]", i),
                format!("'{}' is not a single path segment", page),
            ));
        }
    }

    if config.probe.hosts.is_empty() {
        errors.push(ValidationError::new("probe.hosts", "must not be empty"));
    }
    if config.probe.ports.is_empty() {
        errors.push(ValidationError::new("probe.ports", "must not be empty"));
    }
    if config.probe.timeout_ms == 0 {
        errors.push(ValidationError::new("probe.timeout_ms", "must be greater than zero"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_listener(field: &str, listener: &ListenerConfig, errors: &mut Vec<ValidationError>) {
    if listener.host.is_empty() {
        errors.push(ValidationError::new(format!("{}.host", field), "must not be empty"));
    }
    if listener.ports.is_empty() {
        errors.push(ValidationError::new(
            format!("{}.ports", field),
            "at least one candidate port is required",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&DevConfig::default()).is_ok());
    }

    #[test]
    fn reports_every_error() {
        let mut config = DevConfig::default();
        config.relay.listener.ports.clear();
        config.relay.upstream.address = "localhost".into();
        config.relay.upstream.timeout_secs = 0;
        config.probe.ports.clear();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "relay.listener.ports",
                "relay.upstream.address",
                "relay.upstream.timeout_secs",
                "probe.ports",
            ]
        );
    }

    #[test]
    fn upstream_may_be_a_hostname() {
        let mut config = DevConfig::default();
        for address in ["localhost:3000", "[::1]:3000", "dev.internal:8080"] {
            config.relay.upstream.address = address.into();
            assert!(validate_config(&config).is_ok(), "{} rejected", address);
        }
        for address in ["localhost", ":3000", "localhost:http", "::1:3000"] {
            config.relay.upstream.address = address.into();
            assert!(validate_config(&config).is_err(), "{} accepted", address);
        }
    }

    #[test]
    fn empty_build_command_only_matters_when_enabled() {
        let mut config = DevConfig::default();
        config.pages.build.command.clear();
        assert!(validate_config(&config).is_err());

        config.pages.build.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn page_names_are_single_segments() {
        let mut config = DevConfig::default();
        config.pages.pages.push("admin/company".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "pages.pages[5]");
    }
}
