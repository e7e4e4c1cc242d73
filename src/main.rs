//! devrelay: local development servers.
//!
//! ```text
//!     browser ──▶ relay :5000 ──▶ app dev server :3000
//!     browser ──▶ pages :8888     (placeholder pages, rebuild on change)
//!     browser ──▶ summary :8000   (implementation summary)
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use devrelay::config::{load_or_default, validation::validate_config, DevConfig, ListenerConfig};
use devrelay::lifecycle::{signals, Shutdown};
use devrelay::net::bind_first;
use devrelay::observability::{logging, metrics};
use devrelay::{PageServer, RelayServer, SummaryServer};

#[derive(Parser)]
#[command(name = "devrelay")]
#[command(about = "Local development relay and placeholder servers", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forward every request to the upstream dev server
    Relay {
        /// Port tried before the configured candidates
        #[arg(short, long)]
        port: Option<u16>,

        /// Upstream host:port (e.g. 127.0.0.1:3000 or localhost:3000)
        #[arg(short, long)]
        upstream: Option<String>,

        /// Add permissive CORS headers
        #[arg(long)]
        cors: bool,
    },
    /// Serve placeholder pages for the app
    Pages {
        #[arg(short, long)]
        port: Option<u16>,

        /// Skip the rebuild-on-change check
        #[arg(long)]
        no_build: bool,
    },
    /// Serve the implementation summary page
    Summary {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn prefer_port(listener: &mut ListenerConfig, port: Option<u16>) {
    if let Some(port) = port {
        listener.ports.retain(|&p| p != port);
        listener.ports.insert(0, port);
    }
}

fn apply_overrides(config: &mut DevConfig, command: &Commands) {
    match command {
        Commands::Relay {
            port,
            upstream,
            cors,
        } => {
            prefer_port(&mut config.relay.listener, *port);
            if let Some(upstream) = upstream {
                config.relay.upstream.address = upstream.clone();
            }
            config.relay.cors.enabled |= *cors;
        }
        Commands::Pages { port, no_build } => {
            prefer_port(&mut config.pages.listener, *port);
            if *no_build {
                config.pages.build.enabled = false;
            }
        }
        Commands::Summary { port } => prefer_port(&mut config.summary.listener, *port),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli.command);
    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            eprintln!("invalid configuration: {}", error);
        }
        return Err(format!("{} configuration error(s)", errors.len()).into());
    }

    logging::init(&config.observability.log_level);
    tracing::info!("devrelay v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(error = %e, "Failed to start metrics exporter");
        }
    }

    let shutdown = Shutdown::new();
    signals::forward_ctrl_c(shutdown.clone());

    match cli.command {
        Commands::Relay { .. } => {
            let server = RelayServer::new(config.relay.clone())?;
            if server.upstream_reachable().await {
                tracing::info!(upstream = %server.upstream_addr(), "Upstream detected");
            } else if config.relay.upstream.require_reachable {
                tracing::error!(upstream = %server.upstream_addr(), "Upstream not reachable; start the dev server first");
                return Err("upstream not reachable".into());
            } else {
                tracing::warn!(upstream = %server.upstream_addr(), "Upstream not reachable yet; requests will get 503 until it starts");
            }

            let listener = bind_first(&config.relay.listener).await?;
            tracing::info!(
                url = %format!("http://localhost:{}", listener.local_addr()?.port()),
                upstream = %server.upstream_addr(),
                "Relay ready"
            );
            server.run(listener, shutdown.subscribe()).await?;
        }
        Commands::Pages { .. } => {
            let listener = bind_first(&config.pages.listener).await?;
            tracing::info!(
                url = %format!("http://localhost:{}", listener.local_addr()?.port()),
                "Page server ready"
            );
            PageServer::new(config.pages).run(listener, shutdown.subscribe()).await?;
        }
        Commands::Summary { .. } => {
            let listener = bind_first(&config.summary.listener).await?;
            tracing::info!(
                url = %format!("http://localhost:{}", listener.local_addr()?.port()),
                "Summary server ready"
            );
            SummaryServer::new(config.summary).run(listener, shutdown.subscribe()).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_override_goes_first() {
        let mut listener = ListenerConfig::new("127.0.0.1", vec![5000, 5001]);
        prefer_port(&mut listener, Some(5001));
        assert_eq!(listener.ports, vec![5001, 5000]);

        prefer_port(&mut listener, Some(9000));
        assert_eq!(listener.ports, vec![9000, 5001, 5000]);
    }

    #[test]
    fn relay_overrides_apply() {
        let mut config = DevConfig::default();
        let command = Commands::Relay {
            port: None,
            upstream: Some("127.0.0.1:3003".into()),
            cors: true,
        };
        apply_overrides(&mut config, &command);
        assert_eq!(config.relay.upstream.address, "127.0.0.1:3003");
        assert!(config.relay.cors.enabled);
        assert_eq!(config.relay.listener.ports, vec![5000, 5001]);
    }

    #[test]
    fn cli_parses() {
        let cli = Cli::try_parse_from(["devrelay", "-c", "dev.toml", "pages", "--no-build"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("dev.toml")));
        assert!(matches!(cli.command, Commands::Pages { no_build: true, port: None }));
    }
}
