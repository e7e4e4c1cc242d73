use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use devrelay::config::load_or_default;
use devrelay::net::{probe_all, ProbeResult};
use devrelay::observability::logging;

#[derive(Parser)]
#[command(name = "port-probe")]
#[command(about = "Check which local host:port pairs accept TCP connections", long_about = None)]
struct Cli {
    /// TOML configuration file supplying default hosts and ports
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to probe (repeatable); replaces the configured hosts
    #[arg(long = "host")]
    hosts: Vec<String>,

    /// Port to probe (repeatable); replaces the configured ports
    #[arg(short, long = "port")]
    ports: Vec<u16>,

    /// Connect timeout per probe
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;
    logging::init(&config.observability.log_level);

    let hosts = if cli.hosts.is_empty() { config.probe.hosts } else { cli.hosts };
    let ports = if cli.ports.is_empty() { config.probe.ports } else { cli.ports };
    let timeout = Duration::from_millis(cli.timeout_ms.unwrap_or(config.probe.timeout_ms));

    tracing::debug!(?hosts, ?ports, timeout_ms = timeout.as_millis() as u64, "Probing");
    let results = probe_all(&hosts, &ports, timeout).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_report(&results);
    }
    Ok(())
}

fn print_report(results: &[ProbeResult]) {
    println!("Testing server connections");
    println!("{}", "=".repeat(40));
    for result in results {
        println!("{}", result);
    }
    let open = results.iter().filter(|r| r.reachable).count();
    println!("{}", "=".repeat(40));
    println!("{} of {} accessible", open, results.len());
}
