//! Single-shot TCP reachability checks.

use std::fmt;
use std::time::Duration;

use futures_util::future::join_all;
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::time;

/// Outcome of probing one host:port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub host: String,
    pub port: u16,
    pub reachable: bool,
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.reachable { "ACCESSIBLE" } else { "NOT ACCESSIBLE" };
        write!(f, "{}:{} - {}", self.host, self.port, verdict)
    }
}

/// Return true if a TCP connection to `host:port` completes within `timeout`.
pub async fn probe_port(host: &str, port: u16, timeout: Duration) -> bool {
    match time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            tracing::debug!(host, port, error = %e, "Probe connect failed");
            false
        }
        Err(_) => {
            tracing::debug!(host, port, "Probe timed out");
            false
        }
    }
}

/// Probe every host on every port concurrently.
///
/// Results are ordered port-major: all hosts for the first port, then the next.
pub async fn probe_all(hosts: &[String], ports: &[u16], timeout: Duration) -> Vec<ProbeResult> {
    let probes = ports.iter().flat_map(move |&port| {
        hosts.iter().map(move |host| async move {
            ProbeResult {
                host: host.clone(),
                port,
                reachable: probe_port(host, port, timeout).await,
            }
        })
    });
    join_all(probes).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn detects_listening_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        assert!(probe_port("127.0.0.1", port, Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        assert!(!probe_port("127.0.0.1", port, Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn results_are_port_major() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let open = listener.local_addr().unwrap().port();
        let closed = {
            let l = TcpListener::bind("127.0.0.1:0").await.unwrap();
            l.local_addr().unwrap().port()
        };

        let hosts = vec!["127.0.0.1".to_string(), "localhost".to_string()];
        let results = probe_all(&hosts, &[closed, open], Duration::from_millis(500)).await;

        let order: Vec<_> = results.iter().map(|r| (r.host.as_str(), r.port)).collect();
        assert_eq!(
            order,
            vec![
                ("127.0.0.1", closed),
                ("localhost", closed),
                ("127.0.0.1", open),
                ("localhost", open),
            ]
        );
        assert!(!results[0].reachable);
        assert!(results[2].reachable);
    }

    #[test]
    fn display_matches_report_format() {
        let result = ProbeResult {
            host: "127.0.0.1".into(),
            port: 3000,
            reachable: false,
        };
        assert_eq!(result.to_string(), "127.0.0.1:3000 - NOT ACCESSIBLE");
    }
}
