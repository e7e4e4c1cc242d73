//! Relay server setup and the forwarding handler.
//!
//! # Responsibilities
//! - Build the Axum router catching every method and path
//! - Wire up middleware (request ID, tracing, optional CORS)
//! - Forward each request to the upstream with a bounded timeout
//! - Map upstream failures to 503 and other faults to 500

use std::net::{SocketAddr, ToSocketAddrs};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, uri::Authority, Method, Request},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::time;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::error::RelayError;
use crate::http::request::build_upstream_request;
use crate::http::response::relay_response;
use crate::lifecycle::shutdown;
use crate::net::probe::probe_port;
use crate::observability::metrics;

/// Upstream connection details shared by every request.
#[derive(Clone)]
pub struct RelayState {
    pub upstream: Authority,
    pub client: Client<HttpConnector, Body>,
    pub timeout: Duration,
    /// Upstream label used in logs and metrics.
    pub upstream_label: Arc<str>,
}

/// HTTP server forwarding everything to one upstream.
pub struct RelayServer {
    router: Router,
    config: RelayConfig,
    upstream_addr: SocketAddr,
}

impl RelayServer {
    /// Create a relay for the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let address = &config.upstream.address;
        let upstream_addr = resolve_upstream(address)?;
        let upstream = Authority::from_str(&upstream_addr.to_string())
            .map_err(|_| RelayError::InvalidUpstream(address.clone()))?;

        let timeout = Duration::from_secs(config.upstream.timeout_secs);
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = RelayState {
            upstream,
            client,
            timeout,
            upstream_label: Arc::from(upstream_addr.to_string()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            upstream_addr,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: RelayState) -> Router {
        let mut router = Router::new()
            .route("/", any(relay_handler))
            .route("/{*path}", any(relay_handler))
            .with_state(state);

        if config.cors.enabled {
            router = router.layer(cors_layer());
        }

        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }

    /// Check whether the upstream currently accepts TCP connections.
    pub async fn upstream_reachable(&self) -> bool {
        probe_port(
            &self.upstream_addr.ip().to_string(),
            self.upstream_addr.port(),
            Duration::from_secs(1),
        )
        .await
    }

    /// Serve on `listener` until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(
            address = %listener.local_addr()?,
            upstream = %self.upstream_addr,
            timeout_secs = self.config.upstream.timeout_secs,
            cors = self.config.cors.enabled,
            "Relay starting"
        );
        serve(listener, self.router, shutdown).await?;
        tracing::info!("Relay stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// The resolved upstream address.
    pub fn upstream_addr(&self) -> SocketAddr {
        self.upstream_addr
    }
}

/// Resolve `host:port` once, preferring an IPv4 address.
fn resolve_upstream(address: &str) -> Result<SocketAddr, RelayError> {
    let invalid = || RelayError::InvalidUpstream(address.to_string());
    let candidates: Vec<SocketAddr> = address.to_socket_addrs().map_err(|_| invalid())?.collect();
    candidates
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| candidates.first())
        .copied()
        .ok_or_else(invalid)
}

/// Serve a router with graceful shutdown.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    signal: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown::wait(signal))
        .await
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Forward one request and relay the upstream answer.
async fn relay_handler(State(state): State<RelayState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Relaying request"
    );

    let response = match forward(&state, request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                upstream = %state.upstream_label,
                error = %e,
                "Relay failed"
            );
            e.into_response()
        }
    };

    metrics::record_request(
        method.as_str(),
        response.status().as_u16(),
        &state.upstream_label,
        start_time,
    );
    response
}

async fn forward(state: &RelayState, request: Request<Body>) -> Result<Response, RelayError> {
    let outbound = build_upstream_request(request, &state.upstream)?;

    let upstream: hyper::Response<Incoming> =
        time::timeout(state.timeout, state.client.request(outbound))
            .await
            .map_err(|_| {
                RelayError::UpstreamUnreachable(format!(
                    "no response within {}s",
                    state.timeout.as_secs()
                ))
            })?
            .map_err(RelayError::from_client_error)?;

    Ok(relay_response(upstream))
}
