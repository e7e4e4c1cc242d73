//! Outbound request construction.
//!
//! # Responsibilities
//! - Rewrite the inbound URI onto the upstream authority
//! - Copy inbound headers minus `Host` and `Connection`
//! - Hand the inbound body through unchanged, for every method
//!
//! # Design Decisions
//! - `Host` is left to the client, which derives it from the upstream URI
//! - The outbound request uses the client's default HTTP version

use axum::body::Body;
use axum::http::header::{CONNECTION, HOST};
use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{HeaderMap, Request, Uri};

use crate::http::error::RelayError;

/// Inbound headers never copied to the upstream request.
pub const SKIPPED_REQUEST_HEADERS: [axum::http::HeaderName; 2] = [HOST, CONNECTION];

/// Map an inbound URI onto the upstream: same path and query, upstream authority.
pub fn upstream_uri(inbound: &Uri, upstream: &Authority) -> Result<Uri, RelayError> {
    let path_and_query = inbound
        .path_and_query()
        .cloned()
        .unwrap_or_else(|| PathAndQuery::from_static("/"));

    Uri::builder()
        .scheme(Scheme::HTTP)
        .authority(upstream.clone())
        .path_and_query(path_and_query)
        .build()
        .map_err(|e| RelayError::InternalRelayFault(format!("cannot build upstream URI: {}", e)))
}

/// Copy every header except the skipped ones.
pub fn forward_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if SKIPPED_REQUEST_HEADERS.contains(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Build the request sent to the upstream from the inbound one.
pub fn build_upstream_request(
    inbound: Request<Body>,
    upstream: &Authority,
) -> Result<Request<Body>, RelayError> {
    let (parts, body) = inbound.into_parts();
    let uri = upstream_uri(&parts.uri, upstream)?;

    let mut request = Request::builder()
        .method(parts.method)
        .uri(uri)
        .body(body)
        .map_err(|e| RelayError::InternalRelayFault(format!("cannot build upstream request: {}", e)))?;
    *request.headers_mut() = forward_headers(&parts.headers);

    Ok(request)
}
