//! Response relaying.
//!
//! The upstream status and body pass through untouched; only the
//! `Connection` and `Transfer-Encoding` headers are dropped, since framing
//! is redone by our own server.

use axum::body::{Body, Bytes, HttpBody};
use axum::http::header::{CONNECTION, TRANSFER_ENCODING};
use axum::http::{HeaderMap, HeaderName};
use axum::response::Response;

/// Upstream headers never copied to the client response.
pub const SKIPPED_RESPONSE_HEADERS: [HeaderName; 2] = [CONNECTION, TRANSFER_ENCODING];

/// Copy every header except the skipped ones.
pub fn filter_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if SKIPPED_RESPONSE_HEADERS.contains(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Turn an upstream response into the client response, streaming the body.
pub fn relay_response<B>(upstream: axum::http::Response<B>) -> Response
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<axum::BoxError>,
{
    let (mut parts, body) = upstream.into_parts();
    parts.headers = filter_response_headers(&parts.headers);
    Response::from_parts(parts, Body::new(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    #[test]
    fn hop_headers_are_dropped() {
        let mut upstream = HeaderMap::new();
        upstream.insert("connection", HeaderValue::from_static("close"));
        upstream.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        upstream.insert("content-type", HeaderValue::from_static("text/html"));
        upstream.append("set-cookie", HeaderValue::from_static("a=1"));
        upstream.append("set-cookie", HeaderValue::from_static("b=2"));

        let headers = filter_response_headers(&upstream);
        assert!(headers.get(CONNECTION).is_none());
        assert!(headers.get(TRANSFER_ENCODING).is_none());
        assert_eq!(headers.get("content-type").unwrap(), "text/html");
        assert_eq!(headers.get_all("set-cookie").iter().count(), 2);
    }

    #[tokio::test]
    async fn status_and_body_pass_through() {
        let upstream = axum::http::Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header("connection", "close")
            .header("x-upstream", "dev")
            .body(Body::from("missing"))
            .unwrap();

        let response = relay_response(upstream);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(CONNECTION).is_none());
        assert_eq!(response.headers().get("x-upstream").unwrap(), "dev");

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"missing");
    }
}
