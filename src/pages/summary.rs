//! Implementation summary page.
//!
//! `/` renders the configured summary; every other path gets a small page
//! echoing the route back.

use std::sync::Arc;

use axum::{
    extract::State,
    http::Uri,
    response::Html,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::{SummaryConfig, SummarySection};
use crate::http::serve;
use crate::observability::metrics;
use crate::pages::render::{document, escape_html, now_utc};

#[derive(Clone)]
struct SummaryState {
    config: Arc<SummaryConfig>,
    port: u16,
}

/// HTTP server for the summary page.
pub struct SummaryServer {
    config: SummaryConfig,
}

impl SummaryServer {
    pub fn new(config: SummaryConfig) -> Self {
        Self { config }
    }

    fn build_router(state: SummaryState) -> Router {
        Router::new()
            .route("/", get(summary_handler))
            .route("/{*path}", get(summary_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Serve on `listener` until the shutdown signal fires.
    ///
    /// The bound port is shown in the page footer.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let address = listener.local_addr()?;
        tracing::info!(
            address = %address,
            sections = self.config.sections.len(),
            "Summary server starting"
        );

        let router = Self::build_router(SummaryState {
            config: Arc::new(self.config),
            port: address.port(),
        });
        serve(listener, router, shutdown).await?;
        tracing::info!("Summary server stopped");
        Ok(())
    }
}

async fn summary_handler(State(state): State<SummaryState>, uri: Uri) -> Html<String> {
    let path = uri.path();
    if path == "/" || path == "/index.html" {
        metrics::record_page("summary", 200);
        Html(summary_page(&state.config, state.port))
    } else {
        metrics::record_page("route", 200);
        Html(route_page(path))
    }
}

fn section_html(section: &SummarySection) -> String {
    let status = section
        .status
        .as_deref()
        .map(|s| format!("            <div class=\"status\">{}</div>\n", escape_html(s)))
        .unwrap_or_default();
    let items: String = section
        .items
        .iter()
        .map(|item| format!("            <div class=\"item\">{}</div>\n", escape_html(item)))
        .collect();

    format!(
        "        <div class=\"section\">\n            <h2>{}</h2>\n{}{}        </div>\n",
        escape_html(&section.name),
        status,
        items
    )
}

fn summary_page(config: &SummaryConfig, port: u16) -> String {
    let sections: String = config.sections.iter().map(section_html).collect();
    let body = format!(
        r#"        <h1>{title}</h1>
        <div class="notice"><h2>{headline}</h2></div>
{sections}        <div class="footer">
            <p>Generated: {time}</p>
            <p>Summary server running on port {port}</p>
        </div>"#,
        title = escape_html(&config.title),
        headline = escape_html(&config.headline),
        sections = sections,
        time = now_utc(),
        port = port,
    );
    document(&config.title, &body)
}

fn route_page(path: &str) -> String {
    let body = format!(
        r#"        <h1>Route: <code>{path}</code></h1>
        <p>This path exists in the application structure.</p>
        <p><a href="/">&larr; Back to Implementation Summary</a></p>"#,
        path = escape_html(path),
    );
    document(&format!("Route: {}", path), &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SummaryConfig {
        SummaryConfig {
            title: "Compliance App".into(),
            headline: "Route groups done".into(),
            sections: vec![
                SummarySection {
                    name: "Routes".into(),
                    status: Some("COMPLETED".into()),
                    items: vec!["/signin".into(), "/workspace/<upload>".into()],
                },
                SummarySection {
                    name: "Build".into(),
                    status: None,
                    items: Vec::new(),
                },
            ],
            ..SummaryConfig::default()
        }
    }

    #[test]
    fn summary_renders_sections_in_order() {
        let html = summary_page(&config(), 8000);
        let routes = html.find("<h2>Routes</h2>").unwrap();
        let build = html.find("<h2>Build</h2>").unwrap();
        assert!(routes < build);
        assert!(html.contains(r#"<div class="status">COMPLETED</div>"#));
        assert!(html.contains("/workspace/&lt;upload&gt;"));
        assert!(html.contains("running on port 8000"));
    }

    #[test]
    fn section_without_status_has_no_badge() {
        let html = section_html(&config().sections[1]);
        assert!(!html.contains("class=\"status\""));
    }

    #[test]
    fn route_page_escapes_path() {
        let html = route_page("/<script>");
        assert!(html.contains("<code>/&lt;script&gt;</code>"));
        assert!(!html.contains("<script>"));
    }
}
