//! Placeholder pages standing in for the app while it is being built.
//!
//! `/` lists the configured pages, `/<page>...` renders that page's
//! placeholder and anything else gets a 404 placeholder. When builds are
//! enabled every request first makes sure the app build is fresh.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::PagesConfig;
use crate::http::serve;
use crate::observability::metrics;
use crate::pages::build::{BuildError, Builder};
use crate::pages::render::{document, escape_html, now_utc, title_case};

#[derive(Clone)]
struct PagesState {
    config: Arc<PagesConfig>,
    builder: Option<Arc<Builder>>,
}

/// Which page a path resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRoute {
    Home,
    Page(String),
    NotFound,
}

/// Resolve a request path against the configured page names.
pub fn resolve(path: &str, pages: &[String]) -> PageRoute {
    if path == "/" || path == "/index.html" {
        return PageRoute::Home;
    }
    let path = path.strip_prefix('/').unwrap_or(path);
    pages
        .iter()
        .find(|page| path.starts_with(page.as_str()))
        .map(|page| PageRoute::Page(page.clone()))
        .unwrap_or(PageRoute::NotFound)
}

/// HTTP server for the placeholder pages.
pub struct PageServer {
    router: Router,
    config: Arc<PagesConfig>,
}

impl PageServer {
    pub fn new(config: PagesConfig) -> Self {
        let config = Arc::new(config);
        let builder = config
            .build
            .enabled
            .then(|| Arc::new(Builder::new(config.build.clone())));

        let state = PagesState {
            config: config.clone(),
            builder,
        };
        let router = Router::new()
            .route("/", get(page_handler))
            .route("/{*path}", get(page_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        Self { router, config }
    }

    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(
            address = %listener.local_addr()?,
            pages = ?self.config.pages,
            build = self.config.build.enabled,
            "Page server starting"
        );
        serve(listener, self.router, shutdown).await?;
        tracing::info!("Page server stopped");
        Ok(())
    }
}

async fn page_handler(State(state): State<PagesState>, uri: Uri) -> Response {
    if let Some(builder) = &state.builder {
        if let Err(e) = builder.ensure_fresh().await {
            metrics::record_page("build-error", 500);
            return (StatusCode::INTERNAL_SERVER_ERROR, Html(build_error_page(&e))).into_response();
        }
    }

    let app_name = &state.config.app_name;
    match resolve(uri.path(), &state.config.pages) {
        PageRoute::Home => {
            metrics::record_page("home", 200);
            Html(home_page(app_name, &state.config.pages)).into_response()
        }
        PageRoute::Page(name) => {
            metrics::record_page("placeholder", 200);
            Html(placeholder_page(app_name, &name)).into_response()
        }
        PageRoute::NotFound => {
            metrics::record_page("placeholder", 404);
            (StatusCode::NOT_FOUND, Html(placeholder_page(app_name, "404"))).into_response()
        }
    }
}

fn home_page(app_name: &str, pages: &[String]) -> String {
    let links: String = pages
        .iter()
        .map(|page| {
            format!(
                "            <a href=\"/{}\">{}</a>\n",
                escape_html(page),
                escape_html(&title_case(page))
            )
        })
        .collect();

    let body = format!(
        r#"        <h1>{app}</h1>
        <div class="notice">Development server: placeholder pages, rebuilt when sources change.</div>
        <div class="nav">
{links}        </div>
        <div class="footer"><p>Time: {time}</p></div>"#,
        app = escape_html(app_name),
        links = links,
        time = now_utc(),
    );
    document(&format!("{} - Dev Server", app_name), &body)
}

fn placeholder_page(app_name: &str, page: &str) -> String {
    let title = title_case(page);
    let body = format!(
        r#"        <h1>{title}</h1>
        <p><a href="/">&larr; Back</a></p>
        <div class="notice">
            <h2>Development Mode</h2>
            <p>This is a placeholder for the <code>{page}</code> page.</p>
        </div>"#,
        title = escape_html(&title),
        page = escape_html(page),
    );
    document(&format!("{} - {}", title, app_name), &body)
}

fn build_error_page(err: &BuildError) -> String {
    let details = err.output().unwrap_or_default();
    let body = format!(
        r#"        <h1>Build failed</h1>
        <p>{message}</p>
        <pre>{details}</pre>
        <p><a href="/">&larr; Back to Home</a></p>"#,
        message = escape_html(&err.to_string()),
        details = escape_html(details),
    );
    document("Error - Build failed", &body)
}
