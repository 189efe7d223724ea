//! HTTP front end over the route resolver.
//!
//! Nothing is materialized: every request path is resolved against the
//! in-memory catalog and rendered on the fly, producing the same HTML that
//! `generate` would have written for that path.
//!
//! | Route     | Response                                   |
//! |-----------|--------------------------------------------|
//! | `/health` | `200 OK`                                   |
//! | any other | `200` page, or `404` with the not-found page |
//!
//! The catalog and config are immutable after startup and shared through an
//! `Arc` without locks.

use crate::catalog::Catalog;
use crate::config::SiteConfig;
use crate::render;
use crate::resolve::{Resolution, resolve};
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Shared across handlers
pub struct ServeState {
    pub catalog: Catalog,
    pub config: SiteConfig,
    css: String,
}

impl ServeState {
    pub fn new(catalog: Catalog, config: SiteConfig) -> Self {
        let css = render::stylesheet(&config.colors);
        Self {
            catalog,
            config,
            css,
        }
    }
}

pub type SharedState = Arc<ServeState>;

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(page)
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn page(State(state): State<SharedState>, uri: Uri) -> Response {
    let path = uri.path();
    match resolve(&state.catalog, &state.config.site, path) {
        Resolution::Found(page) => {
            info!(path = %path, topology = %page.topology, status = 200, "page resolved");
            Html(render::render_page(&page, &state.css).into_string()).into_response()
        }
        Resolution::NotFound => {
            info!(path = %path, status = 404, "no page for path");
            let body = render::render_not_found(&state.config.site, &state.css).into_string();
            (StatusCode::NOT_FOUND, Html(body)).into_response()
        }
    }
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(state: SharedState, addr: SocketAddr) -> std::io::Result<()> {
    let app = create_router(state);
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down");
        })
        .await
}
