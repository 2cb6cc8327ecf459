//! REST API for the evaluation wizard.
//!
//! Exposes the step sequencer over HTTP. Navigation is realized as a
//! `303 See Other` redirect to `{site_root}/wizard/{session}/step/{step}`.

use std::future::Future;
use std::net::SocketAddr;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::ApiState;

/// Default port for the REST API server
pub const DEFAULT_PORT: u16 = 7010;

/// Build the API router with all routes
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/api/v1/health", get(routes::health::health))
        .route("/api/v1/status", get(routes::health::status))
        // Catalog endpoints
        .route("/api/v1/steps", get(routes::catalog::steps))
        .route("/api/v1/catalog", get(routes::catalog::options))
        .route(
            "/api/v1/observations/:id/time-range",
            get(routes::catalog::time_range),
        )
        // Wizard endpoints
        .route("/wizard", post(routes::wizard::start))
        .route(
            "/wizard/:session",
            get(routes::wizard::view).delete(routes::wizard::discard),
        )
        .route(
            "/wizard/:session/step/:step",
            get(routes::wizard::show_step).post(routes::wizard::submit_step),
        )
        .route("/wizard/:session/back", post(routes::wizard::back))
        .route("/wizard/:session/time-range", get(routes::wizard::time_range))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server and run until `shutdown` resolves
pub async fn serve<F>(state: ApiState, port: u16, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("REST API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("REST API server stopped");
    Ok(())
}
