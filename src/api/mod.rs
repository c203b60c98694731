//! HTTP surface served to the visualization host
//!
//! ## Endpoints
//!
//! - `GET|POST /report` - Current topology report
//! - `POST /control` - Apply a control, answered with a shortcut report

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::ApiState;

use std::future::Future;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::UnixListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::plugin::Plugin;

/// Build the router for `plugin`.
pub fn router(plugin: Arc<Plugin>) -> Router {
    Router::new()
        .route(
            "/report",
            get(routes::report::get_report).post(routes::report::get_report),
        )
        .route("/control", post(routes::control::post_control))
        .with_state(ApiState::new(plugin))
        .layer(TraceLayer::new_for_http())
}

/// Serve `plugin` on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: UnixListener,
    plugin: Arc<Plugin>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    info!("serving plugin for node {}", plugin.node_key());

    axum::serve(listener, router(plugin))
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
