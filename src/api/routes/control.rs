//! Control endpoint

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::Uri,
};
use tracing::{error, info, warn};

use crate::{
    api::{error::ApiResult, state::ApiState},
    topology::{ControlRequest, ControlResponse},
};

/// POST /control
///
/// Implements the "controller" interface. A successful call answers with a
/// shortcut report of the new state.
pub async fn post_control(
    State(state): State<ApiState>,
    uri: Uri,
    payload: Result<Json<ControlRequest>, JsonRejection>,
) -> ApiResult<Json<ControlResponse>> {
    info!("{uri}");

    let Json(request) = payload.inspect_err(|e| warn!("bad request: {e}"))?;

    let response = state.plugin.control(&request).inspect_err(|e| {
        if !e.is_client_error() {
            error!("error: {e}");
        }
    })?;

    Ok(Json(response))
}
