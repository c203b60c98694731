//! Report endpoint

use axum::{Json, extract::State, http::Uri};
use tracing::{error, info};

use crate::{
    api::{error::ApiResult, state::ApiState},
    topology::Report,
};

/// GET|POST /report
///
/// Implements the "reporter" interface every plugin must provide.
pub async fn get_report(State(state): State<ApiState>, uri: Uri) -> ApiResult<Json<Report>> {
    info!("{uri}");

    let report = state.plugin.report().inspect_err(|e| error!("error: {e}"))?;

    Ok(Json(report))
}
