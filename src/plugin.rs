//! Request dispatcher: the two plugin operations
//!
//! Each operation is one critical section under the state store's lock.
//! A control is validated, applied and reported on without releasing it.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::{
    catalog::{CATALOG, Controllable, active_control},
    config::PluginConfig,
    error::{PluginError, PluginResult},
    metric::MetricSource,
    report::ReportBuilder,
    state::StateStore,
    topology::{ControlRequest, ControlResponse, Report},
};

/// Long-lived plugin context shared by all request handlers
pub struct Plugin {
    host_id: String,
    store: StateStore,
    builder: ReportBuilder,
}

impl Plugin {
    /// Create a plugin reporting on `host_id` with the default catalog.
    pub fn new(
        host_id: impl Into<String>,
        config: PluginConfig,
        metric: Arc<dyn MetricSource>,
    ) -> Self {
        Self::with_catalog(host_id, config, metric, CATALOG)
    }

    pub fn with_catalog(
        host_id: impl Into<String>,
        config: PluginConfig,
        metric: Arc<dyn MetricSource>,
        catalog: &'static [Controllable],
    ) -> Self {
        let host_id = host_id.into();
        Self {
            builder: ReportBuilder::new(&host_id, config, metric),
            store: StateStore::new(catalog),
            host_id,
        }
    }

    pub fn host_id(&self) -> &str {
        &self.host_id
    }

    /// Key of the only node this plugin reports.
    pub fn node_key(&self) -> &str {
        self.builder.node_key()
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Produce the current report.
    #[instrument(skip(self))]
    pub fn report(&self) -> PluginResult<Report> {
        let guard = self.store.lock()?;
        self.builder.build(guard.snapshot())
    }

    /// Validate and apply a control, returning the report of the new state.
    ///
    /// Nothing is mutated when validation or the report build fails.
    #[instrument(skip(self, request), fields(node = %request.node_id, control = %request.control))]
    pub fn control(&self, request: &ControlRequest) -> PluginResult<ControlResponse> {
        let mut guard = self.store.lock()?;

        if request.node_id != self.node_key() {
            let err = PluginError::UnknownNode {
                expected: self.node_key().to_string(),
                got: request.node_id.clone(),
            };
            warn!("{err}");
            return Err(err);
        }

        let expected = active_control(guard.snapshot()).map(|control| control.id);
        if expected != Some(request.control.as_str()) {
            let err = PluginError::UnknownControl {
                expected: expected.map(str::to_string),
                got: request.control.clone(),
            };
            warn!("{err}");
            return Err(err);
        }

        guard.toggle_all();
        debug!(
            "applied {}, next active control: {:?}",
            request.control,
            active_control(guard.snapshot()).map(|control| control.id)
        );

        let report = match self.builder.build(guard.snapshot()) {
            Ok(report) => report,
            Err(err) => {
                // The caller never sees the new state, so it must not stick
                guard.toggle_all();
                return Err(err);
            }
        };
        Ok(ControlResponse {
            shortcut_report: Some(report),
        })
    }
}
