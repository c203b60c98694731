//! Topology report and control sidecar for a visualization host
//!
//! The plugin answers two requests on a local socket: `/report` returns a
//! snapshot of one host node, `/control` flips the controllables and returns
//! the resulting report.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod metric;
pub mod plugin;
pub mod report;
pub mod socket;
pub mod state;
pub mod topology;
pub mod util;

pub use error::{PluginError, PluginResult};
pub use plugin::Plugin;
pub use topology::{ControlRequest, ControlResponse, Report};
