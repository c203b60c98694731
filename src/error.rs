//! Error types for report and control operations

use std::fmt;

/// Result type alias for plugin operations
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors that can occur while serving a report or applying a control
#[derive(Debug)]
pub enum PluginError {
    /// The control request targeted a node this plugin does not report
    UnknownNode { expected: String, got: String },

    /// The requested control is not the currently actionable one
    ///
    /// `expected` is `None` when every controllable is dead.
    UnknownControl {
        expected: Option<String>,
        got: String,
    },

    /// The metric source failed to produce a value
    MetricSource(anyhow::Error),

    /// A previous holder of the state lock panicked
    LockPoisoned,
}

impl PluginError {
    /// Whether the failure was caused by the caller rather than the plugin.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PluginError::UnknownNode { .. } | PluginError::UnknownControl { .. }
        )
    }
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginError::UnknownNode { expected, got } => {
                write!(f, "bad node id, expected {expected:?}, got {got:?}")
            }
            PluginError::UnknownControl {
                expected: Some(expected),
                got,
            } => write!(f, "bad control, expected {expected:?}, got {got:?}"),
            PluginError::UnknownControl {
                expected: None,
                got,
            } => write!(f, "bad control, no control is active, got {got:?}"),
            PluginError::MetricSource(err) => write!(f, "metric source failed: {err:#}"),
            PluginError::LockPoisoned => write!(f, "plugin state lock poisoned"),
        }
    }
}

impl std::error::Error for PluginError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PluginError::MetricSource(err) => Some(&**err),
            _ => None,
        }
    }
}
