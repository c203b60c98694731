use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use anyhow::Context;
use regex::Regex;
use sysinfo::System;
use tracing::trace;

use crate::metric::{CpuUsageMetric, FixedMetric, MetricSource};

/// Identity the plugin announces to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    pub id: String,
    pub label: String,
    pub description: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            id: crate::util::get_default_plugin_id(),
            label: default_label(),
            description: default_description(),
        }
    }
}

/// Plugin ids the host accepts: alphanumeric words joined by single dashes
static PLUGIN_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]+([-][A-Za-z0-9]+)*$").expect("plugin id pattern is valid")
});

/// Check that `id` is a valid plugin id.
///
/// The id names the socket directory, so anything else could point the
/// socket setup outside of the plugin's own directory.
pub fn validate_plugin_id(id: &str) -> anyhow::Result<()> {
    if PLUGIN_ID_PATTERN.is_match(id) {
        Ok(())
    } else {
        anyhow::bail!("{id:?} is not a valid plugin id")
    }
}

fn default_label() -> String {
    "Scope Plugin".to_string()
}

fn default_description() -> String {
    "Reports a host metric and exposes a pair of toggle controls".to_string()
}

/// Which metric source backs the reported metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// A constant value
    #[default]
    Fixed,

    /// Global CPU usage
    Cpu,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct PluginSection {
    pub id: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct MetricSection {
    pub kind: Option<MetricKind>,

    /// Value reported by the fixed source
    pub value: Option<f64>,
}

/// One layer of configuration; unset fields fall through to the next layer
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub plugin: PluginSection,

    /// Directory holding the `<id>/<id>.sock` socket directory
    pub socket_root: Option<PathBuf>,

    /// Host identity override (defaults to the system hostname)
    pub host_id: Option<String>,

    #[serde(default)]
    pub metric: MetricSection,
}

impl Config {
    /// Layer built from `PLUGIN_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            plugin: PluginSection {
                id: crate::util::get_plugin_id(),
                ..Default::default()
            },
            socket_root: crate::util::get_socket_root(),
            host_id: crate::util::get_host_id(),
            metric: MetricSection::default(),
        }
    }

    /// Fill every field unset in `self` from `lower`.
    pub fn merge(self, lower: Config) -> Config {
        Config {
            plugin: PluginSection {
                id: self.plugin.id.or(lower.plugin.id),
                label: self.plugin.label.or(lower.plugin.label),
                description: self.plugin.description.or(lower.plugin.description),
            },
            socket_root: self.socket_root.or(lower.socket_root),
            host_id: self.host_id.or(lower.host_id),
            metric: MetricSection {
                kind: self.metric.kind.or(lower.metric.kind),
                value: self.metric.value.or(lower.metric.value),
            },
        }
    }

    /// Apply defaults, looking up the system hostname if no host id is set.
    pub fn resolve(mut self) -> anyhow::Result<ResolvedConfig> {
        let host_id = match self.host_id.take() {
            Some(host_id) => host_id,
            None => System::host_name().context("could not determine the host name")?,
        };
        self.resolve_with_host(host_id)
    }

    fn resolve_with_host(self, host_id: String) -> anyhow::Result<ResolvedConfig> {
        let defaults = PluginConfig::default();
        let plugin = PluginConfig {
            id: self.plugin.id.unwrap_or(defaults.id),
            label: self.plugin.label.unwrap_or(defaults.label),
            description: self.plugin.description.unwrap_or(defaults.description),
        };

        validate_plugin_id(&plugin.id)?;

        let socket_root = self
            .socket_root
            .unwrap_or_else(crate::util::get_default_socket_root);
        let socket = crate::util::socket_path(&socket_root, &plugin.id);

        let metric = match self.metric.kind.unwrap_or_default() {
            MetricKind::Fixed => ResolvedMetric::Fixed(
                self.metric
                    .value
                    .unwrap_or_else(|| FixedMetric::default().0),
            ),
            MetricKind::Cpu => ResolvedMetric::Cpu,
        };

        let resolved = ResolvedConfig {
            plugin,
            socket,
            host_id,
            metric,
        };
        trace!("resolved config: {resolved:?}");
        Ok(resolved)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedMetric {
    Fixed(f64),
    Cpu,
}

impl ResolvedMetric {
    pub fn source(&self) -> Arc<dyn MetricSource> {
        match *self {
            ResolvedMetric::Fixed(value) => Arc::new(FixedMetric(value)),
            ResolvedMetric::Cpu => Arc::new(CpuUsageMetric::new()),
        }
    }
}

/// Fully resolved settings for one plugin process
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub plugin: PluginConfig,
    pub socket: PathBuf,
    pub host_id: String,
    pub metric: ResolvedMetric,
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}
