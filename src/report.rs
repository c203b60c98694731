//! Builds the topology report from the current control states
//!
//! Building is a pure function of the host identity, the control states,
//! the static templates and the clock. The only failure is the metric source.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    catalog::ControlStates,
    config::PluginConfig,
    error::{PluginError, PluginResult},
    metric::MetricSource,
    topology::{
        Control, ControlData, ControlEntry, MetadataTemplate, Metric, MetricTemplate, Node,
        PluginSpec, Report, Sample, StringEntry, TableTemplate, Topology,
    },
};

/// Suffix appended to the host id to form the node key
pub const HOST_NODE_SUFFIX: &str = ";<host>";

pub const METRIC_ID: &str = "metric-id";
pub const METRIC_LABEL: &str = "Metric";
pub const METRIC_MIN: f64 = 0.0;
pub const METRIC_MAX: f64 = 100.0;

pub const API_VERSION: &str = "1";
pub const INTERFACES: [&str; 2] = ["reporter", "controller"];

/// Key of the host node for `host_id`.
pub fn node_key(host_id: &str) -> String {
    format!("{host_id}{HOST_NODE_SUFFIX}")
}

/// Assembles reports for a single host
pub struct ReportBuilder {
    node_key: String,
    plugin: PluginConfig,
    metric: Arc<dyn MetricSource>,
}

impl ReportBuilder {
    pub fn new(host_id: &str, plugin: PluginConfig, metric: Arc<dyn MetricSource>) -> Self {
        Self {
            node_key: node_key(host_id),
            plugin,
            metric,
        }
    }

    pub fn node_key(&self) -> &str {
        &self.node_key
    }

    pub fn plugin(&self) -> &PluginConfig {
        &self.plugin
    }

    /// Build a report stamped with the current time.
    pub fn build(&self, states: &ControlStates) -> PluginResult<Report> {
        self.build_at(states, Utc::now())
    }

    /// Build a report stamped with `now`.
    pub fn build_at(&self, states: &ControlStates, now: DateTime<Utc>) -> PluginResult<Report> {
        let node = Node {
            metrics: self.metrics(now)?,
            latest_controls: latest_controls(states, now),
            latest: self.latest(now),
        };

        Ok(Report {
            host: Topology {
                nodes: HashMap::from([(self.node_key.clone(), node)]),
                controls: controls(states),
                metadata_templates: self.metadata_templates(),
                table_templates: self.table_templates(),
                metric_templates: metric_templates(),
            },
            plugins: vec![self.plugin_spec()],
        })
    }

    fn metrics(&self, now: DateTime<Utc>) -> PluginResult<HashMap<String, Metric>> {
        let value = self.metric.value().map_err(PluginError::MetricSource)?;

        Ok(HashMap::from([(
            METRIC_ID.to_string(),
            Metric {
                samples: vec![Sample { date: now, value }],
                min: METRIC_MIN,
                max: METRIC_MAX,
            },
        )]))
    }

    /// Two static demo rows bound to the metadata and table templates.
    fn latest(&self, now: DateTime<Utc>) -> HashMap<String, StringEntry> {
        let entry = |value: &str| StringEntry {
            timestamp: now,
            value: value.to_string(),
        };

        HashMap::from([
            (format!("{}-label-1", self.plugin.id), entry("Value 1")),
            (format!("{}label-2", self.table_prefix()), entry("Value 2")),
        ])
    }

    fn metadata_templates(&self) -> HashMap<String, MetadataTemplate> {
        [("label-1", "Label 1", 13.5), ("label-2", "Label 2", 13.6)]
            .into_iter()
            .map(|(suffix, label, priority)| {
                let id = format!("{}-{suffix}", self.plugin.id);
                let template = MetadataTemplate {
                    id: id.clone(),
                    label: label.to_string(),
                    truncate: 0,
                    datatype: String::new(),
                    priority,
                    from: "latest".to_string(),
                };
                (id, template)
            })
            .collect()
    }

    fn table_templates(&self) -> HashMap<String, TableTemplate> {
        let id = format!("{}-table", self.plugin.id);
        HashMap::from([(
            id.clone(),
            TableTemplate {
                id,
                label: "Plugin Table".to_string(),
                prefix: self.table_prefix(),
            },
        )])
    }

    fn table_prefix(&self) -> String {
        format!("{}-table-", self.plugin.id)
    }

    fn plugin_spec(&self) -> PluginSpec {
        PluginSpec {
            id: self.plugin.id.clone(),
            label: self.plugin.label.clone(),
            description: self.plugin.description.clone(),
            interfaces: INTERFACES.iter().map(|i| i.to_string()).collect(),
            api_version: API_VERSION.to_string(),
        }
    }
}

fn controls(states: &ControlStates) -> HashMap<String, Control> {
    states
        .iter()
        .map(|(control, _)| {
            (
                control.id.to_string(),
                Control {
                    id: control.id.to_string(),
                    human: control.human.to_string(),
                    icon: control.icon.to_string(),
                    rank: control.rank,
                },
            )
        })
        .collect()
}

fn latest_controls(states: &ControlStates, now: DateTime<Utc>) -> HashMap<String, ControlEntry> {
    states
        .iter()
        .map(|(control, dead)| {
            (
                control.id.to_string(),
                ControlEntry {
                    timestamp: now,
                    value: ControlData { dead },
                },
            )
        })
        .collect()
}

fn metric_templates() -> HashMap<String, MetricTemplate> {
    HashMap::from([(
        METRIC_ID.to_string(),
        MetricTemplate {
            id: METRIC_ID.to_string(),
            label: METRIC_LABEL.to_string(),
            format: "percent".to_string(),
            priority: 0.1,
        },
    )])
}
