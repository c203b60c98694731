//! Report types exchanged with the visualization host
//!
//! Field names follow what the host expects on the wire, so several structs
//! carry explicit serde renames.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full snapshot returned by `/report`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "Host")]
    pub host: Topology,

    #[serde(rename = "Plugins")]
    pub plugins: Vec<PluginSpec>,
}

impl Report {
    /// The single node of the host topology, if present.
    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.host.nodes.get(node_id)
    }
}

/// Generic representation of a topology (host, container, pod, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub nodes: HashMap<String, Node>,
    pub controls: HashMap<String, Control>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata_templates: HashMap<String, MetadataTemplate>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub table_templates: HashMap<String, TableTemplate>,

    pub metric_templates: HashMap<String, MetricTemplate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub metrics: HashMap<String, Metric>,

    #[serde(
        rename = "latestControls",
        default,
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub latest_controls: HashMap<String, ControlEntry>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub latest: HashMap<String, StringEntry>,
}

/// Data backing a metric graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<Sample>,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub date: DateTime<Utc>,
    pub value: f64,
}

/// Timestamped alive/dead state of one control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlEntry {
    pub timestamp: DateTime<Utc>,
    pub value: ControlData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlData {
    pub dead: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringEntry {
    pub timestamp: DateTime<Utc>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub id: String,
    pub human: String,
    pub icon: String,
    pub rank: i32,
}

/// Describes a table; rows whose key starts with `prefix` belong to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableTemplate {
    pub id: String,
    pub label: String,
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataTemplate {
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,

    /// Truncate the value to this length when > 0
    #[serde(default, skip_serializing_if = "is_zero")]
    pub truncate: u32,

    #[serde(rename = "dataType", default, skip_serializing_if = "String::is_empty")]
    pub datatype: String,

    pub priority: f64,

    /// Where in the node the value lives
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub from: String,
}

/// How the host should render a metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTemplate {
    pub id: String,
    pub label: String,
    pub format: String,
    pub priority: f64,
}

/// Self-description of the plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSpec {
    pub id: String,
    pub label: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    pub interfaces: Vec<String>,
    pub api_version: String,
}

/// Body of a `/control` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlRequest {
    #[serde(rename = "NodeID", alias = "nodeID", alias = "nodeId")]
    pub node_id: String,

    #[serde(rename = "Control", alias = "control")]
    pub control: String,
}

/// Body of a successful `/control` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlResponse {
    #[serde(rename = "shortcutReport", skip_serializing_if = "Option::is_none")]
    pub shortcut_report: Option<Report>,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}
