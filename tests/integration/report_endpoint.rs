//! Tests for GET /report

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::helpers::*;

#[tokio::test]
async fn test_report_returns_single_host_node() {
    let plugin = create_test_plugin();

    let (status, report) = send(&plugin, report_request()).await;

    assert_eq!(status, StatusCode::OK);
    let nodes = report["Host"]["nodes"].as_object().unwrap();
    assert_eq!(nodes.len(), 1);
    assert!(nodes.contains_key(TEST_NODE));
}

#[tokio::test]
async fn test_report_contains_controls_before_any_invocation() {
    let plugin = create_test_plugin();

    let (_, report) = send(&plugin, report_request()).await;

    assert_eq!(
        report["Host"]["controls"]["control-a"],
        json!({"id": "control-a", "human": "Control A", "icon": "fa-bomb", "rank": 1})
    );
    assert_eq!(
        report["Host"]["controls"]["control-b"],
        json!({"id": "control-b", "human": "Control B", "icon": "fa-adjust", "rank": 2})
    );
    assert_eq!(dead_flags(&report), (true, false));
}

#[tokio::test]
async fn test_report_contains_templates() {
    let plugin = create_test_plugin();

    let (_, report) = send(&plugin, report_request()).await;
    let host = &report["Host"];

    assert_eq!(
        host["metric_templates"]["metric-id"],
        json!({"id": "metric-id", "label": "Metric", "format": "percent", "priority": 0.1})
    );
    assert_eq!(
        host["metadata_templates"]["test-plugin-label-1"],
        json!({"id": "test-plugin-label-1", "label": "Label 1", "priority": 13.5, "from": "latest"})
    );
    assert_eq!(
        host["table_templates"]["test-plugin-table"],
        json!({"id": "test-plugin-table", "label": "Plugin Table", "prefix": "test-plugin-table-"})
    );
}

#[tokio::test]
async fn test_report_metric_and_latest_rows() {
    let plugin = create_test_plugin();

    let (_, report) = send(&plugin, report_request()).await;
    let node = &report["Host"]["nodes"][TEST_NODE];
    let metric = &node["metrics"]["metric-id"];

    assert_eq!(metric["min"], 0.0);
    assert_eq!(metric["max"], 100.0);
    assert_eq!(metric["samples"].as_array().unwrap().len(), 1);
    assert_eq!(metric["samples"][0]["value"], 0.42);
    assert!(metric["samples"][0]["date"].is_string());

    assert_eq!(node["latest"]["test-plugin-label-1"]["value"], "Value 1");
    assert_eq!(node["latest"]["test-plugin-table-label-2"]["value"], "Value 2");
}

#[tokio::test]
async fn test_report_plugin_descriptor() {
    let plugin = create_test_plugin();

    let (_, report) = send(&plugin, report_request()).await;

    assert_eq!(
        report["Plugins"],
        json!([{
            "id": "test-plugin",
            "label": "Test Plugin",
            "description": "Plugin under test",
            "interfaces": ["reporter", "controller"],
            "api_version": "1"
        }])
    );
}

#[tokio::test]
async fn test_repeated_reports_do_not_change_state() {
    let plugin = create_test_plugin();

    for _ in 0..10 {
        let (status, report) = send(&plugin, report_request()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dead_flags(&report), (true, false));
    }
}

#[tokio::test]
async fn test_report_metric_source_failure_is_server_error() {
    use scope_plugin::{Plugin, metric::MetricSource};
    use std::sync::Arc;

    struct Broken;

    impl MetricSource for Broken {
        fn value(&self) -> anyhow::Result<f64> {
            anyhow::bail!("sensor offline")
        }
    }

    let plugin = Arc::new(Plugin::new(
        TEST_HOST,
        create_test_plugin_config(),
        Arc::new(Broken),
    ));

    let (status, body) = send(&plugin, report_request()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("sensor offline"));
}

#[tokio::test]
async fn test_report_answers_post() {
    use axum::{body::Body, http::Request};

    let plugin = create_test_plugin();
    let request = Request::builder()
        .method("POST")
        .uri("/report")
        .body(Body::empty())
        .unwrap();

    let (status, report) = send(&plugin, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dead_flags(&report), (true, false));
}
