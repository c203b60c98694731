//! Helper functions for integration tests

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use scope_plugin::{Plugin, api, config::PluginConfig, metric::FixedMetric};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_HOST: &str = "test-host";
pub const TEST_NODE: &str = "test-host;<host>";

pub fn create_test_plugin_config() -> PluginConfig {
    PluginConfig {
        id: "test-plugin".to_string(),
        label: "Test Plugin".to_string(),
        description: "Plugin under test".to_string(),
    }
}

pub fn create_test_plugin() -> Arc<Plugin> {
    Arc::new(Plugin::new(
        TEST_HOST,
        create_test_plugin_config(),
        Arc::new(FixedMetric(0.42)),
    ))
}

pub fn report_request() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/report")
        .body(Body::empty())
        .unwrap()
}

pub fn control_request(node_id: &str, control: &str) -> Request<Body> {
    let body = serde_json::json!({ "NodeID": node_id, "Control": control });
    Request::builder()
        .method("POST")
        .uri("/control")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send `request` through a fresh router for `plugin` and decode the JSON body.
pub async fn send(plugin: &Arc<Plugin>, request: Request<Body>) -> (StatusCode, Value) {
    send_to(api::router(plugin.clone()), request).await
}

pub async fn send_to(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Dead flags of control-a and control-b in a serialized report.
pub fn dead_flags(report: &Value) -> (bool, bool) {
    let controls = &report["Host"]["nodes"][TEST_NODE]["latestControls"];
    (
        controls["control-a"]["value"]["dead"].as_bool().unwrap(),
        controls["control-b"]["value"]["dead"].as_bool().unwrap(),
    )
}
