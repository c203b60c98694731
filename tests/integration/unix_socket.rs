//! End-to-end tests over a real Unix socket

use std::path::Path;

use scope_plugin::{api, socket::setup_socket};
use serde_json::Value;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::UnixStream,
    sync::oneshot,
};

use crate::helpers::*;

/// Issue one HTTP/1.1 request over `socket` and return (status, body).
async fn roundtrip(socket: &Path, method: &str, path: &str, body: &str) -> (u16, Value) {
    let mut stream = UnixStream::connect(socket).await.unwrap();
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
         Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let raw = String::from_utf8(raw).unwrap();

    let status = raw
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap();
    let (_, body) = raw.split_once("\r\n\r\n").unwrap();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_report_and_control_over_unix_socket() {
    let root = tempfile::tempdir().unwrap();
    let socket = root.path().join("test-plugin").join("test-plugin.sock");
    let listener = setup_socket(&socket).unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(api::serve(listener, create_test_plugin(), async move {
        let _ = shutdown_rx.await;
    }));

    let (status, report) = roundtrip(&socket, "GET", "/report", "").await;
    assert_eq!(status, 200);
    assert_eq!(dead_flags(&report), (true, false));

    let body = format!(r#"{{"NodeID": "{TEST_NODE}", "Control": "control-b"}}"#);
    let (status, response) = roundtrip(&socket, "POST", "/control", &body).await;
    assert_eq!(status, 200);
    assert_eq!(dead_flags(&response["shortcutReport"]), (false, true));

    let (status, _) = roundtrip(&socket, "POST", "/control", &body).await;
    assert_eq!(status, 400);

    shutdown_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
