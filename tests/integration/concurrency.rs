//! Concurrency tests
//!
//! Requests race for the state lock; these tests check that no interleaving
//! can expose a half-applied control or let two stale controls both succeed.

use axum::http::StatusCode;
use scope_plugin::api;

use crate::helpers::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_identical_controls_apply_once() {
    let plugin = create_test_plugin();
    let router = api::router(plugin.clone());

    let mut tasks = vec![];
    for _ in 0..32 {
        let router = router.clone();
        tasks.push(tokio::spawn(async move {
            send_to(router, control_request(TEST_NODE, "control-b")).await
        }));
    }

    let mut successes = 0;
    for task in tasks {
        let (status, _) = task.await.unwrap();
        if status == StatusCode::OK {
            successes += 1;
        } else {
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    assert_eq!(successes, 1, "exactly one control-b can win the race");
    let (_, report) = send(&plugin, report_request()).await;
    assert_eq!(dead_flags(&report), (false, true));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mixed_requests_keep_controls_in_lock_step() {
    let plugin = create_test_plugin();
    let router = api::router(plugin.clone());

    let mut tasks = vec![];
    for i in 0..60 {
        let router = router.clone();
        let request = match i % 3 {
            0 => control_request(TEST_NODE, "control-a"),
            1 => control_request(TEST_NODE, "control-b"),
            _ => report_request(),
        };
        tasks.push(tokio::spawn(
            async move { send_to(router, request).await },
        ));
    }

    let mut control_successes = 0;
    for task in tasks {
        let (status, body) = task.await.unwrap();
        if status != StatusCode::OK {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            continue;
        }

        let report = match body.get("shortcutReport") {
            Some(report) => {
                control_successes += 1;
                report.clone()
            }
            None => body,
        };
        let (a, b) = dead_flags(&report);
        assert_ne!(a, b, "controls must never be observed out of lock-step");
    }

    assert!(control_successes >= 1);
    let (_, report) = send(&plugin, report_request()).await;
    let expected = if control_successes % 2 == 0 {
        (true, false)
    } else {
        (false, true)
    };
    assert_eq!(dead_flags(&report), expected);
}
