// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: tests/integration_test.rs
// Version: 1.0.1
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file contains integration tests for the ethminer exporter, located in
// the tests directory. Fake rigs listen on loopback and answer
// miner_getstatdetail so a full scrape (resolve, sample, map, render) can be
// checked end to end, including through the HTTP router.
//
// Tree Location:
// - tests/integration_test.rs (integration tests)
// - Depends on: ethminer-exporter, tokio, tower, axum

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use ethminer_exporter::metrics::{self, MetricKind};
    use ethminer_exporter::rig::{DecodeError, SampleError};
    use ethminer_exporter::web_server::router;
    use ethminer_exporter::{Collector, RigClient, StaticDiscovery, Target, TargetResolver};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;
    use tower::ServiceExt;

    const TWO_DEVICE_RIG: &str = r#"{"id":0,"jsonrpc":"2.0","result":{"connection":{"connected":true,"switches":1,"uri":"stratum1+tcp://pool:4444"},"devices":[{"_index":0,"_mode":"CUDA","hardware":{"name":"GeForce GTX 1080 8.0 GB","pci":"01:00.0","sensors":[61,40,120],"type":"GPU"},"mining":{"hashrate":"0x1a","pause_reason":null,"paused":false,"segment":["0x0","0x0"],"shares":[12,1,0,30]}},{"_index":1,"_mode":"CUDA","hardware":{"name":"GeForce GTX 1070","pci":"02:00.0","sensors":[58,35,110],"type":"GPU"},"mining":{"hashrate":"0x10","pause_reason":"low_memory","paused":true,"segment":["0x0","0x0"],"shares":[3,0,0,120]}}],"host":{"name":"rig01","runtime":3600,"version":"ethminer-0.19.0"},"mining":{"difficulty":4.0,"epoch":400,"epoch_changes":1,"hashrate":"0x2a","shares":[15,1,0,30]}}}"#;

    const API_ERROR: &str = r#"{"id":0,"jsonrpc":"2.0","error":{"code":5,"message":"bad method"}}"#;

    /// Accept connections forever, answering every request line with `reply`
    async fn fake_rig(reply: &'static str) -> Target {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let target = Target::new(listener.local_addr().unwrap().to_string());
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let (read, mut write) = socket.into_split();
                    let mut request = String::new();
                    if BufReader::new(read).read_line(&mut request).await.is_ok()
                        && request.contains("miner_getstatdetail")
                    {
                        let _ = write.write_all(format!("{}\n", reply).as_bytes()).await;
                    }
                });
            }
        });
        target
    }

    async fn refused_target() -> Target {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let target = Target::new(listener.local_addr().unwrap().to_string());
        drop(listener);
        target
    }

    fn collector() -> Collector {
        let resolver = TargetResolver::new(1, Arc::new(StaticDiscovery::default()));
        Collector::new(resolver, RigClient::new(Duration::from_millis(500)))
    }

    #[tokio::test]
    async fn test_unreachable_target_does_not_block_others() {
        let targets = vec![refused_target().await, fake_rig(TWO_DEVICE_RIG).await];
        let result = collector().collect_targets(&targets).await;

        assert_eq!(result.failures.len(), 1, "Only the refused target should fail");
        assert_eq!(result.failures[0].target, targets[0]);
        assert!(matches!(result.failures[0].error, SampleError::Unreachable { .. }));

        assert_eq!(result.samples.len(), 2 + 9 * 2, "Two global samples plus nine per device");
        assert!(
            result
                .samples
                .iter()
                .all(|s| s.label("api_endpoint") == Some(targets[1].as_str())),
            "Every sample should belong to the reachable rig"
        );
    }

    #[tokio::test]
    async fn test_api_error_yields_no_samples() {
        let target = fake_rig(API_ERROR).await;
        let result = collector().collect_targets(&[target]).await;

        assert!(result.samples.is_empty());
        assert_eq!(result.failures.len(), 1);
        match &result.failures[0].error {
            SampleError::Decode(DecodeError::ApiError { code, message }) => {
                assert_eq!(*code, 5);
                assert_eq!(message, "bad method");
            }
            other => panic!("Expected an API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_device_samples_carry_decoded_values() {
        let target = fake_rig(TWO_DEVICE_RIG).await;
        let result = collector().collect(Some(target.as_str())).await;
        assert!(result.failures.is_empty());

        let hashrate = result
            .samples
            .iter()
            .find(|s| s.name() == "ethminer_hashrate" && s.label("device") == Some("01:00.0"))
            .expect("hashrate of device 0");
        assert_eq!(hashrate.value, 26.0);
        assert_eq!(hashrate.label("name"), Some("GeForce GTX 1080"));
        assert_eq!(hashrate.label("type"), Some("GPU"));
        assert_eq!(hashrate.label("mode"), Some("CUDA"));

        let paused = result
            .samples
            .iter()
            .find(|s| s.name() == "ethminer_paused" && s.label("device") == Some("02:00.0"))
            .expect("paused flag of device 1");
        assert_eq!(paused.value, 1.0);
        assert_eq!(paused.label("reason"), Some("low_memory"));

        let found = result
            .samples
            .iter()
            .find(|s| s.name() == "ethminer_found_shares_total" && s.label("device") == Some("01:00.0"))
            .expect("found shares of device 0");
        assert_eq!(found.kind(), MetricKind::Counter);
        assert_eq!(found.value, 12.0);

        let connected = result
            .samples
            .iter()
            .find(|s| s.name() == "ethminer_connected")
            .expect("connected flag");
        assert_eq!(connected.value, 1.0);
        assert_eq!(connected.label("uri"), Some("stratum1+tcp://pool:4444"));
    }

    #[tokio::test]
    async fn test_extreme_wire_values_still_render() {
        const EXTREME: &str = r#"{"id":0,"jsonrpc":"2.0","result":{"host":{"runtime":-9223372036854775808},"devices":[{"hardware":{"pci":"03:00.0"},"mining":{"shares":[1,0,0,9223372036854775808]}}]}}"#;
        let target = fake_rig(EXTREME).await;
        let result = collector().collect(Some(target.as_str())).await;

        assert!(result.failures.is_empty());
        assert_eq!(result.samples.len(), 2 + 9);
        let body = metrics::render(&result.samples).unwrap();
        assert!(body.contains("ethminer_last_share_timestamp{"));
    }

    #[tokio::test]
    async fn test_rendered_scrape_contains_metric_families() {
        let target = fake_rig(TWO_DEVICE_RIG).await;
        let result = collector().collect(Some(target.as_str())).await;
        let body = metrics::render(&result.samples).unwrap();

        assert!(body.contains("# TYPE ethminer_hashrate gauge"));
        assert!(body.contains("# TYPE ethminer_found_shares_total counter"));
        assert!(body.contains("ethminer_started_timestamp{"));
        assert!(body.contains("version=\"ethminer-0.19.0\""));
    }

    #[tokio::test]
    async fn test_http_metrics_with_explicit_target() {
        let target = fake_rig(TWO_DEVICE_RIG).await;
        let app = router(Arc::new(collector()));

        let uri = format!("/metrics?target={}", target);
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("ethminer_hashrate{"));
        assert!(text.contains(&format!("api_endpoint=\"{}\"", target)));
    }

    #[tokio::test]
    async fn test_http_all_targets_failing_is_empty_ok() {
        let target = refused_target().await;
        let app = router(Arc::new(collector()));

        let uri = format!("/metrics?target={}", target);
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty(), "No reachable rig should render an empty body");
    }

    #[tokio::test]
    async fn test_http_index_page() {
        let app = router(Arc::new(collector()));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Ethminer Exporter"));
    }
}

// Changelog:
// - v1.0.1 (2025-07-21): Scrape with out-of-range runtime and share age.
// - v1.0.0 (2025-07-02): Initial integration tests.
//   - Fake loopback rigs cover partial failure, API errors and value mapping.
//   - The HTTP router is driven with tower's oneshot.
