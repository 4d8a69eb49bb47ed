// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/web_server.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the HTTP surface of the exporter. It serves the target
// entry form and runs one scrape for every request to /metrics, answering in
// the Prometheus text exposition format.
//
// Tree Location:
// - src/web_server.rs (HTTP router and server)
// - Depends on: axum, serde, collector, metrics

use crate::collector::Collector;
use crate::metrics::{self, CONTENT_TYPE};
use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use log::{debug, error, info};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;

const LOG_TARGET: &str = "ethminer::exporter::web_server";

/// Query parameters accepted by /metrics
#[derive(Debug, Default, Deserialize)]
pub struct MetricsParams {
    /// Single `host:port` to scrape instead of running discovery
    pub target: Option<String>,
}

/// Build the exporter router
pub fn router(collector: Arc<Collector>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(collector)
}

/// Bind `listen` and serve until the server fails
pub async fn start_web_server(listen: SocketAddr, collector: Arc<Collector>) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen).await.map_err(|e| {
        error!(target: LOG_TARGET, "❌ Failed to bind web server to {}: {}", listen, e);
        e
    })?;

    info!(target: LOG_TARGET, "🌐 Listening on http://{}", listen);
    info!(target: LOG_TARGET, "📊 Metrics endpoint: http://{}/metrics", listen);

    axum::serve(listener, router(collector)).await?;
    Ok(())
}

async fn index_handler() -> Html<&'static str> {
    debug!(target: LOG_TARGET, "📄 Serving index page");
    Html(include_str!("index.html"))
}

/// Run one scrape. Per-target failures never change the status code.
async fn metrics_handler(
    State(collector): State<Arc<Collector>>,
    Query(params): Query<MetricsParams>,
) -> Response {
    let result = collector.collect(params.target.as_deref()).await;

    match metrics::render(&result.samples) {
        Ok(body) => ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!(target: LOG_TARGET, "❌ Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{StaticDiscovery, TargetResolver};
    use crate::rig::RigClient;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app() -> Router {
        let resolver = TargetResolver::new(1, Arc::new(StaticDiscovery::default()));
        let client = RigClient::new(Duration::from_millis(100));
        router(Arc::new(Collector::new(resolver, client)))
    }

    #[tokio::test]
    async fn test_index_serves_form() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("<form action=\"/metrics\">"));
        assert!(html.contains("name=\"target\""));
    }

    #[tokio::test]
    async fn test_unreachable_rig_still_answers_ok() {
        let response = app()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            CONTENT_TYPE
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }
}

// Changelog:
// - v1.1.0 (2025-07-14): Router split from server startup.
//   - `router` is public so the HTTP surface can be driven in tests.
//   - Listen address comes from the command line.
// - v1.0.0 (2025-07-02): Initial web server.
//   - GET / serves the target entry form.
//   - GET /metrics runs one scrape and returns the text exposition format.
