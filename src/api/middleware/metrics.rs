//! Per-request Prometheus metrics

use std::time::Instant;

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};

use crate::infrastructure::observability::record_http_request;

/// Label for requests that matched no route
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Records count and latency per method, route and status
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let route = route_label(&request).to_owned();

    let response = next.run(request).await;

    record_http_request(method.as_str(), &route, response.status().as_u16(), start.elapsed());

    response
}

/// Route template, so ids in paths never become label values
fn route_label(request: &Request<Body>) -> &str {
    request
        .extensions()
        .get::<MatchedPath>()
        .map_or(UNMATCHED_ROUTE, MatchedPath::as_str)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{middleware, Router};
    use tower::ServiceExt;

    use super::*;

    async fn echo_label(request: Request<Body>, next: Next) -> Response {
        let label = route_label(&request).to_string();
        let mut response = next.run(request).await;
        response
            .headers_mut()
            .insert("x-route-label", label.parse().unwrap());
        response
    }

    fn app() -> Router {
        Router::new()
            .route("/vector-stores/{id}", get(|| async { (StatusCode::ACCEPTED, "ok") }))
            .layer(middleware::from_fn(echo_label))
            .layer(middleware::from_fn(metrics_middleware))
    }

    async fn label_for(uri: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let label = response.headers()["x-route-label"].to_str().unwrap().to_string();
        (response.status(), label)
    }

    #[tokio::test]
    async fn test_matched_route_uses_template() {
        let (status, label) = label_for("/vector-stores/550e8400-e29b-41d4-a716-446655440000").await;

        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(label, "/vector-stores/{id}");
    }

    #[tokio::test]
    async fn test_unknown_path_is_unmatched() {
        let (status, label) = label_for("/pages/12/text").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(label, UNMATCHED_ROUTE);
    }

    #[test]
    fn test_request_without_route_is_unmatched() {
        let request = Request::builder().uri("/rag-status").body(Body::empty()).unwrap();
        assert_eq!(route_label(&request), "unmatched");
    }
}
