//! Integration tests for the cobuy HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

#![allow(clippy::unwrap_used, clippy::panic)]

use axum::body::Body;
use axum::http::{HeaderValue, Request, StatusCode, header};
use axum_test::TestServer;
use cobuy::api::{
    AppState, CategoriesResponse, ErrorResponse, HealthResponse, NeighborsResponse,
    PathResponse, PopularResponse, ProductResponse, RecommendResponse, create_router,
};
use cobuy_core::{CoGraph, GraphSummary, ProductRecord, Review, Subgraph, build};
use tower::ServiceExt;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Triangle A-B-C (weights AB=2, AC=1, BC=2) plus an isolated D.
fn sample_graph() -> CoGraph {
    let products = vec![
        ProductRecord::new("A", "Cable").with_category("Electronics|Cables"),
        ProductRecord::new("B", "Charger").with_category("Electronics|Power"),
        ProductRecord::new("C", "Adapter").with_category("Electronics|Cables"),
        ProductRecord::new("D", "Novel").with_category("Books"),
    ];
    let reviews = vec![
        Review::new("user1", "A", 5.0),
        Review::new("user1", "B", 4.0),
        Review::new("user2", "A", 3.0),
        Review::new("user2", "B", 3.0),
        Review::new("user2", "C", 2.0),
        Review::new("user3", "B", 5.0),
        Review::new("user3", "C", 1.0),
        Review::new("user4", "D", 4.0),
    ];
    build(&products, &reviews)
}

fn create_test_server() -> TestServer {
    let router = create_router(AppState::new(sample_graph()));
    TestServer::new(router).unwrap()
}

fn create_empty_test_server() -> TestServer {
    let router = create_router(AppState::new(CoGraph::new()));
    TestServer::new(router).unwrap()
}

// =============================================================================
// HEALTH & SUMMARY TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_summary_endpoint() {
    let server = create_test_server();

    let response = server.get("/summary").await;

    response.assert_status_ok();
    let summary: GraphSummary = response.json();
    assert_eq!(summary.node_count, 4);
    assert_eq!(summary.edge_count, 3);
    assert_eq!(summary.total_weight, 5);
    assert_eq!(summary.max_degree, 2);
    assert_eq!(summary.isolated_nodes, 1);
}

#[tokio::test]
async fn test_categories_endpoint() {
    let server = create_test_server();

    let response = server.get("/categories").await;

    response.assert_status_ok();
    let body: CategoriesResponse = response.json();
    assert_eq!(body.categories, vec!["Books", "Electronics"]);
}

// =============================================================================
// PRODUCT TESTS
// =============================================================================

#[tokio::test]
async fn test_product_stats() {
    let server = create_test_server();

    let response = server.get("/products/A").await;

    response.assert_status_ok();
    let body: ProductResponse = response.json();
    assert!(body.success);
    assert_eq!(body.product.name, "Cable");
    assert_eq!(body.product.category, vec!["Electronics", "Cables"]);
    assert_eq!(body.product.link, "https://www.amazon.com/dp/A");
}

#[tokio::test]
async fn test_product_stats_unknown() {
    let server = create_test_server();

    let response = server.get("/products/ZZZ").await;

    response.assert_status_not_found();
    let body: ErrorResponse = response.json();
    assert!(!body.success);
    assert!(body.error.contains("ZZZ"));
}

#[tokio::test]
async fn test_recommendations_ranked_by_weight() {
    let server = create_test_server();

    let response = server.get("/products/A/recommendations").await;

    response.assert_status_ok();
    let body: RecommendResponse = response.json();
    let ids: Vec<_> = body
        .recommendations
        .iter()
        .map(|r| r.product_id.as_str())
        .collect();
    assert_eq!(ids, vec!["B", "C"]);
    assert_eq!(body.recommendations[0].weight.value(), 2);
    assert_eq!(body.recommendations[1].weight.value(), 1);
}

#[tokio::test]
async fn test_recommendations_top_n() {
    let server = create_test_server();

    let response = server
        .get("/products/A/recommendations")
        .add_query_param("top_n", 1)
        .await;

    response.assert_status_ok();
    let body: RecommendResponse = response.json();
    assert_eq!(body.recommendations.len(), 1);
    assert_eq!(body.recommendations[0].product_id, "B");
}

#[tokio::test]
async fn test_recommendations_top_n_too_large() {
    let server = create_test_server();

    let response = server
        .get("/products/A/recommendations")
        .add_query_param("top_n", 1000)
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_recommendations_isolated_and_unknown() {
    let server = create_test_server();

    let response = server.get("/products/D/recommendations").await;
    response.assert_status_ok();
    let body: RecommendResponse = response.json();
    assert_eq!(body.product_id, "D");
    assert!(body.recommendations.is_empty());

    server
        .get("/products/ZZZ/recommendations")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_neighbors_endpoint() {
    let server = create_test_server();

    let response = server.get("/products/C/neighbors").await;

    response.assert_status_ok();
    let body: NeighborsResponse = response.json();
    let ids: Vec<_> = body.neighbors.iter().map(|n| n.product_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);

    let response = server.get("/products/D/neighbors").await;
    response.assert_status_ok();
    let body: NeighborsResponse = response.json();
    assert!(body.neighbors.is_empty());

    server
        .get("/products/ZZZ/neighbors")
        .await
        .assert_status_not_found();
}

// =============================================================================
// GRAPH TESTS
// =============================================================================

#[tokio::test]
async fn test_shortest_path_direct_edge() {
    let server = create_test_server();

    let response = server
        .get("/path")
        .add_query_param("from", "A")
        .add_query_param("to", "C")
        .await;

    response.assert_status_ok();
    let body: PathResponse = response.json();
    assert_eq!(body.hops, 1);
    let ids: Vec<_> = body.path.iter().map(|s| s.product_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "C"]);
    assert_eq!(body.path[1].name, "Adapter");
}

#[tokio::test]
async fn test_shortest_path_to_self() {
    let server = create_test_server();

    let response = server
        .get("/path")
        .add_query_param("from", "D")
        .add_query_param("to", "D")
        .await;

    response.assert_status_ok();
    let body: PathResponse = response.json();
    assert_eq!(body.hops, 0);
    assert_eq!(body.path.len(), 1);
}

#[tokio::test]
async fn test_shortest_path_unreachable() {
    let server = create_test_server();

    let response = server
        .get("/path")
        .add_query_param("from", "A")
        .add_query_param("to", "D")
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_shortest_path_missing_params() {
    let server = create_test_server();

    let response = server.get("/path").add_query_param("from", "A").await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_popular_endpoint() {
    let server = create_test_server();

    let response = server.get("/popular").await;

    response.assert_status_ok();
    let body: PopularResponse = response.json();
    assert_eq!(body.most_connected.product_id, "B");
    assert_eq!(body.most_connected.degree, 2);
    assert_eq!(body.product.name, "Charger");
}

#[tokio::test]
async fn test_popular_on_empty_graph() {
    let server = create_empty_test_server();

    server.get("/popular").await.assert_status_not_found();
}

#[tokio::test]
async fn test_subgraph_by_category() {
    let server = create_test_server();

    let response = server
        .get("/subgraph")
        .add_query_param("category", "Electronics")
        .await;

    response.assert_status_ok();
    let body: Subgraph = response.json();
    assert_eq!(body.nodes.len(), 3);
    assert_eq!(body.edges.len(), 3);
    let highlighted: Vec<_> = body
        .nodes
        .iter()
        .filter(|n| n.highlighted)
        .map(|n| n.product_id.as_str())
        .collect();
    assert_eq!(highlighted, vec!["B"]);
}

#[tokio::test]
async fn test_subgraph_caps() {
    let server = create_test_server();

    let response = server
        .get("/subgraph")
        .add_query_param("max_nodes", 2)
        .add_query_param("max_edges", 5)
        .await;
    response.assert_status_ok();
    let body: Subgraph = response.json();
    assert_eq!(body.nodes.len(), 2);
    assert_eq!(body.edges.len(), 1);

    server
        .get("/subgraph")
        .add_query_param("max_nodes", 100_000)
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_path_subgraph() {
    let server = create_test_server();

    let response = server
        .get("/subgraph/path")
        .add_query_param("from", "A")
        .add_query_param("to", "C")
        .await;

    response.assert_status_ok();
    let body: Subgraph = response.json();
    assert_eq!(body.nodes.len(), 2);
    assert_eq!(body.edges.len(), 1);

    server
        .get("/subgraph/path")
        .add_query_param("from", "A")
        .add_query_param("to", "D")
        .await
        .assert_status_not_found();
}

// =============================================================================
// CORS & ERROR HANDLING TESTS
// =============================================================================

#[tokio::test]
async fn test_cors_allows_localhost() {
    let server = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            header::ORIGIN,
            HeaderValue::from_static("http://localhost:3000"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static("http://localhost:3000"))
    );
}

#[tokio::test]
async fn test_404_on_unknown_endpoint() {
    let server = create_test_server();

    server.get("/unknown").await.assert_status_not_found();
}

#[tokio::test]
async fn test_method_not_allowed() {
    let server = create_test_server();

    let response = server.post("/summary").await;
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_router_serves_concurrent_requests() {
    let router = create_router(AppState::new(sample_graph()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let router = router.clone();
        handles.push(tokio::spawn(async move {
            let request = Request::builder()
                .uri("/products/A/recommendations")
                .body(Body::empty())
                .unwrap();
            router.oneshot(request).await.unwrap().status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }
}
