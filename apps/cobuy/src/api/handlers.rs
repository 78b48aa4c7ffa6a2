//! # API Endpoint Handlers
//!
//! Every handler reads the shared graph; none mutates it. Unknown products
//! and missing paths answer 404, out-of-range parameters 400.

use super::{
    AppState,
    types::{
        CategoriesResponse, ErrorResponse, HealthResponse, NeighborsResponse, PathParams,
        PathResponse, PathStep, PopularResponse, ProductResponse, RecommendParams,
        RecommendResponse, SubgraphParams,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cobuy_core::primitives::{
    DEFAULT_SUBGRAPH_EDGES, DEFAULT_SUBGRAPH_NODES, DEFAULT_TOP_N, MAX_PATH_SUBGRAPH_LEN,
    MAX_SUBGRAPH_EDGES, MAX_SUBGRAPH_NODES, MAX_TOP_N,
};

fn not_found(msg: String) -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new(msg))).into_response()
}

fn bad_request(msg: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg))).into_response()
}

// =============================================================================
// HEALTH & SUMMARY
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// Whole-graph metrics.
pub async fn summary_handler(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.graph.summary()))
}

/// Sorted main categories.
pub async fn categories_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(CategoriesResponse {
        categories: state.graph.categories(),
    })
}

// =============================================================================
// PRODUCT HANDLERS
// =============================================================================

/// Product attributes.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Response {
    match state.graph.stats(&product_id) {
        Some(product) => Json(ProductResponse {
            success: true,
            product: product.clone(),
        })
        .into_response(),
        None => not_found(format!("Product ID {} not found.", product_id)),
    }
}

/// Ranked co-purchase recommendations. A known product without partners
/// answers an empty list.
pub async fn recommend_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(params): Query<RecommendParams>,
) -> Response {
    let top_n = params.top_n.unwrap_or(DEFAULT_TOP_N);
    if top_n > MAX_TOP_N {
        return bad_request(format!("top_n must be at most {}", MAX_TOP_N));
    }

    if !state.graph.contains(&product_id) {
        return not_found(format!("Product ID {} not found.", product_id));
    }

    let recommendations = state.graph.recommend_similar(&product_id, top_n);

    Json(RecommendResponse {
        success: true,
        product_id,
        recommendations,
    })
    .into_response()
}

/// Every co-purchase partner of a product.
pub async fn neighbors_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Response {
    match state.graph.neighbors(&product_id) {
        Some(neighbors) => Json(NeighborsResponse {
            success: true,
            product_id,
            neighbors,
        })
        .into_response(),
        None => not_found("Product not found in graph.".to_string()),
    }
}

// =============================================================================
// GRAPH HANDLERS
// =============================================================================

/// Shortest hop-count path.
pub async fn path_handler(
    State(state): State<AppState>,
    Query(params): Query<PathParams>,
) -> Response {
    let Some(path) = state.graph.shortest_path(&params.from, &params.to) else {
        return not_found(format!(
            "No path found between {} and {}.",
            params.from, params.to
        ));
    };

    let steps: Vec<PathStep> = path
        .into_iter()
        .map(|product_id| PathStep {
            name: state
                .graph
                .get(&product_id)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            product_id,
        })
        .collect();

    Json(PathResponse {
        success: true,
        hops: steps.len().saturating_sub(1),
        path: steps,
    })
    .into_response()
}

/// Most connected product.
pub async fn popular_handler(State(state): State<AppState>) -> Response {
    let popular = state
        .graph
        .most_connected()
        .and_then(|m| state.graph.get(&m.product_id).cloned().map(|p| (m, p)));

    match popular {
        Some((most_connected, product)) => Json(PopularResponse {
            success: true,
            most_connected,
            product,
        })
        .into_response(),
        None => not_found("No connected products found.".to_string()),
    }
}

/// Bounded subgraph, optionally limited to one main category.
pub async fn subgraph_handler(
    State(state): State<AppState>,
    Query(params): Query<SubgraphParams>,
) -> Response {
    let max_nodes = params.max_nodes.unwrap_or(DEFAULT_SUBGRAPH_NODES);
    let max_edges = params.max_edges.unwrap_or(DEFAULT_SUBGRAPH_EDGES);
    if max_nodes > MAX_SUBGRAPH_NODES || max_edges > MAX_SUBGRAPH_EDGES {
        return bad_request(format!(
            "max_nodes must be at most {} and max_edges at most {}",
            MAX_SUBGRAPH_NODES, MAX_SUBGRAPH_EDGES
        ));
    }

    let subgraph = state
        .graph
        .subgraph(params.category.as_deref(), max_nodes, max_edges);
    Json(subgraph).into_response()
}

/// Shortest path as a subgraph.
pub async fn path_subgraph_handler(
    State(state): State<AppState>,
    Query(params): Query<PathParams>,
) -> Response {
    match state
        .graph
        .path_subgraph(&params.from, &params.to, MAX_PATH_SUBGRAPH_LEN)
    {
        Some(subgraph) => Json(subgraph).into_response(),
        None => not_found(format!(
            "No path found between {} and {}, or path too long to render.",
            params.from, params.to
        )),
    }
}
