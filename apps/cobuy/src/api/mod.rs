//! # cobuy HTTP API Module
//!
//! This module implements the JSON HTTP API using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /summary` - Whole-graph metrics
//! - `GET /categories` - Distinct main categories
//! - `GET /products/{id}` - Product attributes
//! - `GET /products/{id}/recommendations?top_n=` - Ranked co-purchases
//! - `GET /products/{id}/neighbors` - All co-purchase partners
//! - `GET /path?from=&to=` - Shortest hop-count path
//! - `GET /popular` - Most connected product
//! - `GET /subgraph?category=&max_nodes=&max_edges=` - Bounded slice
//! - `GET /subgraph/path?from=&to=` - Shortest path as a slice
//!
//! ## Configuration (Environment Variables)
//!
//! - `COBUY_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all.
//!   Overrides `server.cors_origins` from the config file.

mod handlers;
mod types;

// Re-export handlers and types for integration tests (via `cobuy::api::*`)
pub use handlers::{
    categories_handler, health_handler, neighbors_handler, path_handler, path_subgraph_handler,
    popular_handler, recommend_handler, stats_handler, subgraph_handler, summary_handler,
};
pub use types::{
    CategoriesResponse, ErrorResponse, HealthResponse, NeighborsResponse, PathParams,
    PathResponse, PathStep, PopularResponse, ProductResponse, RecommendParams,
    RecommendResponse, SubgraphParams,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use cobuy_core::{CoGraph, CobuyError};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the immutable graph and CORS settings.
///
/// The graph is never written after startup, so handlers read it through
/// the `Arc` without a lock.
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<CoGraph>,
    pub cors_origins: Option<Vec<String>>,
}

impl AppState {
    /// Create new app state around a built graph.
    #[must_use]
    pub fn new(graph: CoGraph) -> Self {
        Self {
            graph: Arc::new(graph),
            cors_origins: None,
        }
    }

    /// Allow the given CORS origins.
    #[must_use]
    pub fn with_cors_origins(mut self, origins: Option<Vec<String>>) -> Self {
        self.cors_origins = origins;
        self
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer.
///
/// `COBUY_CORS_ORIGINS` wins over configured origins:
/// - If "*": allows all origins
/// - If neither is set: localhost only
/// - Otherwise: the listed origins
fn build_cors_layer(configured: Option<&[String]>) -> CorsLayer {
    let from_env = std::env::var("COBUY_CORS_ORIGINS").ok().map(|value| {
        value
            .split(',')
            .map(|s| s.trim().to_string())
            .collect::<Vec<_>>()
    });
    let origins = from_env.as_deref().or(configured);

    match origins {
        Some([only]) if only == "*" => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
            CorsLayer::permissive()
        }
        Some(list) => {
            let allowed: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(hv) => {
                        tracing::info!("CORS: Allowing origin: {}", origin);
                        Some(hv)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                        None
                    }
                })
                .collect();

            if allowed.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed)
                    .allow_methods([Method::GET, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5000",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5000",
    ]
    .iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(state.cors_origins.as_deref());

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/summary", get(handlers::summary_handler))
        .route("/categories", get(handlers::categories_handler))
        .route("/products/{id}", get(handlers::stats_handler))
        .route(
            "/products/{id}/recommendations",
            get(handlers::recommend_handler),
        )
        .route("/products/{id}/neighbors", get(handlers::neighbors_handler))
        .route("/path", get(handlers::path_handler))
        .route("/popular", get(handlers::popular_handler))
        .route("/subgraph", get(handlers::subgraph_handler))
        .route("/subgraph/path", get(handlers::path_subgraph_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, state: AppState) -> Result<(), CobuyError> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CobuyError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("cobuy HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CobuyError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
