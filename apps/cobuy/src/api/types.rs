//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use cobuy_core::{LinkedProduct, MostConnected, Product};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Body returned with every 4xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}

// =============================================================================
// QUERY PARAMETERS
// =============================================================================

/// `?top_n=` for recommendations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendParams {
    pub top_n: Option<usize>,
}

/// `?from=&to=` for path queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathParams {
    pub from: String,
    pub to: String,
}

/// `?category=&max_nodes=&max_edges=` for subgraph extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubgraphParams {
    pub category: Option<String>,
    pub max_nodes: Option<usize>,
    pub max_edges: Option<usize>,
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Product attribute response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

/// Ranked recommendations for one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub success: bool,
    pub product_id: String,
    pub recommendations: Vec<LinkedProduct>,
}

/// Neighbors of one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborsResponse {
    pub success: bool,
    pub product_id: String,
    pub neighbors: Vec<LinkedProduct>,
}

/// One step along a shortest path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathStep {
    pub product_id: String,
    pub name: String,
}

/// Shortest path between two products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathResponse {
    pub success: bool,
    pub hops: usize,
    pub path: Vec<PathStep>,
}

/// Most connected product, with its attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularResponse {
    pub success: bool,
    #[serde(flatten)]
    pub most_connected: MostConnected,
    pub product: Product,
}

/// Distinct main categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}
