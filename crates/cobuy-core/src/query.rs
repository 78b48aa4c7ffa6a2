//! # Query Module
//!
//! Read-only queries over a built `CoGraph`.
//!
//! Absent products, missing paths and empty graphs are values (`None` or an
//! empty list), never errors. Every query is independent and side-effect free.
//!
//! ## Ordering
//!
//! - Recommendations: weight descending, then product id ascending.
//! - Neighbors: product id ascending.
//! - Shortest path: BFS visiting neighbors in ascending node order.
//! - Most connected: maximum degree, then maximum total incident weight,
//!   then first in insertion order.

use crate::graph::CoGraph;
use crate::primitives::{DEFAULT_TOP_N, MAX_TOP_N};
use crate::{EdgeWeight, NodeId, Product};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::VecDeque;

// =============================================================================
// RESULT TYPES
// =============================================================================

/// A product adjacent to the queried one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedProduct {
    pub product_id: String,
    pub name: String,
    /// Number of users who bought both products.
    pub weight: EdgeWeight,
}

/// The node with the most distinct co-purchase partners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MostConnected {
    pub product_id: String,
    pub degree: usize,
}

// =============================================================================
// QUERY OPERATIONS
// =============================================================================

impl CoGraph {
    /// Full attribute set of a product.
    #[must_use]
    pub fn stats(&self, product_id: &str) -> Option<&Product> {
        self.get(product_id)
    }

    /// The `top_n` neighbors with the heaviest shared-user weight.
    ///
    /// Returns an empty list for an unknown product.
    #[must_use]
    pub fn recommend_similar(&self, product_id: &str, top_n: usize) -> Vec<LinkedProduct> {
        let Some(id) = self.node_id(product_id) else {
            return Vec::new();
        };

        let mut ranked: Vec<(NodeId, EdgeWeight, &str)> = self
            .neighbors_of(id)
            .filter_map(|(n, w)| self.product(n).map(|p| (n, w, p.product_id.as_str())))
            .collect();
        ranked.sort_by(|a, b| (Reverse(a.1), a.2).cmp(&(Reverse(b.1), b.2)));

        ranked
            .into_iter()
            .take(top_n)
            .filter_map(|(n, weight, _)| self.linked(n, weight))
            .collect()
    }

    /// Every neighbor of a product, by product id.
    ///
    /// Returns `None` for an unknown product, `Some(vec![])` for an isolated one.
    #[must_use]
    pub fn neighbors(&self, product_id: &str) -> Option<Vec<LinkedProduct>> {
        let id = self.node_id(product_id)?;
        let mut neighbors: Vec<LinkedProduct> = self
            .neighbors_of(id)
            .filter_map(|(n, weight)| self.linked(n, weight))
            .collect();
        neighbors.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        Some(neighbors)
    }

    /// Minimum hop-count path between two products, endpoints included.
    ///
    /// Edge weights are ignored. Returns `None` if either product is unknown
    /// or they are disconnected; `from == to` yields a single-element path.
    #[must_use]
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let start = self.node_id(from)?;
        let end = self.node_id(to)?;
        let path = self.bfs_path(start, end)?;
        Some(
            path.into_iter()
                .filter_map(|n| self.product(n).map(|p| p.product_id.clone()))
                .collect(),
        )
    }

    /// Node-level BFS shared by path queries.
    pub(crate) fn bfs_path(&self, start: NodeId, end: NodeId) -> Option<Vec<NodeId>> {
        if !self.contains_node(start) || !self.contains_node(end) {
            return None;
        }
        if start == end {
            return Some(vec![start]);
        }

        let mut parent: Vec<Option<NodeId>> = vec![None; self.node_count()];
        let mut queue = VecDeque::new();
        parent[start.index()] = Some(start);
        queue.push_back(start);

        'search: while let Some(current) = queue.pop_front() {
            for (neighbor, _) in self.neighbors_of(current) {
                if parent[neighbor.index()].is_some() {
                    continue;
                }
                parent[neighbor.index()] = Some(current);
                if neighbor == end {
                    break 'search;
                }
                queue.push_back(neighbor);
            }
        }

        parent[end.index()]?;

        let mut path = vec![end];
        let mut current = end;
        while current != start {
            current = parent[current.index()]?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }

    /// The product with the highest degree and that degree.
    ///
    /// Degree ties go to the node with the larger total incident weight,
    /// then to the earlier node. Returns `None` only for a graph without
    /// nodes; when no node has any edge the first node is returned with
    /// degree 0.
    #[must_use]
    pub fn most_connected(&self) -> Option<MostConnected> {
        let mut best: Option<(NodeId, usize, u64)> = None;
        for (id, _) in self.nodes() {
            let degree = self.degree(id);
            let strength = self.strength(id);
            if best.is_none_or(|(_, d, s)| (degree, strength) > (d, s)) {
                best = Some((id, degree, strength));
            }
        }

        let (id, degree, _) = best?;
        self.product(id).map(|p| MostConnected {
            product_id: p.product_id.clone(),
            degree,
        })
    }

    /// Sum of incident edge weights.
    fn strength(&self, id: NodeId) -> u64 {
        self.neighbors_of(id)
            .fold(0u64, |acc, (_, w)| acc.saturating_add(w.value()))
    }

    fn linked(&self, id: NodeId, weight: EdgeWeight) -> Option<LinkedProduct> {
        self.product(id).map(|p| LinkedProduct {
            product_id: p.product_id.clone(),
            name: p.name.clone(),
            weight,
        })
    }
}

// =============================================================================
// QUERY DISPATCH
// =============================================================================

/// Query operations supported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    Stats { product_id: String },
    Recommend { product_id: String, top_n: usize },
    ShortestPath { from: String, to: String },
    MostConnected,
    Neighbors { product_id: String },
}

impl Query {
    /// Stats helper.
    #[must_use]
    pub fn stats(product_id: impl Into<String>) -> Self {
        Self::Stats {
            product_id: product_id.into(),
        }
    }

    /// Recommendation helper using the default `top_n`.
    #[must_use]
    pub fn recommend(product_id: impl Into<String>) -> Self {
        Self::Recommend {
            product_id: product_id.into(),
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Shortest path helper.
    #[must_use]
    pub fn shortest_path(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::ShortestPath {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Neighbors helper.
    #[must_use]
    pub fn neighbors(product_id: impl Into<String>) -> Self {
        Self::Neighbors {
            product_id: product_id.into(),
        }
    }
}

/// The answer to a `Query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "result", rename_all = "snake_case")]
pub enum QueryOutcome {
    Stats(Option<Product>),
    Recommendations(Vec<LinkedProduct>),
    Path(Option<Vec<String>>),
    MostConnected(Option<MostConnected>),
    Neighbors(Option<Vec<LinkedProduct>>),
}

impl QueryOutcome {
    /// Whether the query produced anything to show.
    #[must_use]
    pub fn is_found(&self) -> bool {
        match self {
            Self::Stats(p) => p.is_some(),
            Self::Recommendations(r) => !r.is_empty(),
            Self::Path(p) => p.is_some(),
            Self::MostConnected(m) => m.is_some(),
            Self::Neighbors(n) => n.is_some(),
        }
    }
}

impl CoGraph {
    /// Execute a query. `top_n` is clamped to `MAX_TOP_N`.
    #[must_use]
    pub fn execute(&self, query: &Query) -> QueryOutcome {
        match query {
            Query::Stats { product_id } => QueryOutcome::Stats(self.stats(product_id).cloned()),
            Query::Recommend { product_id, top_n } => QueryOutcome::Recommendations(
                self.recommend_similar(product_id, (*top_n).min(MAX_TOP_N)),
            ),
            Query::ShortestPath { from, to } => QueryOutcome::Path(self.shortest_path(from, to)),
            Query::MostConnected => QueryOutcome::MostConnected(self.most_connected()),
            Query::Neighbors { product_id } => QueryOutcome::Neighbors(self.neighbors(product_id)),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
