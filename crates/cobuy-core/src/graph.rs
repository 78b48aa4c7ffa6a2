//! # Graph Engine
//!
//! The immutable co-purchase graph.
//!
//! Nodes live in a table indexed by `NodeId` (insertion order). Edges are
//! undirected and stored in both endpoints' adjacency maps. All adjacency
//! uses `BTreeMap` so neighbor enumeration is deterministic.
//!
//! Mutation is crate-private: only the builder inserts nodes and edges.
//! Once a `CoGraph` leaves the builder it is read-only and can be shared
//! across threads behind an `Arc` without locking.

use crate::{EdgeWeight, NodeId, Product};
use std::collections::BTreeMap;

/// The co-purchase graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoGraph {
    /// Node table: NodeId.index() -> attributes
    products: Vec<Product>,

    /// Reverse lookup: product_id -> NodeId
    index: BTreeMap<String, NodeId>,

    /// Adjacency: one map per node, neighbor -> weight (stored both ways)
    adjacency: Vec<BTreeMap<NodeId, EdgeWeight>>,

    /// Number of undirected edges
    edge_count: usize,
}

impl CoGraph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // BUILD-TIME MUTATION
    // =========================================================================

    /// Insert a product node, returning its id.
    ///
    /// A product id seen before keeps its NodeId; its attributes are
    /// replaced by the newer record.
    pub(crate) fn insert_product(&mut self, product: Product) -> NodeId {
        if let Some(&existing) = self.index.get(&product.product_id) {
            self.products[existing.index()] = product;
            return existing;
        }

        let node_id = NodeId(self.products.len() as u64);
        self.index.insert(product.product_id.clone(), node_id);
        self.products.push(product);
        self.adjacency.push(BTreeMap::new());
        node_id
    }

    /// Add `count` to the weight of the undirected edge `{a, b}`, creating
    /// it if absent.
    ///
    /// Self loops, dangling endpoints and zero counts are ignored.
    pub(crate) fn add_weight(&mut self, a: NodeId, b: NodeId, count: u64) {
        if a == b || count == 0 || !self.contains_node(a) || !self.contains_node(b) {
            return;
        }

        let forward = self.adjacency[a.index()].entry(b).or_default();
        if forward.value() == 0 {
            self.edge_count += 1;
        }
        *forward = forward.saturating_add(count);
        let weight = *forward;
        self.adjacency[b.index()].insert(a, weight);
    }

    // =========================================================================
    // READ-ONLY ACCESS
    // =========================================================================

    /// Number of product nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.products.len()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Check whether a NodeId belongs to this graph.
    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        id.index() < self.products.len()
    }

    /// Check whether a product id is a node.
    #[must_use]
    pub fn contains(&self, product_id: &str) -> bool {
        self.index.contains_key(product_id)
    }

    /// Resolve a product id to its NodeId.
    #[must_use]
    pub fn node_id(&self, product_id: &str) -> Option<NodeId> {
        self.index.get(product_id).copied()
    }

    /// Attributes of a node.
    #[must_use]
    pub fn product(&self, id: NodeId) -> Option<&Product> {
        self.products.get(id.index())
    }

    /// Attributes of a node by product id.
    #[must_use]
    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.node_id(product_id).and_then(|id| self.product(id))
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Product)> + '_ {
        self.products
            .iter()
            .enumerate()
            .map(|(i, product)| (NodeId(i as u64), product))
    }

    /// Neighbors of a node in ascending NodeId order.
    pub fn neighbors_of(&self, id: NodeId) -> impl Iterator<Item = (NodeId, EdgeWeight)> + '_ {
        self.adjacency
            .get(id.index())
            .into_iter()
            .flat_map(|targets| targets.iter().map(|(k, v)| (*k, *v)))
    }

    /// Number of incident edges (not the sum of their weights).
    #[must_use]
    pub fn degree(&self, id: NodeId) -> usize {
        self.adjacency.get(id.index()).map_or(0, BTreeMap::len)
    }

    /// Weight of the edge between two nodes.
    #[must_use]
    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<EdgeWeight> {
        self.adjacency.get(a.index())?.get(&b).copied()
    }

    /// Weight of the edge between two products.
    #[must_use]
    pub fn weight_between(&self, a: &str, b: &str) -> Option<EdgeWeight> {
        self.edge_weight(self.node_id(a)?, self.node_id(b)?)
    }

    /// Every undirected edge exactly once, as `(low, high, weight)` with
    /// `low < high`, ordered by `low` then `high`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, EdgeWeight)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(i, targets)| {
            let from = NodeId(i as u64);
            targets
                .range(NodeId(from.0.saturating_add(1))..)
                .map(move |(to, weight)| (from, *to, *weight))
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
