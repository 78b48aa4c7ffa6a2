//! # Subgraph Extraction
//!
//! Bounded slices of the graph for a visualization front-end. Only data is
//! produced here; layout and rendering belong to the caller.

use crate::graph::CoGraph;
use crate::{EdgeWeight, NodeId, Price};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A node in an extracted subgraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgraphNode {
    pub product_id: String,
    pub name: String,
    pub price: Option<Price>,
    pub degree: usize,
    /// Set on the graph's most-connected product.
    pub highlighted: bool,
}

/// An undirected edge in an extracted subgraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgraphEdge {
    pub from: String,
    pub to: String,
    pub weight: EdgeWeight,
}

/// A bounded slice of the co-purchase graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subgraph {
    pub nodes: Vec<SubgraphNode>,
    pub edges: Vec<SubgraphEdge>,
}

impl CoGraph {
    /// The first `max_nodes` products (insertion order) whose main category
    /// equals `category` (every product if `None`), and up to `max_edges`
    /// edges between them.
    #[must_use]
    pub fn subgraph(&self, category: Option<&str>, max_nodes: usize, max_edges: usize) -> Subgraph {
        let focus = self.most_connected().and_then(|m| self.node_id(&m.product_id));

        let selected: Vec<NodeId> = self
            .nodes()
            .filter(|(_, p)| category.is_none_or(|c| p.main_category() == Some(c)))
            .map(|(id, _)| id)
            .take(max_nodes)
            .collect();
        let members: BTreeSet<NodeId> = selected.iter().copied().collect();

        let edges = self
            .edges()
            .filter(|(a, b, _)| members.contains(a) && members.contains(b))
            .take(max_edges)
            .filter_map(|(a, b, weight)| self.subgraph_edge(a, b, weight))
            .collect::<Vec<_>>();

        tracing::debug!(
            nodes = selected.len(),
            edges = edges.len(),
            category = category.unwrap_or("*"),
            "Extracted subgraph"
        );

        Subgraph {
            nodes: selected
                .into_iter()
                .filter_map(|id| self.subgraph_node(id, focus == Some(id)))
                .collect(),
            edges,
        }
    }

    /// The shortest path between two products as a subgraph, or `None` if
    /// there is no path or it has more than `max_len` nodes.
    #[must_use]
    pub fn path_subgraph(&self, from: &str, to: &str, max_len: usize) -> Option<Subgraph> {
        let path = self.bfs_path(self.node_id(from)?, self.node_id(to)?)?;
        if path.len() > max_len {
            return None;
        }

        let edges = path
            .windows(2)
            .filter_map(|pair| {
                let weight = self.edge_weight(pair[0], pair[1])?;
                self.subgraph_edge(pair[0], pair[1], weight)
            })
            .collect();
        let nodes = path
            .into_iter()
            .filter_map(|id| self.subgraph_node(id, true))
            .collect();

        Some(Subgraph { nodes, edges })
    }

    fn subgraph_node(&self, id: NodeId, highlighted: bool) -> Option<SubgraphNode> {
        self.product(id).map(|p| SubgraphNode {
            product_id: p.product_id.clone(),
            name: p.name.clone(),
            price: p.price.clone(),
            degree: self.degree(id),
            highlighted,
        })
    }

    fn subgraph_edge(&self, a: NodeId, b: NodeId, weight: EdgeWeight) -> Option<SubgraphEdge> {
        Some(SubgraphEdge {
            from: self.product(a)?.product_id.clone(),
            to: self.product(b)?.product_id.clone(),
            weight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::{ProductRecord, Review};

    fn catalog() -> CoGraph {
        let products = vec![
            ProductRecord::new("A", "a").with_category("Electronics"),
            ProductRecord::new("B", "b").with_category("Electronics"),
            ProductRecord::new("C", "c").with_category("Books"),
            ProductRecord::new("D", "d").with_category("Electronics"),
        ];
        let reviews = vec![
            Review::new("u1", "A", 5.0),
            Review::new("u1", "B", 5.0),
            Review::new("u2", "B", 5.0),
            Review::new("u2", "C", 5.0),
            Review::new("u3", "C", 5.0),
            Review::new("u3", "D", 5.0),
        ];
        build(&products, &reviews)
    }

    #[test]
    fn subgraph_filters_by_category() {
        let sub = catalog().subgraph(Some("Electronics"), 100, 300);
        let ids: Vec<_> = sub.nodes.iter().map(|n| n.product_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "D"]);
        // Only A-B has both endpoints in the selection.
        assert_eq!(sub.edges.len(), 1);
        assert_eq!(sub.edges[0].from, "A");
        assert_eq!(sub.edges[0].to, "B");
    }

    #[test]
    fn subgraph_respects_budgets() {
        let sub = catalog().subgraph(None, 3, 1);
        assert_eq!(sub.nodes.len(), 3);
        assert_eq!(sub.edges.len(), 1);
    }

    #[test]
    fn subgraph_highlights_most_connected() {
        let sub = catalog().subgraph(None, 100, 300);
        let highlighted: Vec<_> = sub
            .nodes
            .iter()
            .filter(|n| n.highlighted)
            .map(|n| n.product_id.as_str())
            .collect();
        assert_eq!(highlighted, vec!["B"]);
    }

    #[test]
    fn path_subgraph_includes_path_edges() {
        let sub = catalog().path_subgraph("A", "D", 15).expect("path");
        assert_eq!(sub.nodes.len(), 4);
        assert_eq!(sub.edges.len(), 3);
        assert!(sub.nodes.iter().all(|n| n.highlighted));
    }

    #[test]
    fn path_subgraph_rejects_long_paths() {
        assert!(catalog().path_subgraph("A", "D", 3).is_none());
        assert!(catalog().path_subgraph("A", "missing", 15).is_none());
    }
}
