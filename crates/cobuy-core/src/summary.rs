//! # Graph Summary
//!
//! Catalog-level metrics over a built graph: size, connectivity and the
//! category distribution.

use crate::graph::CoGraph;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Whole-graph metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    /// Sum of all edge weights.
    pub total_weight: u64,
    pub max_degree: usize,
    /// Nodes with no co-purchase partner.
    pub isolated_nodes: usize,
}

/// Number of products sharing one full category path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

impl CoGraph {
    /// Compute whole-graph metrics.
    #[must_use]
    pub fn summary(&self) -> GraphSummary {
        let mut summary = GraphSummary {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            ..GraphSummary::default()
        };

        for (id, _) in self.nodes() {
            let degree = self.degree(id);
            summary.max_degree = summary.max_degree.max(degree);
            if degree == 0 {
                summary.isolated_nodes += 1;
            }
        }
        summary.total_weight = self
            .edges()
            .fold(0u64, |acc, (_, _, w)| acc.saturating_add(w.value()));

        summary
    }

    /// Distinct non-empty main categories, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.nodes()
            .filter_map(|(_, p)| p.main_category())
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Products per full category path, most common first, ties by path.
    /// Uncategorised products are not counted.
    #[must_use]
    pub fn category_counts(&self) -> Vec<CategoryCount> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for (_, product) in self.nodes() {
            if product.category.is_empty() {
                continue;
            }
            *counts.entry(product.category_path()).or_default() += 1;
        }

        let mut ranked: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();
        // Stable sort keeps ascending path order among equal counts.
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }
}
