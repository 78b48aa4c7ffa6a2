//! # Graph Builder
//!
//! Turns cleaned product and review records into a `CoGraph`.
//!
//! 1. One node per product record, in record order.
//! 2. Reviews grouped by user into the SET of distinct products reviewed.
//! 3. Every unordered pair of distinct known products in a user's set adds 1
//!    to that pair's edge weight.
//!
//! Step 3 costs `C(k, 2)` per user with `k` distinct products, so broad
//! purchase histories dominate build time. `BuildOptions` carries an
//! optional per-user fan-out cap; without one every pair is counted.

use crate::graph::CoGraph;
use crate::{NodeId, Product, ProductRecord, Review};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Accumulated co-occurrence counts keyed by `(low, high)` node pair.
type PairCounts = BTreeMap<(NodeId, NodeId), u64>;

// =============================================================================
// OPTIONS & REPORT
// =============================================================================

/// What happens to a user whose distinct product set exceeds the cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanOutPolicy {
    /// Keep the first N products in ascending product-id order.
    #[default]
    Truncate,
    /// Leave the user out of pair generation entirely.
    Skip,
}

/// Build-time options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildOptions {
    /// Maximum distinct known products per user; `None` disables the cap.
    pub max_products_per_user: Option<usize>,
    pub fan_out_policy: FanOutPolicy,
}

/// Counters describing one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub nodes: usize,
    pub edges: usize,
    /// Distinct users seen in the review set.
    pub users: usize,
    /// Users truncated or skipped by the fan-out cap.
    pub capped_users: usize,
    /// Review rows naming a product that is not a node.
    pub unknown_product_reviews: usize,
    /// Pair increments applied (sum of all edge weights).
    pub pair_increments: u64,
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builds co-purchase graphs. Stateless apart from its options.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    options: BuildOptions,
}

impl GraphBuilder {
    /// Create a builder with the given options.
    #[must_use]
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// The options this builder applies.
    #[must_use]
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Build a graph, discarding the report.
    #[must_use]
    pub fn build(&self, products: &[ProductRecord], reviews: &[Review]) -> CoGraph {
        self.build_with_report(products, reviews).0
    }

    /// Build a graph and report what happened.
    ///
    /// Deterministic: identical inputs always produce identical graphs.
    #[must_use]
    pub fn build_with_report(
        &self,
        products: &[ProductRecord],
        reviews: &[Review],
    ) -> (CoGraph, BuildReport) {
        let mut graph = CoGraph::new();
        let mut report = BuildReport::default();

        for record in products {
            graph.insert_product(Product::from(record.clone()));
        }

        let baskets = self.user_baskets(&graph, reviews, &mut report);
        let counts = accumulate(&baskets);

        for (&(a, b), &count) in &counts {
            graph.add_weight(a, b, count);
            report.pair_increments = report.pair_increments.saturating_add(count);
        }

        report.nodes = graph.node_count();
        report.edges = graph.edge_count();

        if report.capped_users > 0 {
            tracing::warn!(
                capped_users = report.capped_users,
                cap = ?self.options.max_products_per_user,
                policy = ?self.options.fan_out_policy,
                "Users exceeded the per-user fan-out cap"
            );
        }
        tracing::info!(
            nodes = report.nodes,
            edges = report.edges,
            users = report.users,
            "Constructed co-purchase graph"
        );

        (graph, report)
    }

    /// Group reviews into one sorted NodeId basket per user, after the
    /// fan-out cap is applied.
    fn user_baskets(
        &self,
        graph: &CoGraph,
        reviews: &[Review],
        report: &mut BuildReport,
    ) -> Vec<Vec<NodeId>> {
        let mut by_user: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for review in reviews {
            let products = by_user.entry(review.user_id.as_str()).or_default();
            if graph.contains(&review.product_id) {
                products.insert(review.product_id.as_str());
            } else {
                report.unknown_product_reviews += 1;
            }
        }
        report.users = by_user.len();

        let mut baskets = Vec::with_capacity(by_user.len());
        for products in by_user.values() {
            let limit = match self.options.max_products_per_user {
                Some(cap) if products.len() > cap => {
                    report.capped_users += 1;
                    match self.options.fan_out_policy {
                        FanOutPolicy::Truncate => cap,
                        FanOutPolicy::Skip => continue,
                    }
                }
                _ => products.len(),
            };

            let mut basket: Vec<NodeId> = products
                .iter()
                .take(limit)
                .filter_map(|pid| graph.node_id(pid))
                .collect();
            if basket.len() < 2 {
                continue;
            }
            basket.sort_unstable();
            baskets.push(basket);
        }
        baskets
    }
}

/// Build with default options (no fan-out cap).
#[must_use]
pub fn build(products: &[ProductRecord], reviews: &[Review]) -> CoGraph {
    GraphBuilder::default().build(products, reviews)
}

// =============================================================================
// PAIR ACCUMULATION
// =============================================================================

fn count_pairs<'a>(baskets: impl IntoIterator<Item = &'a Vec<NodeId>>) -> PairCounts {
    let mut counts = PairCounts::new();
    for basket in baskets {
        for (i, &low) in basket.iter().enumerate() {
            for &high in &basket[i + 1..] {
                let entry = counts.entry((low, high)).or_insert(0);
                *entry = entry.saturating_add(1);
            }
        }
    }
    counts
}

#[cfg(not(feature = "parallel"))]
fn accumulate(baskets: &[Vec<NodeId>]) -> PairCounts {
    count_pairs(baskets)
}

/// Chunks of users are counted in parallel; the partial counts are merged
/// on the calling thread.
#[cfg(feature = "parallel")]
fn accumulate(baskets: &[Vec<NodeId>]) -> PairCounts {
    use rayon::prelude::*;

    const CHUNK: usize = 4096;

    let partials: Vec<PairCounts> = baskets
        .par_chunks(CHUNK)
        .map(|chunk| count_pairs(chunk))
        .collect();

    let mut merged = PairCounts::new();
    for partial in partials {
        for (pair, count) in partial {
            let entry = merged.entry(pair).or_insert(0);
            *entry = entry.saturating_add(count);
        }
    }
    merged
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EdgeWeight;

    fn products(ids: &[&str]) -> Vec<ProductRecord> {
        ids.iter().map(|id| ProductRecord::new(*id, *id)).collect()
    }

    fn reviews(pairs: &[(&str, &str)]) -> Vec<Review> {
        pairs
            .iter()
            .map(|(user, pid)| Review::new(*user, *pid, 5.0))
            .collect()
    }

    #[test]
    fn weight_counts_distinct_users() {
        let graph = build(
            &products(&["A", "B"]),
            &reviews(&[("u1", "A"), ("u1", "B"), ("u1", "A"), ("u2", "A"), ("u2", "B")]),
        );

        assert_eq!(graph.weight_between("A", "B"), Some(EdgeWeight::new(2)));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn unknown_products_are_skipped() {
        let (graph, report) = GraphBuilder::default().build_with_report(
            &products(&["A", "B"]),
            &reviews(&[("u1", "A"), ("u1", "Z"), ("u1", "B")]),
        );

        assert!(!graph.contains("Z"));
        assert_eq!(graph.weight_between("A", "B"), Some(EdgeWeight::new(1)));
        assert_eq!(report.unknown_product_reviews, 1);
    }

    #[test]
    fn no_reviews_yields_isolated_nodes() {
        let graph = build(&products(&["A", "B", "C"]), &[]);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn nodes_follow_record_order() {
        let graph = build(&products(&["C", "A", "B"]), &[]);
        let order: Vec<_> = graph.nodes().map(|(_, p)| p.product_id.clone()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn fan_out_truncate_keeps_lowest_ids() {
        let builder = GraphBuilder::new(BuildOptions {
            max_products_per_user: Some(2),
            fan_out_policy: FanOutPolicy::Truncate,
        });
        let (graph, report) = builder.build_with_report(
            &products(&["A", "B", "C"]),
            &reviews(&[("u1", "C"), ("u1", "B"), ("u1", "A")]),
        );

        assert_eq!(graph.edge_count(), 1);
        assert!(graph.weight_between("A", "B").is_some());
        assert_eq!(report.capped_users, 1);
    }

    #[test]
    fn fan_out_skip_drops_user() {
        let builder = GraphBuilder::new(BuildOptions {
            max_products_per_user: Some(2),
            fan_out_policy: FanOutPolicy::Skip,
        });
        let (graph, report) = builder.build_with_report(
            &products(&["A", "B", "C"]),
            &reviews(&[
                ("u1", "A"),
                ("u1", "B"),
                ("u1", "C"),
                ("u2", "A"),
                ("u2", "C"),
            ]),
        );

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.weight_between("A", "C"), Some(EdgeWeight::new(1)));
        assert_eq!(report.capped_users, 1);
        assert_eq!(report.users, 2);
    }

    #[test]
    fn report_sums_weights() {
        let (graph, report) = GraphBuilder::default().build_with_report(
            &products(&["A", "B", "C"]),
            &reviews(&[("u1", "A"), ("u1", "B"), ("u1", "C"), ("u2", "A"), ("u2", "B")]),
        );

        let total: u64 = graph.edges().map(|(_, _, w)| w.value()).sum();
        assert_eq!(report.pair_increments, total);
        assert_eq!(report.pair_increments, 4);
        assert_eq!(report.edges, 3);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_merge_matches_sequential_count() {
        // More users than one chunk, so several partial counts get merged.
        let baskets: Vec<Vec<NodeId>> = (0..10_000u64)
            .map(|u| {
                let mut basket = vec![NodeId(u % 10), NodeId((u + 1) % 10), NodeId((u + 3) % 10)];
                basket.sort();
                basket
            })
            .collect();

        let merged = accumulate(&baskets);
        assert_eq!(merged, count_pairs(&baskets));
        assert_eq!(merged.values().sum::<u64>(), 30_000);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_build_weights_equal_distinct_buyers() {
        let ids: Vec<String> = (0..10).map(|i| format!("P{i}")).collect();
        let catalog: Vec<ProductRecord> =
            ids.iter().map(|id| ProductRecord::new(id.as_str(), id.as_str())).collect();
        let mut log = Vec::new();
        let mut buyers: BTreeMap<(usize, usize), BTreeSet<u64>> = BTreeMap::new();
        for u in 0..10_000u64 {
            let mut picked = vec![(u % 10) as usize, ((u + 1) % 10) as usize, ((u + 3) % 10) as usize];
            picked.sort_unstable();
            for &p in &picked {
                log.push(Review::new(format!("u{u}"), ids[p].as_str(), 4.0));
            }
            for (i, &a) in picked.iter().enumerate() {
                for &b in &picked[i + 1..] {
                    buyers.entry((a, b)).or_default().insert(u);
                }
            }
        }

        let (graph, report) = GraphBuilder::default().build_with_report(&catalog, &log);

        assert_eq!(report.users, 10_000);
        assert_eq!(report.pair_increments, 30_000);
        assert_eq!(graph.edge_count(), buyers.len());
        for ((a, b), users) in &buyers {
            assert_eq!(
                graph.weight_between(&ids[*a], &ids[*b]),
                Some(EdgeWeight::new(users.len() as u64))
            );
        }
    }

    #[test]
    fn build_options_deserialize_with_defaults() {
        let options: BuildOptions =
            serde_json::from_str(r#"{"max_products_per_user": 50}"#).expect("parse");
        assert_eq!(options.max_products_per_user, Some(50));
        assert_eq!(options.fan_out_policy, FanOutPolicy::Truncate);

        let options: BuildOptions =
            serde_json::from_str(r#"{"fan_out_policy": "skip"}"#).expect("parse");
        assert_eq!(options.fan_out_policy, FanOutPolicy::Skip);
        assert_eq!(options.max_products_per_user, None);
    }
}
