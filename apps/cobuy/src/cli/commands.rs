//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::config::AppConfig;
use cobuy_core::{
    CoGraph, CobuyError, Dataset, GraphBuilder, Query, QueryOutcome,
    primitives::{
        DEFAULT_SUBGRAPH_EDGES, DEFAULT_SUBGRAPH_NODES, MAX_SUBGRAPH_EDGES, MAX_SUBGRAPH_NODES,
        MAX_TOP_N,
    },
};
use serde::Serialize;

// =============================================================================
// GRAPH LOADING
// =============================================================================

/// Load both configured sources and build the graph.
///
/// # Errors
/// `CobuyError::SourceUnavailable` if either source cannot be opened.
pub fn load_graph(config: &AppConfig) -> Result<CoGraph, CobuyError> {
    tracing::info!(
        reviews = %config.data.reviews.display(),
        metadata = %config.data.metadata.display(),
        "Loading sources"
    );

    let dataset = Dataset::load(&config.data.reviews, &config.data.metadata, &config.ingest)?;
    if dataset.review_report.rejected() > 0 || dataset.metadata_report.rejected() > 0 {
        tracing::warn!(
            review_rejected = dataset.review_report.rejected(),
            metadata_rejected = dataset.metadata_report.rejected(),
            "Some source lines were dropped"
        );
    }

    let (graph, report) = dataset.build(&GraphBuilder::new(config.build));
    tracing::info!(
        nodes = report.nodes,
        edges = report.edges,
        users = report.users,
        capped_users = report.capped_users,
        "Graph ready"
    );
    Ok(graph)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CobuyError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CobuyError::IoError(format!("Serialize output: {}", e)))?;
    println!("{}", text);
    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server over an already built graph.
pub async fn cmd_serve(
    graph: CoGraph,
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), CobuyError> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    println!("cobuy Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Nodes:    {}", graph.node_count());
    println!("  Edges:    {}", graph.edge_count());
    println!();
    println!("Endpoints:");
    println!("  GET /health                          - Health check");
    println!("  GET /summary                         - Graph metrics");
    println!("  GET /categories                      - Main categories");
    println!("  GET /products/{{id}}                   - Product attributes");
    println!("  GET /products/{{id}}/recommendations   - Similar products");
    println!("  GET /products/{{id}}/neighbors         - Co-purchase partners");
    println!("  GET /path?from=&to=                  - Shortest path");
    println!("  GET /popular                         - Most connected product");
    println!("  GET /subgraph                        - Bounded graph slice");
    println!("  GET /subgraph/path?from=&to=         - Path as graph slice");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let state = api::AppState::new(graph).with_cors_origins(config.server.cors_origins.clone());
    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, state).await
}

// =============================================================================
// SUMMARY COMMANDS
// =============================================================================

/// Show whole-graph metrics.
pub fn cmd_summary(graph: &CoGraph, json_mode: bool) -> Result<(), CobuyError> {
    let summary = graph.summary();

    if json_mode {
        return print_json(&summary);
    }

    println!("cobuy Graph Summary");
    println!("===================");
    println!("Nodes:          {}", summary.node_count);
    println!("Edges:          {}", summary.edge_count);
    println!("Total Weight:   {}", summary.total_weight);
    println!("Max Degree:     {}", summary.max_degree);
    println!("Isolated Nodes: {}", summary.isolated_nodes);

    Ok(())
}

/// Show main categories with product counts.
pub fn cmd_categories(graph: &CoGraph, json_mode: bool) -> Result<(), CobuyError> {
    let counts = graph.category_counts();

    if json_mode {
        return print_json(&counts);
    }

    if counts.is_empty() {
        println!("No categories.");
        return Ok(());
    }
    for entry in &counts {
        println!("{:>8}  {}", entry.count, entry.category);
    }
    Ok(())
}

// =============================================================================
// QUERY COMMANDS
// =============================================================================

fn run_query(graph: &CoGraph, json_mode: bool, query: &Query) -> Result<QueryOutcome, CobuyError> {
    let outcome = graph.execute(query);
    if json_mode {
        print_json(&outcome)?;
    }
    Ok(outcome)
}

/// Show a product's attributes.
pub fn cmd_stats(graph: &CoGraph, json_mode: bool, product_id: &str) -> Result<(), CobuyError> {
    let outcome = run_query(graph, json_mode, &Query::stats(product_id))?;
    if json_mode {
        return Ok(());
    }

    match outcome {
        QueryOutcome::Stats(Some(product)) => {
            println!("Product: {}", product.product_id);
            println!("  Name:     {}", product.name);
            match &product.price {
                Some(price) => println!("  Price:    {}", price),
                None => println!("  Price:    -"),
            }
            println!("  Category: {}", product.category_path());
            println!("  Brand:    {}", product.brand);
            println!("  Link:     {}", product.link);
            let degree = graph
                .node_id(&product.product_id)
                .map(|id| graph.degree(id))
                .unwrap_or(0);
            println!("  Degree:   {}", degree);
        }
        _ => println!("Product ID {} not found.", product_id),
    }
    Ok(())
}

/// Rank a product's co-purchases.
pub fn cmd_recommend(
    graph: &CoGraph,
    json_mode: bool,
    product_id: &str,
    top_n: usize,
) -> Result<(), CobuyError> {
    if top_n > MAX_TOP_N {
        return Err(CobuyError::InvalidQuery(format!(
            "top_n must be at most {}",
            MAX_TOP_N
        )));
    }

    let query = Query::Recommend {
        product_id: product_id.to_string(),
        top_n,
    };
    let outcome = run_query(graph, json_mode, &query)?;
    if json_mode {
        return Ok(());
    }

    match outcome {
        QueryOutcome::Recommendations(items) if !items.is_empty() => {
            println!("Recommendations for {}:", product_id);
            for (rank, item) in items.iter().enumerate() {
                println!(
                    "  {:>3}. {}  {}  (bought together by {})",
                    rank + 1,
                    item.product_id,
                    item.name,
                    item.weight.value()
                );
            }
        }
        _ if !graph.contains(product_id) => println!("Product ID {} not found.", product_id),
        _ => println!("No similar items found for product {}.", product_id),
    }
    Ok(())
}

/// List every co-purchase partner.
pub fn cmd_neighbors(
    graph: &CoGraph,
    json_mode: bool,
    product_id: &str,
) -> Result<(), CobuyError> {
    let outcome = run_query(graph, json_mode, &Query::neighbors(product_id))?;
    if json_mode {
        return Ok(());
    }

    match outcome {
        QueryOutcome::Neighbors(Some(items)) => {
            println!("{} has {} co-purchase partners", product_id, items.len());
            for item in &items {
                println!("  {}  {}  ({})", item.product_id, item.name, item.weight.value());
            }
        }
        _ => println!("Product not found in graph."),
    }
    Ok(())
}

/// Shortest hop-count path.
pub fn cmd_path(graph: &CoGraph, json_mode: bool, from: &str, to: &str) -> Result<(), CobuyError> {
    let outcome = run_query(graph, json_mode, &Query::shortest_path(from, to))?;
    if json_mode {
        return Ok(());
    }

    match outcome {
        QueryOutcome::Path(Some(path)) => {
            println!("Path ({} hops):", path.len().saturating_sub(1));
            for product_id in &path {
                let name = graph.get(product_id).map(|p| p.name.as_str()).unwrap_or("");
                println!("  {}  {}", product_id, name);
            }
        }
        _ => println!("No path found between {} and {}.", from, to),
    }
    Ok(())
}

/// Show the most connected product.
pub fn cmd_popular(graph: &CoGraph, json_mode: bool) -> Result<(), CobuyError> {
    let outcome = run_query(graph, json_mode, &Query::MostConnected)?;
    if json_mode {
        return Ok(());
    }

    match outcome {
        QueryOutcome::MostConnected(Some(top)) => {
            let name = graph
                .get(&top.product_id)
                .map(|p| p.name.as_str())
                .unwrap_or("");
            println!("Most connected product: {}  {}", top.product_id, name);
            println!("  Degree: {}", top.degree);
        }
        _ => println!("No connected products found."),
    }
    Ok(())
}

/// Print a bounded subgraph as JSON.
pub fn cmd_subgraph(
    graph: &CoGraph,
    category: Option<&str>,
    max_nodes: Option<usize>,
    max_edges: Option<usize>,
) -> Result<(), CobuyError> {
    let max_nodes = max_nodes.unwrap_or(DEFAULT_SUBGRAPH_NODES);
    let max_edges = max_edges.unwrap_or(DEFAULT_SUBGRAPH_EDGES);
    if max_nodes > MAX_SUBGRAPH_NODES || max_edges > MAX_SUBGRAPH_EDGES {
        return Err(CobuyError::InvalidQuery(format!(
            "max_nodes must be at most {} and max_edges at most {}",
            MAX_SUBGRAPH_NODES, MAX_SUBGRAPH_EDGES
        )));
    }

    print_json(&graph.subgraph(category, max_nodes, max_edges))
}
