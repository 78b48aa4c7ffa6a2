//! # cobuy CLI Module
//!
//! This module implements the CLI interface for cobuy.
//!
//! Every command loads both sources, builds the graph once and then either
//! answers a single query or serves the HTTP API.
//!
//! ## Available Commands
//!
//! - `serve` - Start the HTTP server
//! - `summary` - Show whole-graph metrics (default)
//! - `stats` - Show a product's attributes
//! - `recommend` - Rank a product's co-purchases
//! - `neighbors` - List every co-purchase partner
//! - `path` - Shortest hop-count path between two products
//! - `popular` - Most connected product
//! - `categories` - Main categories with product counts
//! - `subgraph` - Bounded slice of the graph as JSON

mod commands;

use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use cobuy_core::CobuyError;
use cobuy_core::primitives::DEFAULT_TOP_N;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// cobuy - Co-Purchase Graph
///
/// Builds a weighted product graph from review and metadata dumps and
/// answers recommendation and path queries against it.
#[derive(Parser, Debug)]
#[command(name = "cobuy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a cobuy.toml configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Review source (JSON lines), overrides the configuration
    #[arg(short = 'r', long, global = true)]
    pub reviews: Option<PathBuf>,

    /// Metadata source (JSON lines), overrides the configuration
    #[arg(short = 'm', long, global = true)]
    pub metadata: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to (defaults to the configured host)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show whole-graph metrics
    Summary,

    /// Show a product's attributes
    Stats {
        /// Product id
        product_id: String,
    },

    /// Rank a product's co-purchases by shared buyers
    Recommend {
        /// Product id
        product_id: String,

        /// Number of recommendations
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
    },

    /// List every co-purchase partner of a product
    Neighbors {
        /// Product id
        product_id: String,
    },

    /// Shortest hop-count path between two products
    Path {
        /// Source product id
        from: String,

        /// Target product id
        to: String,
    },

    /// Show the most connected product
    Popular,

    /// Show main categories with product counts
    Categories,

    /// Print a bounded slice of the graph as JSON
    Subgraph {
        /// Restrict to one main category
        #[arg(long)]
        category: Option<String>,

        /// Maximum number of nodes
        #[arg(long)]
        max_nodes: Option<usize>,

        /// Maximum number of edges
        #[arg(long)]
        max_edges: Option<usize>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Resolve the configuration with command-line overrides applied.
pub fn resolve_config(cli: &Cli) -> Result<AppConfig, CobuyError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(reviews) = &cli.reviews {
        config.data.reviews = reviews.clone();
    }
    if let Some(metadata) = &cli.metadata {
        config.data.metadata = metadata.clone();
    }
    Ok(config)
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CobuyError> {
    let config = resolve_config(&cli)?;
    let json_mode = cli.json_mode;

    if cli.verbose {
        tracing::info!(?config, "Resolved configuration");
    }

    let graph = load_graph(&config)?;

    match cli.command {
        Some(Commands::Serve { host, port }) => cmd_serve(graph, &config, host, port).await,
        Some(Commands::Summary) | None => cmd_summary(&graph, json_mode),
        Some(Commands::Stats { product_id }) => cmd_stats(&graph, json_mode, &product_id),
        Some(Commands::Recommend { product_id, top_n }) => {
            cmd_recommend(&graph, json_mode, &product_id, top_n)
        }
        Some(Commands::Neighbors { product_id }) => cmd_neighbors(&graph, json_mode, &product_id),
        Some(Commands::Path { from, to }) => cmd_path(&graph, json_mode, &from, &to),
        Some(Commands::Popular) => cmd_popular(&graph, json_mode),
        Some(Commands::Categories) => cmd_categories(&graph, json_mode),
        Some(Commands::Subgraph {
            category,
            max_nodes,
            max_edges,
        }) => cmd_subgraph(&graph, category.as_deref(), max_nodes, max_edges),
    }
}
