//! # cobuy-core
//!
//! The co-purchase graph engine for cobuy - THE LOGIC.
//!
//! Raw review and metadata lines go in; an immutable, weighted, undirected
//! product graph comes out, and read-only queries run against it.
//!
//! ```text
//! raw lines -> Ingestor -> Dataset -> GraphBuilder -> CoGraph -> queries
//! ```
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies
//! - Deterministic: identical input produces an identical graph and
//!   identical query answers, including tie-breaks
//! - The graph is never mutated after the builder returns it, so it can be
//!   shared across threads without locking

// =============================================================================
// MODULES
// =============================================================================

pub mod builder;
pub mod dataset;
pub mod graph;
pub mod ingestor;
pub mod primitives;
pub mod query;
pub mod subgraph;
pub mod summary;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{CobuyError, EdgeWeight, NodeId, Price, Product, ProductRecord, Review};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use builder::{BuildOptions, BuildReport, FanOutPolicy, GraphBuilder, build};
pub use dataset::Dataset;
pub use graph::CoGraph;
pub use ingestor::{IngestLimits, IngestReport, Ingested, Ingestor, Rejection};
pub use query::{LinkedProduct, MostConnected, Query, QueryOutcome};
pub use subgraph::{Subgraph, SubgraphEdge, SubgraphNode};
pub use summary::{CategoryCount, GraphSummary};
