//! # Primitives
//!
//! Hardcoded constants for the cobuy CORE: source field names, defaults and
//! the bounds every query path enforces.

// =============================================================================
// SOURCE FORMAT
// =============================================================================

/// Review field holding the reviewer identifier.
pub const REVIEW_USER_FIELD: &str = "reviewerID";

/// Field holding the product identifier, in both review and metadata lines.
pub const PRODUCT_ID_FIELD: &str = "asin";

/// Review field holding the numeric rating.
pub const REVIEW_RATING_FIELD: &str = "overall";

/// Metadata field holding the product title.
pub const TITLE_FIELD: &str = "title";

/// Metadata field holding the price.
pub const PRICE_FIELD: &str = "price";

/// Metadata field holding the category list.
pub const CATEGORY_FIELD: &str = "category";

/// Metadata field holding the brand.
pub const BRAND_FIELD: &str = "brand";

/// Separator used when a category list is flattened to one string.
pub const CATEGORY_SEPARATOR: &str = "|";

/// Product links are this prefix followed by the product id.
pub const PRODUCT_LINK_PREFIX: &str = "https://www.amazon.com/dp/";

/// Name given to products whose title is absent or blank.
pub const DEFAULT_PRODUCT_NAME: &str = "Unnamed";

// =============================================================================
// INGESTION LIMITS
// =============================================================================

/// Default cap on review lines read from one source.
pub const DEFAULT_MAX_REVIEW_LINES: usize = 2_000_000;

/// Default cap on metadata lines read from one source.
pub const DEFAULT_MAX_METADATA_LINES: usize = 500_000;

/// A progress event is logged every this many review lines.
pub const REVIEW_PROGRESS_INTERVAL: usize = 500_000;

/// A progress event is logged every this many metadata lines.
pub const METADATA_PROGRESS_INTERVAL: usize = 200_000;

// =============================================================================
// QUERY BOUNDS
// =============================================================================

/// Default number of recommendations returned.
pub const DEFAULT_TOP_N: usize = 5;

/// Upper bound on recommendations per request.
pub const MAX_TOP_N: usize = 100;

/// Default node budget for an extracted subgraph.
pub const DEFAULT_SUBGRAPH_NODES: usize = 100;

/// Default edge budget for an extracted subgraph.
pub const DEFAULT_SUBGRAPH_EDGES: usize = 300;

/// Hard upper bound on subgraph nodes.
pub const MAX_SUBGRAPH_NODES: usize = 1000;

/// Hard upper bound on subgraph edges.
pub const MAX_SUBGRAPH_EDGES: usize = 5000;

/// Longest path (in nodes) returned as a path subgraph.
pub const MAX_PATH_SUBGRAPH_LEN: usize = 15;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_intervals_are_coarse() {
        assert!(REVIEW_PROGRESS_INTERVAL >= 100_000);
        assert!(METADATA_PROGRESS_INTERVAL >= 100_000);
    }

    #[test]
    fn default_bounds_within_hard_bounds() {
        assert!(DEFAULT_TOP_N <= MAX_TOP_N);
        assert!(DEFAULT_SUBGRAPH_NODES <= MAX_SUBGRAPH_NODES);
        assert!(DEFAULT_SUBGRAPH_EDGES <= MAX_SUBGRAPH_EDGES);
    }
}
