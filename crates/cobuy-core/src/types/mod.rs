//! # Core Type Definitions
//!
//! This module contains all core types for the cobuy co-purchase graph:
//! - Graph identifiers and weights (`NodeId`, `EdgeWeight`)
//! - Ingestion records (`Review`, `ProductRecord`, `Price`)
//! - Node attributes (`Product`)
//! - Error types (`CobuyError`)
//!
//! ## Determinism Guarantees
//!
//! All graph-facing types in this module:
//! - Use integer arithmetic only for weights and counts
//! - Implement `Ord` where they key a `BTreeMap`/`BTreeSet`
//! - Use saturating arithmetic for counters to prevent overflow

use crate::primitives::{CATEGORY_SEPARATOR, DEFAULT_PRODUCT_NAME, PRODUCT_LINK_PREFIX};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// GRAPH IDENTIFIERS
// =============================================================================

/// Internal identifier of a product node.
///
/// Assigned sequentially in node insertion order, so comparing two ids
/// compares their insertion position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Position of this node in the graph's node table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Weight of an undirected co-purchase edge: the number of distinct users
/// who reviewed both endpoints. Never zero on a stored edge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct EdgeWeight(pub u64);

impl EdgeWeight {
    /// Create a new edge weight with the given value.
    #[must_use]
    pub const fn new(weight: u64) -> Self {
        Self(weight)
    }

    /// Increment the edge weight by 1 using saturating arithmetic.
    #[must_use]
    pub const fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Add another accumulated count using saturating arithmetic.
    #[must_use]
    pub const fn saturating_add(self, other: u64) -> Self {
        Self(self.0.saturating_add(other))
    }

    /// Get the raw weight value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

// =============================================================================
// INGESTION RECORDS
// =============================================================================

/// A single qualifying review line.
///
/// Reviews only exist long enough to derive co-purchase pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub user_id: String,
    pub product_id: String,
    pub rating: f64,
}

impl Review {
    /// Create a new review record.
    #[must_use]
    pub fn new(user_id: impl Into<String>, product_id: impl Into<String>, rating: f64) -> Self {
        Self {
            user_id: user_id.into(),
            product_id: product_id.into(),
            rating,
        }
    }
}

/// Product price exactly as it appeared in the metadata source.
///
/// Sources carry either a bare number or a display string such as
/// `"$12.99"`; neither is normalised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A cleaned metadata row, as produced by the ingestor.
///
/// `category` is the pipe-delimited join of the source category list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_id: String,
    pub product_name: String,
    pub price: Option<Price>,
    pub category: String,
    pub brand: String,
    pub link: String,
}

impl ProductRecord {
    /// Minimal record carrying only an id and a name; the link is derived.
    #[must_use]
    pub fn new(product_id: impl Into<String>, product_name: impl Into<String>) -> Self {
        let product_id = product_id.into();
        Self {
            link: product_link(&product_id),
            product_id,
            product_name: product_name.into(),
            price: None,
            category: String::new(),
            brand: String::new(),
        }
    }

    /// Set the pipe-delimited category path.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the brand.
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    /// Set the price.
    #[must_use]
    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }
}

/// Canonical product page for a product id.
#[must_use]
pub fn product_link(product_id: &str) -> String {
    format!("{PRODUCT_LINK_PREFIX}{product_id}")
}

// =============================================================================
// PRODUCT (NODE ATTRIBUTES)
// =============================================================================

/// The attribute set carried by every graph node.
///
/// Fields that may be missing in the source are explicit: `price` is
/// optional, `category` may be empty, `brand` may be the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub price: Option<Price>,
    /// Category path, most general first.
    pub category: Vec<String>,
    pub brand: String,
    pub link: String,
}

impl Product {
    /// The first category element, if any.
    #[must_use]
    pub fn main_category(&self) -> Option<&str> {
        self.category.first().map(String::as_str)
    }

    /// The category path joined back into its pipe-delimited form.
    #[must_use]
    pub fn category_path(&self) -> String {
        self.category.join(CATEGORY_SEPARATOR)
    }
}

/// An empty name becomes `"Unnamed"`; any other name, whitespace included,
/// is kept as given. A non-empty category path is split on `|` with every
/// part kept, so `"|Electronics"` has an empty main category.
impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        let name = if record.product_name.is_empty() {
            DEFAULT_PRODUCT_NAME.to_string()
        } else {
            record.product_name
        };
        let link = if record.link.is_empty() {
            product_link(&record.product_id)
        } else {
            record.link
        };
        let category = if record.category.is_empty() {
            Vec::new()
        } else {
            record
                .category
                .split(CATEGORY_SEPARATOR)
                .map(str::to_string)
                .collect()
        };

        Self {
            product_id: record.product_id,
            name,
            price: record.price,
            category,
            brand: record.brand,
            link,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the cobuy system.
///
/// Only conditions that abort a whole operation live here. A malformed
/// input line is counted and dropped by the ingestor, and a query about an
/// unknown product returns `None`.
#[derive(Debug, Error)]
pub enum CobuyError {
    /// A raw data source could not be opened.
    #[error("Source unavailable: {}: {reason}", path.display())]
    SourceUnavailable { path: PathBuf, reason: String },

    /// Reading from an already opened source failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// The configuration file is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A query carried parameters outside accepted bounds.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_weight_saturating_increment() {
        let weight = EdgeWeight::new(u64::MAX);
        assert_eq!(weight.increment().value(), u64::MAX);
        assert_eq!(weight.saturating_add(5).value(), u64::MAX);
    }

    #[test]
    fn edge_weight_normal_increment() {
        let weight = EdgeWeight::default();
        assert_eq!(weight.increment().value(), 1);
    }

    #[test]
    fn product_defaults_empty_name() {
        let product = Product::from(ProductRecord::new("B0001", ""));
        assert_eq!(product.name, "Unnamed");
        assert_eq!(product.link, "https://www.amazon.com/dp/B0001");
        assert!(product.category.is_empty());
        assert_eq!(product.main_category(), None);
    }

    #[test]
    fn product_keeps_whitespace_name() {
        let product = Product::from(ProductRecord::new("B0001", "   "));
        assert_eq!(product.name, "   ");
    }

    #[test]
    fn product_splits_category_path() {
        let record = ProductRecord::new("B0002", "Cable").with_category("Electronics|Cables");
        let product = Product::from(record);

        assert_eq!(product.category, vec!["Electronics", "Cables"]);
        assert_eq!(product.main_category(), Some("Electronics"));
        assert_eq!(product.category_path(), "Electronics|Cables");
    }

    #[test]
    fn product_keeps_empty_category_parts() {
        let record = ProductRecord::new("B0003", "Plug").with_category("|Electronics|");
        let product = Product::from(record);

        assert_eq!(product.category, vec!["", "Electronics", ""]);
        assert_eq!(product.main_category(), Some(""));
        assert_eq!(product.category_path(), "|Electronics|");
    }

    #[test]
    fn price_displays_verbatim() {
        let text = Price::Text("$12.99".to_string());
        let number = Price::Number(serde_json::Number::from(15));
        assert_eq!(text.to_string(), "$12.99");
        assert_eq!(number.to_string(), "15");
    }

    #[test]
    fn price_serializes_untagged() {
        let json = serde_json::to_string(&Price::Text("$5".to_string())).expect("serialize");
        assert_eq!(json, "\"$5\"");
    }

    #[test]
    fn source_unavailable_message_names_path() {
        let err = CobuyError::SourceUnavailable {
            path: PathBuf::from("data/missing.json"),
            reason: "No such file".to_string(),
        };
        assert!(err.to_string().contains("data/missing.json"));
    }
}
