//! # Dataset Preparation
//!
//! Loads both sources and keeps only products that appear in both, so every
//! node of the resulting graph has at least one review.

use crate::builder::{BuildReport, GraphBuilder};
use crate::graph::CoGraph;
use crate::ingestor::{IngestLimits, IngestReport, Ingestor};
use crate::{CobuyError, ProductRecord, Review};
use std::collections::BTreeSet;
use std::path::Path;

/// Cleaned product and review collections restricted to shared product ids.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub products: Vec<ProductRecord>,
    pub reviews: Vec<Review>,
    pub review_report: IngestReport,
    pub metadata_report: IngestReport,
}

impl Dataset {
    /// Restrict in-memory records to the product-id intersection.
    #[must_use]
    pub fn from_records(products: Vec<ProductRecord>, reviews: Vec<Review>) -> Self {
        let reviewed: BTreeSet<&str> = reviews.iter().map(|r| r.product_id.as_str()).collect();
        let described: BTreeSet<&str> = products.iter().map(|p| p.product_id.as_str()).collect();
        let common: BTreeSet<String> = reviewed
            .intersection(&described)
            .map(|id| (*id).to_string())
            .collect();

        let products: Vec<ProductRecord> = products
            .into_iter()
            .filter(|p| common.contains(&p.product_id))
            .collect();
        let reviews: Vec<Review> = reviews
            .into_iter()
            .filter(|r| common.contains(&r.product_id))
            .collect();

        tracing::info!(
            products = products.len(),
            reviews = reviews.len(),
            common_ids = common.len(),
            "Loaded products and reviews with common IDs"
        );

        Self {
            products,
            reviews,
            ..Self::default()
        }
    }

    /// Load both sources from disk and restrict them to shared ids.
    ///
    /// # Errors
    /// `CobuyError::SourceUnavailable` if either file cannot be opened.
    pub fn load(
        reviews_path: &Path,
        metadata_path: &Path,
        limits: &IngestLimits,
    ) -> Result<Self, CobuyError> {
        let reviews = Ingestor::load_reviews(reviews_path, limits.max_review_lines)?;
        let metadata = Ingestor::load_metadata(metadata_path, limits.max_metadata_lines)?;

        Ok(Self {
            review_report: reviews.report,
            metadata_report: metadata.report,
            ..Self::from_records(metadata.records, reviews.records)
        })
    }

    /// Build the co-purchase graph from this dataset.
    #[must_use]
    pub fn build(&self, builder: &GraphBuilder) -> (CoGraph, BuildReport) {
        builder.build_with_report(&self.products, &self.reviews)
    }
}
