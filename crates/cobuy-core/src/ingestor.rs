//! # Ingestor Module
//!
//! Line-delimited record parsing for reviews and product metadata.
//!
//! - One JSON object per line
//! - Lines that fail to parse or lack a required field are counted and dropped
//! - Only a source that cannot be opened or read aborts ingestion
//! - A line cap bounds memory on very large sources

use crate::primitives::{
    BRAND_FIELD, CATEGORY_FIELD, CATEGORY_SEPARATOR, DEFAULT_MAX_METADATA_LINES,
    DEFAULT_MAX_REVIEW_LINES, METADATA_PROGRESS_INTERVAL, PRICE_FIELD, PRODUCT_ID_FIELD,
    REVIEW_PROGRESS_INTERVAL, REVIEW_RATING_FIELD, REVIEW_USER_FIELD, TITLE_FIELD,
};
use crate::types::product_link;
use crate::{CobuyError, Price, ProductRecord, Review};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// =============================================================================
// LIMITS & REPORTS
// =============================================================================

/// Per-source line caps. A cap of `0` reads the whole source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestLimits {
    pub max_review_lines: usize,
    pub max_metadata_lines: usize,
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self {
            max_review_lines: DEFAULT_MAX_REVIEW_LINES,
            max_metadata_lines: DEFAULT_MAX_METADATA_LINES,
        }
    }
}

impl IngestLimits {
    /// Limits that read every line of both sources.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_review_lines: 0,
            max_metadata_lines: 0,
        }
    }
}

/// Why a line was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Not valid UTF-8 or not valid JSON.
    Unparseable,
    /// Valid JSON, but not an object.
    NotAnObject,
    /// A required field is absent, null, empty or of the wrong type.
    MissingField(&'static str),
}

/// Counters describing one ingestion pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub lines_read: usize,
    pub accepted: usize,
    pub blank: usize,
    pub unparseable: usize,
    pub not_an_object: usize,
    pub missing_field: usize,
    /// The line cap stopped reading before end of input.
    pub cap_reached: bool,
}

impl IngestReport {
    /// Total number of dropped lines.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.unparseable + self.not_an_object + self.missing_field
    }

    fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::Unparseable => self.unparseable += 1,
            Rejection::NotAnObject => self.not_an_object += 1,
            Rejection::MissingField(_) => self.missing_field += 1,
        }
    }
}

/// Records accepted from one source, with the pass report.
#[derive(Debug, Clone)]
pub struct Ingested<T> {
    pub records: Vec<T>,
    pub report: IngestReport,
}

// =============================================================================
// INGESTOR
// =============================================================================

/// The Ingestor turns raw review and metadata lines into typed records.
pub struct Ingestor;

impl Ingestor {
    /// Parse one review line.
    ///
    /// A review qualifies only with a reviewer id, a product id and a
    /// numeric rating.
    pub fn parse_review(line: &str) -> Result<Review, Rejection> {
        let object = parse_object(line)?;

        let user_id =
            id_field(&object, REVIEW_USER_FIELD).ok_or(Rejection::MissingField(REVIEW_USER_FIELD))?;
        let product_id =
            id_field(&object, PRODUCT_ID_FIELD).ok_or(Rejection::MissingField(PRODUCT_ID_FIELD))?;
        let rating = object
            .get(REVIEW_RATING_FIELD)
            .and_then(Value::as_f64)
            .ok_or(Rejection::MissingField(REVIEW_RATING_FIELD))?;

        Ok(Review {
            user_id,
            product_id,
            rating,
        })
    }

    /// Parse one metadata line.
    ///
    /// Normalisation:
    /// - absent title becomes the empty string; an explicit null drops the row
    /// - a category list is joined with `|`, anything else becomes empty
    /// - price passes through verbatim, null or absent becomes `None`
    /// - a null or absent brand becomes the empty string
    pub fn parse_product(line: &str) -> Result<ProductRecord, Rejection> {
        let object = parse_object(line)?;

        let product_id =
            id_field(&object, PRODUCT_ID_FIELD).ok_or(Rejection::MissingField(PRODUCT_ID_FIELD))?;

        let product_name = match object.get(TITLE_FIELD) {
            None => String::new(),
            Some(Value::Null) => return Err(Rejection::MissingField(TITLE_FIELD)),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        let price = match object.get(PRICE_FIELD) {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => Some(Price::Number(n.clone())),
            Some(Value::String(s)) => Some(Price::Text(s.clone())),
            Some(other) => Some(Price::Text(other.to_string())),
        };

        let category = match object.get(CATEGORY_FIELD) {
            Some(Value::Array(parts)) => parts
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(CATEGORY_SEPARATOR),
            _ => String::new(),
        };

        let brand = match object.get(BRAND_FIELD) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        Ok(ProductRecord {
            link: product_link(&product_id),
            product_id,
            product_name,
            price,
            category,
            brand,
        })
    }

    /// Read reviews from any buffered source.
    pub fn read_reviews<R: BufRead>(
        reader: R,
        max_lines: usize,
    ) -> Result<Ingested<Review>, CobuyError> {
        read_records(
            reader,
            max_lines,
            REVIEW_PROGRESS_INTERVAL,
            "review",
            Self::parse_review,
        )
    }

    /// Read product metadata from any buffered source.
    pub fn read_metadata<R: BufRead>(
        reader: R,
        max_lines: usize,
    ) -> Result<Ingested<ProductRecord>, CobuyError> {
        read_records(
            reader,
            max_lines,
            METADATA_PROGRESS_INTERVAL,
            "metadata",
            Self::parse_product,
        )
    }

    /// Read reviews from a file.
    ///
    /// # Errors
    /// `CobuyError::SourceUnavailable` if the file cannot be opened.
    pub fn load_reviews(path: &Path, max_lines: usize) -> Result<Ingested<Review>, CobuyError> {
        let ingested = Self::read_reviews(open_source(path)?, max_lines)?;
        tracing::info!(
            path = %path.display(),
            accepted = ingested.report.accepted,
            rejected = ingested.report.rejected(),
            "Loaded reviews"
        );
        Ok(ingested)
    }

    /// Read product metadata from a file.
    ///
    /// # Errors
    /// `CobuyError::SourceUnavailable` if the file cannot be opened.
    pub fn load_metadata(
        path: &Path,
        max_lines: usize,
    ) -> Result<Ingested<ProductRecord>, CobuyError> {
        let ingested = Self::read_metadata(open_source(path)?, max_lines)?;
        tracing::info!(
            path = %path.display(),
            accepted = ingested.report.accepted,
            rejected = ingested.report.rejected(),
            "Loaded metadata entries"
        );
        Ok(ingested)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn open_source(path: &Path) -> Result<BufReader<File>, CobuyError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| CobuyError::SourceUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn parse_object(line: &str) -> Result<Map<String, Value>, Rejection> {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(Rejection::NotAnObject),
        Err(_) => Err(Rejection::Unparseable),
    }
}

/// Identifier fields accept non-empty strings and bare numbers.
fn id_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn read_records<R, T, F>(
    mut reader: R,
    max_lines: usize,
    progress_interval: usize,
    kind: &'static str,
    parse: F,
) -> Result<Ingested<T>, CobuyError>
where
    R: BufRead,
    F: Fn(&str) -> Result<T, Rejection>,
{
    let mut records = Vec::new();
    let mut report = IngestReport::default();
    let mut buf = Vec::new();

    loop {
        if max_lines > 0 && report.lines_read >= max_lines {
            // Only a cap that leaves input unread counts as reached.
            let exhausted = reader
                .fill_buf()
                .map_err(|e| CobuyError::IoError(format!("Reading {kind} source: {e}")))?
                .is_empty();
            if !exhausted {
                report.cap_reached = true;
                tracing::info!(kind, lines = report.lines_read, "Line cap reached");
            }
            break;
        }

        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| CobuyError::IoError(format!("Reading {kind} source: {e}")))?;
        if read == 0 {
            break;
        }
        report.lines_read += 1;

        let outcome = match std::str::from_utf8(&buf) {
            Ok(text) if text.trim().is_empty() => None,
            Ok(text) => Some(parse(text.trim())),
            Err(_) => Some(Err(Rejection::Unparseable)),
        };

        match outcome {
            None => report.blank += 1,
            Some(Ok(record)) => {
                records.push(record);
                report.accepted += 1;
            }
            Some(Err(rejection)) => {
                tracing::debug!(kind, line = report.lines_read, ?rejection, "Dropped line");
                report.record(rejection);
            }
        }

        if report.lines_read % progress_interval == 0 {
            tracing::info!(kind, lines = report.lines_read, "Parsed lines...");
        }
    }

    Ok(Ingested { records, report })
}

// =============================================================================
// TESTS
// =============================================================================
