//! Frontend type definitions
//!
//! Re-exports the shared catalog types and adds frontend-only types that
//! mirror backend response envelopes.

use serde::Deserialize;

pub use catalog_types::{Product, ProductDraft, ProductStatus};

// ─────────────────────────────────────────────────────────────────────────────
// Backend Response Envelopes
// ─────────────────────────────────────────────────────────────────────────────

/// Plain acknowledgement body, e.g. from DELETE.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// PATCH response: acknowledgement plus the updated product.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateResponse {
    #[serde(default)]
    pub message: String,
    pub data: Product,
}

/// Search-by-image response: matched products plus a status line.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchByImageResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Vec<Product>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Frontend-Only Types
// ─────────────────────────────────────────────────────────────────────────────

/// Status dropdown selection on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ProductStatus),
}

impl StatusFilter {
    pub fn accepts(&self, status: ProductStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(s) => *s == status,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(s) => s.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All statuses",
            StatusFilter::Only(s) => s.label(),
        }
    }

    /// Parse a `<select>` value back into a filter; unknown values mean All.
    pub fn parse(value: &str) -> StatusFilter {
        match ProductStatus::parse(value) {
            Some(s) => StatusFilter::Only(s),
            None => StatusFilter::All,
        }
    }

    /// Dropdown options, in display order.
    pub fn options() -> [StatusFilter; 4] {
        [
            StatusFilter::All,
            StatusFilter::Only(ProductStatus::Active),
            StatusFilter::Only(ProductStatus::Draft),
            StatusFilter::Only(ProductStatus::Archived),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter_accepts() {
        assert!(StatusFilter::All.accepts(ProductStatus::Draft));
        assert!(StatusFilter::Only(ProductStatus::Active).accepts(ProductStatus::Active));
        assert!(!StatusFilter::Only(ProductStatus::Active).accepts(ProductStatus::Archived));
    }

    #[test]
    fn test_status_filter_parse_round_trip() {
        for option in StatusFilter::options() {
            assert_eq!(StatusFilter::parse(option.as_str()), option);
        }
        assert_eq!(StatusFilter::parse("nonsense"), StatusFilter::All);
    }
}
