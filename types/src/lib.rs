//! Shared types for the catalog admin dashboard.
//!
//! These mirror the wire format of the product backend so the frontend can
//! (de)serialize responses without ad-hoc field mapping.

mod formatting;
mod product;

pub use formatting::format_price;
pub use product::{Product, ProductDraft, ProductStatus};
