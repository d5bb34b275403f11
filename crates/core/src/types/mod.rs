//! Shared domain types.

pub mod catalog;
pub mod id;
pub mod price;

pub use catalog::{Product, SizeSelection, Variant};
pub use id::{ProductId, VariantId};
pub use price::{CurrencyCode, Price};
