//! Suplefit Cart Engine.
//!
//! The one piece of the store with real invariants: a keyed collection of
//! line items plus the size/flavor/price resolution logic every product
//! surface (card, detail page, quick-add modal, cart drawer) shares.
//!
//! # Modules
//!
//! - [`resolver`] - Resolve a product + selection into an effective
//!   price/image/stock to display and to snapshot into an addition
//! - [`store`] - The [`store::CartStore`], single owner of all line items
//! - [`totals`] - Pure aggregate derivations (totals, discounts)
//! - [`quantity`] - Clamp requested quantities against stock bounds
//!
//! # Ownership
//!
//! The `CartStore` is the only mutable state. Everything else is a pure
//! function over catalog records or over the store's current items. UI
//! surfaces resolve first, then feed the fully-resolved addition to the
//! store; identity keys are computed once, at add time, from the resolved
//! selection.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod quantity;
pub mod resolver;
pub mod store;
pub mod totals;

pub use resolver::{ResolvedSelection, SizeOption, resolve, size_options};
pub use store::{
    CartAddition, CartCommand, CartSnapshot, CartStore, LineItem, LineKey, ParseLineKeyError,
};
pub use totals::CartTotals;
