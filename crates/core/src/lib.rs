//! Suplefit Core - Shared types library.
//!
//! This crate provides common types used across all Suplefit components:
//! - `cart` - Cart engine (variant resolution, line items, totals)
//! - `storefront` - Session-scoped HTTP cart service
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, and read-only catalog records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
