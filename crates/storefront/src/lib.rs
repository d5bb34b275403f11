//! Suplefit Storefront library.
//!
//! This crate provides the cart service as a library, allowing it to be
//! tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod carts;
pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
