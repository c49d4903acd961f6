//! BigCommerce storefront core - shared domain types.
//!
//! This crate provides the identifiers and small value types passed between
//! the storefront proxy and the commerce backend.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Every
//! entity (cart, product, order, address) is owned by the commerce backend;
//! the proxy only needs to carry identifiers and validated request inputs.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for entity IDs, cart IDs, country codes,
//!   product sorting and login credentials

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
