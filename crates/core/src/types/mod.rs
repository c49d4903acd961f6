//! Core types for the storefront proxy.
//!
//! This module provides type-safe wrappers for the identifiers and inputs
//! that flow from HTTP requests into commerce backend calls.

pub mod cart;
pub mod catalog;
pub mod credentials;
pub mod geo;
pub mod id;

pub use cart::{CartId, CartIdError, CartItemId};
pub use catalog::{ProductSort, SortDirection, UnknownSort};
pub use credentials::{CredentialsError, LoginCredentials};
pub use geo::{CountryCode, CountryCodeError};
pub use id::*;
