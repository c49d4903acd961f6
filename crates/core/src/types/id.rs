//! Newtype IDs for BigCommerce entity references.
//!
//! BigCommerce identifies customers, orders, products and most catalog
//! entities with positive integers. Use the `define_id!` macro to create
//! type-safe wrappers that prevent mixing IDs from different entity types.

use serde::{Deserialize, Deserializer};

/// Errors that can occur when parsing an entity ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input is not an integer.
    #[error("id must be an integer, got {0:?}")]
    NotANumber(String),
    /// The input is zero or negative.
    #[error("id must be positive, got {0}")]
    NotPositive(i64),
}

/// Macro to define a type-safe entity ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize` as a bare number
/// - `Deserialize` from either a number or a numeric string
///   (route slugs arrive as strings, API payloads as numbers)
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - `FromStr`, `Display`, `new()`, `as_i64()`
///
/// # Example
///
/// ```rust
/// # use bc_storefront_core::define_id;
/// define_id!(WishlistId);
///
/// let id: WishlistId = "42".parse().unwrap();
/// assert_eq!(id.as_i64(), 42);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $crate::types::id::parse_entity_id(s).map(Self)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::types::id::deserialize_entity_id(deserializer).map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(CustomerId);
define_id!(OrderId);
define_id!(ProductId);
define_id!(VariantId);
define_id!(CategoryId);
define_id!(BrandId);

/// Parse a positive integer ID from text.
///
/// # Errors
///
/// Returns an error if the text is not an integer or is not positive.
pub fn parse_entity_id(s: &str) -> Result<i64, IdError> {
    let id = s
        .trim()
        .parse::<i64>()
        .map_err(|_| IdError::NotANumber(s.to_string()))?;
    if id <= 0 {
        return Err(IdError::NotPositive(id));
    }
    Ok(id)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

/// Deserialize an ID from a JSON number or a numeric string.
///
/// # Errors
///
/// Returns the deserializer's error if the value is neither, or is not a
/// positive integer.
pub fn deserialize_entity_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawId::deserialize(deserializer)? {
        RawId::Number(id) if id > 0 => Ok(id),
        RawId::Number(id) => Err(serde::de::Error::custom(IdError::NotPositive(id))),
        RawId::Text(text) => parse_entity_id(&text).map_err(serde::de::Error::custom),
    }
}
