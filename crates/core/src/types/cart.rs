//! Cart identifier type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CartId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartIdError {
    /// The input string is empty.
    #[error("cart id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("cart id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character that cannot appear in a cookie value
    /// or URL path segment.
    #[error("cart id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// An opaque shopping cart identifier.
///
/// BigCommerce issues UUIDs, but the proxy never interprets the value: it
/// only moves it between a URL segment, the `bc_cartId` cookie and the
/// cart endpoints of the store API. Parsing restricts it to characters that
/// are safe in all three places.
///
/// ## Examples
///
/// ```
/// use bc_storefront_core::CartId;
///
/// assert!(CartId::parse("5d1f2a3c-8f7e-4b44-b1c2-0e2a7b9c1d00").is_ok());
/// assert!(CartId::parse("123").is_ok());
///
/// assert!(CartId::parse("").is_err());
/// assert!(CartId::parse("a/b").is_err());
/// assert!(CartId::parse("a;b").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct CartId(String);

impl CartId {
    /// Maximum accepted length.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `CartId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than
    /// [`CartId::MAX_LENGTH`], or contains anything other than ASCII
    /// alphanumerics, `-` and `_`.
    pub fn parse(s: &str) -> Result<Self, CartIdError> {
        validate_token(s, Self::MAX_LENGTH)?;
        Ok(Self(s.to_owned()))
    }

    /// Returns the cart ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CartId {
    type Err = CartIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CartId {
    type Error = CartIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CartId> for String {
    fn from(id: CartId) -> Self {
        id.0
    }
}

/// Identifier of one line item within a cart.
///
/// Follows the same character rules as [`CartId`] because it is spliced
/// into store API paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct CartItemId(String);

impl CartItemId {
    /// Parse a `CartItemId` from a string.
    ///
    /// # Errors
    ///
    /// Same rules as [`CartId::parse`].
    pub fn parse(s: &str) -> Result<Self, CartIdError> {
        validate_token(s, CartId::MAX_LENGTH)?;
        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CartItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CartItemId {
    type Error = CartIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CartItemId> for String {
    fn from(id: CartItemId) -> Self {
        id.0
    }
}

fn validate_token(s: &str, max: usize) -> Result<(), CartIdError> {
    if s.is_empty() {
        return Err(CartIdError::Empty);
    }

    if s.len() > max {
        return Err(CartIdError::TooLong { max });
    }

    if let Some(c) = s
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(CartIdError::InvalidCharacter(c));
    }

    Ok(())
}
