//! ISO 3166 country codes.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CountryCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CountryCodeError {
    /// Not exactly two characters.
    #[error("country code must be two letters, got {0:?}")]
    InvalidLength(String),
    /// Contains something other than ASCII letters.
    #[error("country code must be alphabetic, got {0:?}")]
    NotAlphabetic(String),
}

/// An ISO 3166-1 alpha-2 country code, normalised to upper case.
///
/// ```
/// use bc_storefront_core::CountryCode;
///
/// let code = CountryCode::parse("us").unwrap();
/// assert_eq!(code.as_str(), "US");
/// assert!(CountryCode::parse("USA").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse a country code, accepting either case.
    ///
    /// # Errors
    ///
    /// Returns an error unless the input is exactly two ASCII letters.
    pub fn parse(s: &str) -> Result<Self, CountryCodeError> {
        if s.len() != 2 {
            return Err(CountryCodeError::InvalidLength(s.to_string()));
        }
        if !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CountryCodeError::NotAlphabetic(s.to_string()));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CountryCode {
    type Err = CountryCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = CountryCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}
