//! Catalog listing options.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Product listing order offered by the storefront.
///
/// Each variant maps to a sort field and direction of the store API's
/// `/v3/catalog/products` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort {
    /// Most recently modified first.
    LatestDesc,
    /// Best sellers first.
    TrendingDesc,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
}

/// Sort direction understood by the store API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl ProductSort {
    /// Store API `sort` query parameter value.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::LatestDesc => "date_modified",
            Self::TrendingDesc => "total_sold",
            Self::PriceAsc | Self::PriceDesc => "price",
        }
    }

    /// Store API `direction` query parameter value.
    #[must_use]
    pub const fn direction(self) -> SortDirection {
        match self {
            Self::PriceAsc => SortDirection::Asc,
            Self::LatestDesc | Self::TrendingDesc | Self::PriceDesc => SortDirection::Desc,
        }
    }

    /// The storefront's name for this ordering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LatestDesc => "latest-desc",
            Self::TrendingDesc => "trending-desc",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }
}

/// Unknown sort name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown product sort {0:?}")]
pub struct UnknownSort(pub String);

impl FromStr for ProductSort {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest-desc" => Ok(Self::LatestDesc),
            "trending-desc" => Ok(Self::TrendingDesc),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            other => Err(UnknownSort(other.to_string())),
        }
    }
}

impl fmt::Display for ProductSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
