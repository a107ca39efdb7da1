use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod calculator;
pub mod config;
pub mod customer;
pub mod report;
pub mod wallet;

pub use calculator::PointsCalculator;
pub use config::{LoyaltyConfig, TierMultipliers};
pub use customer::{Customer, LedgerOperation};
pub use wallet::Wallet;

/// Customer classification that determines the point-earning rate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    Standard,
    Premium,
    Vip,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Standard, Tier::Premium, Tier::Vip];

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Standard => "STANDARD",
            Tier::Premium => "PREMIUM",
            Tier::Vip => "VIP",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse a tier label coming from outside the crate
///
/// Labels are matched case-insensitively. Anything else is an [`Error::UnknownTier`].
impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownTier(s.to_string()))
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// A quantity that must be strictly positive was zero or negative
    #[error("invalid {field}: {value} must be greater than zero")]
    InvalidAmount { field: &'static str, value: Decimal },

    /// Discount fraction outside of `(0, 1]`
    #[error("invalid discount {0}: must be greater than 0 and at most 1")]
    InvalidDiscount(Decimal),

    /// Tier label that does not map to a [`Tier`]
    #[error("unknown tier: {0:?}")]
    UnknownTier(String),

    /// Customer names are lookup keys and cannot be blank
    #[error("customer name cannot be empty")]
    InvalidName,

    /// The result of a points computation does not fit in a [`Decimal`]
    #[error("arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}
