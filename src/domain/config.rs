use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use super::{PointsCalculator, Tier};

/// Points earned per currency unit, for every [`Tier`]
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TierMultipliers {
    pub standard: Decimal,
    pub premium: Decimal,
    pub vip: Decimal,
}

impl TierMultipliers {
    pub fn multiplier(&self, tier: Tier) -> Decimal {
        match tier {
            Tier::Standard => self.standard,
            Tier::Premium => self.premium,
            Tier::Vip => self.vip,
        }
    }
}

impl Default for TierMultipliers {
    fn default() -> Self {
        Self {
            standard: dec!(1.0),
            premium: dec!(1.5),
            vip: dec!(2.0),
        }
    }
}

/// Loyalty program constants
///
/// Built once at startup and shared read-only afterwards. There is no runtime
/// reconfiguration: build a new [`LoyaltyConfig`] and a new service instead.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoyaltyConfig {
    pub tier_multipliers: TierMultipliers,
    /// Currency value of a single redeemed point
    pub redemption_value: Decimal,
    /// Points granted to a newly registered customer
    pub welcome_points: Decimal,
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        Self {
            tier_multipliers: TierMultipliers::default(),
            redemption_value: dec!(0.05),
            welcome_points: dec!(10),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot parse loyalty configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("multiplier for tier {tier} must be greater than zero, got {value}")]
    InvalidMultiplier { tier: Tier, value: Decimal },

    #[error("{field} cannot be negative, got {value}")]
    Negative { field: &'static str, value: Decimal },
}

impl LoyaltyConfig {
    /// Load a configuration from JSON
    ///
    /// Missing fields fall back to their default value.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for tier in Tier::ALL {
            let value = self.tier_multipliers.multiplier(tier);
            if value <= Decimal::ZERO {
                return Err(ConfigError::InvalidMultiplier { tier, value });
            }
        }
        if self.redemption_value < Decimal::ZERO {
            return Err(ConfigError::Negative {
                field: "redemption_value",
                value: self.redemption_value,
            });
        }
        if self.welcome_points < Decimal::ZERO {
            return Err(ConfigError::Negative {
                field: "welcome_points",
                value: self.welcome_points,
            });
        }
        Ok(())
    }

    pub fn calculator(&self) -> PointsCalculator {
        PointsCalculator::new(self.tier_multipliers)
    }

    /// Currency value of `points` redeemed points
    pub fn discount_value(&self, points: Decimal) -> Decimal {
        points.saturating_mul(self.redemption_value)
    }
}
