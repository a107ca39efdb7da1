use rust_decimal::Decimal;

use super::{Error, Tier, TierMultipliers};

/// Tier-based points and promotional discount math
///
/// Discounts are always the fraction of the price that is waived, in `(0, 1]`.
/// A discount of `1` makes the purchase free.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointsCalculator {
    multipliers: TierMultipliers,
}

impl PointsCalculator {
    pub fn new(multipliers: TierMultipliers) -> Self {
        Self { multipliers }
    }

    pub fn multiplier(&self, tier: Tier) -> Decimal {
        self.multipliers.multiplier(tier)
    }

    pub fn points_for_purchase(&self, amount: Decimal, tier: Tier) -> Result<Decimal, Error> {
        amount
            .checked_mul(self.multiplier(tier))
            .ok_or(Error::Overflow("purchase points"))
    }

    /// Amount left to pay once `discount` is waived
    pub fn apply_discount(&self, amount: Decimal, discount: Decimal) -> Result<Decimal, Error> {
        validate_discount(discount)?;
        Ok(amount * (Decimal::ONE - discount))
    }
}

pub fn validate_discount(discount: Decimal) -> Result<(), Error> {
    if discount <= Decimal::ZERO || discount > Decimal::ONE {
        return Err(Error::InvalidDiscount(discount));
    }
    Ok(())
}
