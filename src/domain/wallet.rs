use rust_decimal::Decimal;

use super::{Error, PointsCalculator, Tier};

/// Loyalty points balance of a single customer
///
/// The balance never goes below zero. Every operation either applies fully or
/// returns an error and leaves the balance untouched.
///
/// Redemption and expiration are clamped: asking for more points than the
/// wallet holds removes the whole balance and reports how much was removed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Wallet {
    balance: Decimal,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a wallet seeded with `initial` points
    pub fn with_balance(initial: Decimal) -> Result<Self, Error> {
        if initial < Decimal::ZERO {
            return Err(Error::InvalidAmount {
                field: "initial points",
                value: initial,
            });
        }
        Ok(Self { balance: initial })
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn credit(&mut self, points: Decimal) -> Result<(), Error> {
        ensure_positive("points", points)?;
        self.balance = self
            .balance
            .checked_add(points)
            .ok_or(Error::Overflow("balance"))?;
        Ok(())
    }

    /// Credit the points earned by a purchase of `amount` at the given `tier`
    pub fn credit_from_purchase(
        &mut self,
        calculator: &PointsCalculator,
        amount: Decimal,
        tier: Tier,
    ) -> Result<Decimal, Error> {
        ensure_positive("purchase amount", amount)?;
        let points = calculator.points_for_purchase(amount, tier)?;
        self.credit(points)?;
        Ok(points)
    }

    /// Redeem up to `points`, returning the number of points actually redeemed
    pub fn redeem(&mut self, points: Decimal) -> Result<Decimal, Error> {
        ensure_positive("redemption", points)?;
        Ok(self.take(points))
    }

    /// Expire up to `points`, returning the number of points actually removed
    pub fn decay(&mut self, points: Decimal) -> Result<Decimal, Error> {
        ensure_positive("expiration", points)?;
        Ok(self.take(points))
    }

    pub fn apply_bonus(&mut self, multiplier: Decimal) -> Result<(), Error> {
        ensure_positive("bonus multiplier", multiplier)?;
        self.balance = self
            .balance
            .checked_mul(multiplier)
            .ok_or(Error::Overflow("bonus"))?;
        Ok(())
    }

    fn take(&mut self, points: Decimal) -> Decimal {
        let taken = points.min(self.balance);
        self.balance -= taken;
        taken
    }
}

fn ensure_positive(field: &'static str, value: Decimal) -> Result<(), Error> {
    if value <= Decimal::ZERO {
        return Err(Error::InvalidAmount { field, value });
    }
    Ok(())
}
