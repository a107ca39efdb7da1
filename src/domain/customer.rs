use rust_decimal::Decimal;

use super::{Error, PointsCalculator, Tier, Wallet};

/// A loyalty program member and their points wallet
#[derive(Clone, Debug, PartialEq)]
pub struct Customer {
    /// Name of the customer
    ///
    /// Repositories use it as the lookup key.
    name: String,
    /// Fixed at registration time
    tier: Tier,
    wallet: Wallet,
}

impl Customer {
    pub fn new(name: impl Into<String>, tier: Tier) -> Result<Self, Error> {
        Self::with_wallet(name.into(), tier, Wallet::new())
    }

    /// Create a customer whose wallet starts with `initial_points`
    pub fn with_points(
        name: impl Into<String>,
        tier: Tier,
        initial_points: Decimal,
    ) -> Result<Self, Error> {
        Self::with_wallet(name.into(), tier, Wallet::with_balance(initial_points)?)
    }

    fn with_wallet(name: String, tier: Tier, wallet: Wallet) -> Result<Self, Error> {
        if name.trim().is_empty() {
            return Err(Error::InvalidName);
        }
        Ok(Self { name, tier, wallet })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn balance(&self) -> Decimal {
        self.wallet.balance()
    }

    /// Register a purchase and credit the points it earns
    ///
    /// Returns the number of points credited. A free purchase (discount of exactly
    /// `1`) earns zero points and is not an error; any other purchase must leave a
    /// strictly positive amount to pay.
    ///
    /// The purchase amount must be positive even when the discount is `1`: a zero
    /// or negative amount is rejected with [`Error::InvalidAmount`].
    pub fn register_purchase(
        &mut self,
        calculator: &PointsCalculator,
        amount: Decimal,
        discount: Option<Decimal>,
    ) -> Result<Decimal, Error> {
        let amount = match discount {
            Some(discount) => {
                let discounted = calculator.apply_discount(amount, discount)?;
                if discount == Decimal::ONE && amount > Decimal::ZERO {
                    return Ok(Decimal::ZERO);
                }
                discounted
            }
            None => amount,
        };
        self.wallet.credit_from_purchase(calculator, amount, self.tier)
    }

    /// Credit welcome points, bypassing the tier multiplier
    pub fn grant_welcome_points(&mut self, points: Decimal) -> Result<Decimal, Error> {
        self.wallet.credit(points)?;
        Ok(points)
    }

    pub fn redeem_points(&mut self, points: Decimal) -> Result<Decimal, Error> {
        self.wallet.redeem(points)
    }

    pub fn expire_points(&mut self, points: Decimal) -> Result<Decimal, Error> {
        self.wallet.decay(points)
    }

    /// Multiply the current balance, returning the points gained or lost
    pub fn apply_bonus(&mut self, multiplier: Decimal) -> Result<Decimal, Error> {
        let before = self.wallet.balance();
        self.wallet.apply_bonus(multiplier)?;
        Ok(self.wallet.balance() - before)
    }

    pub fn credit_points(&mut self, points: Decimal) -> Result<Decimal, Error> {
        self.wallet.credit(points)?;
        Ok(points)
    }
}

/// One mutation of a customer's balance
///
/// Repositories apply these atomically to a stored [`Customer`].
#[derive(Clone, Debug, PartialEq)]
pub enum LedgerOperation {
    Purchase {
        amount: Decimal,
        discount: Option<Decimal>,
        calculator: PointsCalculator,
    },
    Welcome {
        points: Decimal,
    },
    /// Direct credit, e.g. from customer support
    Credit {
        points: Decimal,
    },
    Bonus {
        multiplier: Decimal,
    },
    Redeem {
        points: Decimal,
    },
    Expire {
        points: Decimal,
    },
}

impl LedgerOperation {
    /// Apply the operation, returning the number of points it moved
    pub fn apply(&self, customer: &mut Customer) -> Result<Decimal, Error> {
        match self {
            LedgerOperation::Purchase {
                amount,
                discount,
                calculator,
            } => customer.register_purchase(calculator, *amount, *discount),
            LedgerOperation::Welcome { points } => customer.grant_welcome_points(*points),
            LedgerOperation::Credit { points } => customer.credit_points(*points),
            LedgerOperation::Bonus { multiplier } => customer.apply_bonus(*multiplier),
            LedgerOperation::Redeem { points } => customer.redeem_points(*points),
            LedgerOperation::Expire { points } => customer.expire_points(*points),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LedgerOperation::Purchase { .. } => "purchase",
            LedgerOperation::Welcome { .. } => "welcome",
            LedgerOperation::Credit { .. } => "credit",
            LedgerOperation::Bonus { .. } => "bonus",
            LedgerOperation::Redeem { .. } => "redeem",
            LedgerOperation::Expire { .. } => "expire",
        }
    }
}
