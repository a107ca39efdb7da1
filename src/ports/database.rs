use rust_decimal::Decimal;

use crate::domain::{Customer, LedgerOperation, Tier};

#[mockall::automock]
#[async_trait::async_trait]
pub trait DatabasePort {
    async fn add_customer(&self, customer: Customer) -> Result<(), Error>;
    async fn get_customer(&self, name: &str) -> Result<Customer, Error>;
    /// All stored customers, in insertion order
    async fn list_customers(&self) -> Result<Vec<Customer>, Error>;
    /// Apply a single balance mutation to a stored customer
    ///
    /// The operation is applied atomically: on error, the stored customer is unchanged.
    async fn apply_operation(
        &self,
        name: &str,
        operation: LedgerOperation,
    ) -> Result<LedgerUpdate, Error>;
    async fn remove_customer(&self, name: &str) -> Result<Customer, Error>;
    /// Remove every customer without points, returning how many were removed
    async fn remove_zero_balance(&self) -> Result<usize, Error>;
}

/// Outcome of a [`LedgerOperation`] applied to a stored customer
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerUpdate {
    pub tier: Tier,
    pub old_balance: Decimal,
    pub new_balance: Decimal,
    /// Points moved by the operation
    pub points: Decimal,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("customer {0:?} does not exist")]
    CustomerNotFound(String),

    /// Names are lookup keys, two customers cannot share one
    #[error("customer {0:?} already exists")]
    DuplicateCustomer(String),

    /// The operation was rejected by the domain rules
    #[error("rejected operation: {0}")]
    Domain(#[from] crate::domain::Error),

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as connectivity, configuration, or permission errors.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
