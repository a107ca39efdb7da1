//! Read-only views over a list of customers

use rust_decimal::Decimal;

use super::{Customer, Error, Tier};

/// Balance of a single customer at the time the report was built
#[derive(Clone, Debug, PartialEq)]
pub struct CustomerPoints {
    pub name: String,
    pub tier: Tier,
    pub points: Decimal,
}

impl From<&Customer> for CustomerPoints {
    fn from(customer: &Customer) -> Self {
        Self {
            name: customer.name().to_string(),
            tier: customer.tier(),
            points: customer.balance(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RankingEntry {
    /// 1-based position, highest balance first
    pub position: usize,
    pub customer: CustomerPoints,
}

pub fn points_by_customer(customers: &[Customer]) -> Vec<CustomerPoints> {
    customers.iter().map(CustomerPoints::from).collect()
}

/// Customers holding strictly more than `limit` points
pub fn filter_above(customers: &[Customer], limit: Decimal) -> Vec<&Customer> {
    customers
        .iter()
        .filter(|customer| customer.balance() > limit)
        .collect()
}

/// Customers ordered by balance, highest first
///
/// Customers with the same balance keep their relative order.
pub fn sort_by_points(customers: &[Customer]) -> Vec<&Customer> {
    let mut sorted: Vec<&Customer> = customers.iter().collect();
    sorted.sort_by(|a, b| b.balance().cmp(&a.balance()));
    sorted
}

pub fn total_points(customers: &[Customer]) -> Result<Decimal, Error> {
    customers
        .iter()
        .map(Customer::balance)
        .try_fold(Decimal::ZERO, |total, points| total.checked_add(points))
        .ok_or(Error::Overflow("total points"))
}

pub fn ranking(customers: &[Customer]) -> Vec<RankingEntry> {
    sort_by_points(customers)
        .into_iter()
        .enumerate()
        .map(|(index, customer)| RankingEntry {
            position: index + 1,
            customer: customer.into(),
        })
        .collect()
}
