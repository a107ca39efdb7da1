//! In-memory loyalty points ledger
//!
//! Customers earn points from purchases at a rate set by their [`domain::Tier`],
//! redeem them for discounts, receive welcome and bonus points, and can have
//! points expired.
//!
//! * [`domain`] holds the pure rules: the [`domain::Wallet`] balance, the
//!   [`domain::PointsCalculator`] and the [`domain::Customer`] that ties them together.
//! * [`ports`] describes what the service layer needs from a customer repository.
//! * [`adapters`] provides an in-memory repository.
//! * [`commands`] exposes every use case as a [`tower::Service`].

pub mod adapters;
pub mod commands;
pub mod domain;
pub mod ports;
