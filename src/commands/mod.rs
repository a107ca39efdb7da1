use std::sync::Arc;

use crate::domain::{config::ConfigError, LoyaltyConfig};

pub mod add_points;
pub mod register_customer;
pub mod remove_customer;
pub mod remove_points;
pub mod report;

pub struct DomainLogic<D> {
    database: Arc<D>,
    config: Arc<LoyaltyConfig>,
}

impl<D> DomainLogic<D> {
    /// Build the service around an already validated configuration
    ///
    /// Configurations from [`LoyaltyConfig::from_json`] and
    /// [`LoyaltyConfig::default`] are valid. Use [`DomainLogic::try_new`] for
    /// anything built by hand.
    pub fn new(database: Arc<D>, config: Arc<LoyaltyConfig>) -> Self {
        Self { database, config }
    }

    pub fn try_new(database: Arc<D>, config: Arc<LoyaltyConfig>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(database, config))
    }
}

impl<D> Clone for DomainLogic<D> {
    fn clone(&self) -> Self {
        Self {
            database: self.database.clone(),
            config: self.config.clone(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("database port error: {0:?}")]
    Database(#[from] crate::ports::database::Error),

    #[error("invalid request: {0}")]
    Domain(#[from] crate::domain::Error),
}
