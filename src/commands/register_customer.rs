use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use rust_decimal::Decimal;
use tower::Service;
use tracing::{info, warn};

use crate::{
    domain::{Customer, Tier},
    ports::database::DatabasePort,
};

use super::{DomainLogic, Error};

pub struct RegisterCustomerRequest {
    pub name: String,
    pub tier: Tier,
    /// Points the wallet starts with, e.g. when migrating an existing member
    pub initial_points: Option<Decimal>,
    /// Grant the configured welcome points before storing the customer
    pub welcome_points: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RegisterCustomerResponse {
    pub name: String,
    pub tier: Tier,
    pub points: Decimal,
}

impl<D> Service<RegisterCustomerRequest> for DomainLogic<D>
where
    D: DatabasePort + 'static,
{
    type Response = RegisterCustomerResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: RegisterCustomerRequest) -> Self::Future {
        let database = self.database.clone();
        let config = self.config.clone();
        Box::pin(async move {
            let customer = match req.initial_points {
                Some(points) => Customer::with_points(req.name, req.tier, points),
                None => Customer::new(req.name, req.tier),
            }
            .and_then(|mut customer| {
                // A program without welcome points has nothing to grant
                if req.welcome_points && config.welcome_points > Decimal::ZERO {
                    customer.grant_welcome_points(config.welcome_points)?;
                }
                Ok(customer)
            })
            .map_err(|err| {
                warn!(error = %err, "Rejected customer registration");
                err
            })?;

            let name = customer.name().to_string();
            let points = customer.balance();
            database.add_customer(customer).await?;
            info!(customer = %name, tier = %req.tier, points = %points, "Registered customer");

            Ok(RegisterCustomerResponse {
                name,
                tier: req.tier,
                points,
            })
        })
    }
}
