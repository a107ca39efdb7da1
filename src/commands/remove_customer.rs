use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower::Service;
use tracing::info;

use crate::ports::database::DatabasePort;

use super::{DomainLogic, Error};

pub enum RemoveCustomerRequest {
    ByName(String),
    /// Every customer whose balance is exactly zero
    ZeroBalance,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RemoveCustomerResponse {
    /// Number of customers removed
    pub removed: usize,
    /// Number of customers left in the repository
    pub remaining: usize,
}

impl<D> Service<RemoveCustomerRequest> for DomainLogic<D>
where
    D: DatabasePort + 'static,
{
    type Response = RemoveCustomerResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: RemoveCustomerRequest) -> Self::Future {
        let database = self.database.clone();
        Box::pin(async move {
            let removed = match req {
                RemoveCustomerRequest::ByName(name) => {
                    let customer = database.remove_customer(&name).await?;
                    info!(customer = %name, points = %customer.balance(), "Removed customer");
                    1
                }
                RemoveCustomerRequest::ZeroBalance => {
                    let removed = database.remove_zero_balance().await?;
                    info!(removed, "Removed customers without points");
                    removed
                }
            };
            let remaining = database.list_customers().await?.len();

            Ok(RemoveCustomerResponse { removed, remaining })
        })
    }
}
