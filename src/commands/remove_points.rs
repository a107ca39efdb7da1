use std::{
    borrow::Cow,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use rust_decimal::Decimal;
use tower::Service;
use tracing::{debug, warn};

use crate::{domain::LedgerOperation, ports::database::DatabasePort};

use super::{DomainLogic, Error};

pub struct RemovePointsRequest {
    pub name: String,
    pub event: RemovePointsEvent,
}

#[derive(Clone, Copy, Debug)]
pub enum RemovePointsEvent {
    /// The customer trades points for a discount
    Redemption { loyalty_points: Decimal },
    /// Old points expire
    Expiration { loyalty_points: Decimal },
}

impl RemovePointsEvent {
    pub fn reason(&self) -> Cow<'static, str> {
        match self {
            RemovePointsEvent::Redemption { .. } => "Redemption".into(),
            RemovePointsEvent::Expiration { .. } => "Expiration".into(),
        }
    }
}

/// Result of a removal
///
/// Removals never fail for lack of points: the wallet gives up what it holds and
/// `removed_points` tells how much that was.
#[derive(Debug, PartialEq, Eq)]
pub struct RemovePointsResponse {
    pub name: String,
    pub removed_points: Decimal,
    /// Currency value of the redeemed points, zero for expirations
    pub discount_value: Decimal,
    pub old_loyalty_points: Decimal,
    pub new_loyalty_points: Decimal,
}

impl<D> Service<RemovePointsRequest> for DomainLogic<D>
where
    D: DatabasePort + 'static,
{
    type Response = RemovePointsResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: RemovePointsRequest) -> Self::Future {
        let database = self.database.clone();
        let config = self.config.clone();
        Box::pin(async move {
            let operation = match req.event {
                RemovePointsEvent::Redemption { loyalty_points } => LedgerOperation::Redeem {
                    points: loyalty_points,
                },
                RemovePointsEvent::Expiration { loyalty_points } => LedgerOperation::Expire {
                    points: loyalty_points,
                },
            };
            let update = database
                .apply_operation(&req.name, operation)
                .await
                .map_err(|err| {
                    warn!(
                        customer = %req.name,
                        reason = %req.event.reason(),
                        error = %err,
                        "Rejected points removal"
                    );
                    err
                })?;

            let discount_value = match req.event {
                RemovePointsEvent::Redemption { .. } => config.discount_value(update.points),
                RemovePointsEvent::Expiration { .. } => Decimal::ZERO,
            };
            debug!(
                customer = %req.name,
                reason = %req.event.reason(),
                points = %update.points,
                discount = %discount_value,
                "Removed loyalty points"
            );

            Ok(RemovePointsResponse {
                name: req.name,
                removed_points: update.points,
                discount_value,
                old_loyalty_points: update.old_balance,
                new_loyalty_points: update.new_balance,
            })
        })
    }
}
