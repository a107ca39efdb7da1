use std::{
    borrow::Cow,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{LedgerOperation, LoyaltyConfig, Tier},
    ports::database::DatabasePort,
};
use rust_decimal::Decimal;
use tower::Service;
use tracing::{debug, warn};

use super::{DomainLogic, Error};

pub struct AddPointsRequest {
    pub name: String,
    pub event: AddPointsEvent,
}

#[derive(Clone, Debug)]
pub enum AddPointsEvent {
    /// The customer makes a purchase, optionally with a promotional discount
    ///
    /// The discount is the fraction of the price that is waived.
    Purchase {
        purchase_amount: Decimal,
        discount: Option<Decimal>,
    },
    /// Welcome points for a new customer
    Welcome,
    /// Manually adding points, e.g. for support
    Manual {
        loyalty_points: Decimal,
        reason: Option<String>,
    },
    /// Promotional campaign multiplying the current balance
    Bonus { multiplier: Decimal },
}

impl AddPointsEvent {
    pub fn reason(&self) -> Cow<'static, str> {
        match self {
            AddPointsEvent::Purchase { discount: None, .. } => "Purchase".into(),
            AddPointsEvent::Purchase {
                discount: Some(_), ..
            } => "Discounted purchase".into(),
            AddPointsEvent::Welcome => "Welcome points".into(),
            AddPointsEvent::Manual { reason, .. } => reason
                .as_ref()
                .cloned()
                .map(Into::into)
                .unwrap_or("Manual addition".into()),
            AddPointsEvent::Bonus { .. } => "Promotional bonus".into(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct AddPointsResponse {
    pub name: String,
    pub tier: Tier,
    /// Previous number of loyalty points
    pub old_loyalty_points: Decimal,
    /// New number of loyalty points
    pub new_loyalty_points: Decimal,
}

impl<D> Service<AddPointsRequest> for DomainLogic<D>
where
    D: DatabasePort + 'static,
{
    type Response = AddPointsResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: AddPointsRequest) -> Self::Future {
        let database = self.database.clone();
        let config = self.config.clone();
        Box::pin(async move {
            let operation = create_operation(&config, &req.event);
            let update = database
                .apply_operation(&req.name, operation)
                .await
                .map_err(|err| {
                    warn!(
                        customer = %req.name,
                        reason = %req.event.reason(),
                        error = %err,
                        "Rejected points addition"
                    );
                    err
                })?;

            debug!(
                customer = %req.name,
                reason = %req.event.reason(),
                points = %update.points,
                "Added loyalty points"
            );

            Ok(AddPointsResponse {
                name: req.name,
                tier: update.tier,
                old_loyalty_points: update.old_balance,
                new_loyalty_points: update.new_balance,
            })
        })
    }
}

fn create_operation(config: &LoyaltyConfig, input: &AddPointsEvent) -> LedgerOperation {
    match input {
        AddPointsEvent::Purchase {
            purchase_amount,
            discount,
        } => LedgerOperation::Purchase {
            amount: *purchase_amount,
            discount: *discount,
            calculator: config.calculator(),
        },
        AddPointsEvent::Welcome => LedgerOperation::Welcome {
            points: config.welcome_points,
        },
        AddPointsEvent::Manual { loyalty_points, .. } => LedgerOperation::Credit {
            points: *loyalty_points,
        },
        AddPointsEvent::Bonus { multiplier } => LedgerOperation::Bonus {
            multiplier: *multiplier,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::database::memory::MemoryDatabase,
        domain::{Customer, Error as DomainError},
        ports::database::{self as port, LedgerUpdate, MockDatabasePort},
    };
    use rstest::*;
    use rust_decimal_macros::dec;
    use speculoos::prelude::*;
    use std::sync::Arc;
    use tower::{BoxError, ServiceExt};

    #[fixture]
    fn config() -> LoyaltyConfig {
        LoyaltyConfig::default()
    }

    async fn domain_with(customer: Customer) -> Result<DomainLogic<MemoryDatabase>, BoxError> {
        let database = MemoryDatabase::default();
        database.add_customer(customer).await?;
        Ok(DomainLogic::new(
            Arc::new(database),
            Arc::new(LoyaltyConfig::default()),
        ))
    }

    fn purchase(amount: Decimal, discount: Option<Decimal>) -> AddPointsEvent {
        AddPointsEvent::Purchase {
            purchase_amount: amount,
            discount,
        }
    }

    /// Test all cases that map to a fixed operation regardless of tier
    #[rstest]
    #[case(AddPointsEvent::Welcome, LedgerOperation::Welcome { points: dec!(10) })]
    #[case(
        AddPointsEvent::Manual { loyalty_points: dec!(200), reason: None },
        LedgerOperation::Credit { points: dec!(200) }
    )]
    #[case(
        AddPointsEvent::Bonus { multiplier: dec!(1.2) },
        LedgerOperation::Bonus { multiplier: dec!(1.2) }
    )]
    fn test_create_operation_static(
        config: LoyaltyConfig,
        #[case] input: AddPointsEvent,
        #[case] expected: LedgerOperation,
    ) {
        // GIVEN a configuration and AddPointsEvent

        // WHEN calling `create_operation`
        let res = create_operation(&config, &input);

        // THEN it should match the expected operation
        assert_that!(res).is_equal_to(expected);
    }

    #[test]
    fn test_create_operation_purchase_uses_configured_table() {
        let config = LoyaltyConfig::from_json(r#"{"tier_multipliers": {"VIP": "4"}}"#).unwrap();

        let res = create_operation(&config, &purchase(dec!(10), Some(dec!(0.5))));

        assert_that!(res).matches(|operation| {
            matches!(
                operation,
                LedgerOperation::Purchase { amount, discount: Some(discount), calculator }
                    if *amount == dec!(10)
                        && *discount == dec!(0.5)
                        && calculator.multiplier(Tier::Vip) == dec!(4)
            )
        });
    }

    #[rstest]
    #[case(AddPointsEvent::Welcome, "Welcome points")]
    #[case(purchase(dec!(10), None), "Purchase")]
    #[case(purchase(dec!(10), Some(dec!(0.1))), "Discounted purchase")]
    #[case(AddPointsEvent::Manual { loyalty_points: dec!(1), reason: None }, "Manual addition")]
    #[case(
        AddPointsEvent::Manual { loyalty_points: dec!(1), reason: Some("Late delivery".to_string()) },
        "Late delivery"
    )]
    fn test_reason(#[case] input: AddPointsEvent, #[case] expected: &str) {
        assert_that!(input.reason().into_owned()).is_equal_to(expected.to_string());
    }

    /// Test purchases that generate a different number of points based on tier
    #[rstest]
    #[case(Tier::Standard, purchase(dec!(100), None), dec!(100))]
    #[case(Tier::Premium, purchase(dec!(100), None), dec!(150))]
    #[case(Tier::Vip, purchase(dec!(100), None), dec!(200))]
    #[case(Tier::Premium, purchase(dec!(10.50), None), dec!(15.75))]
    #[case(Tier::Standard, purchase(dec!(200), Some(dec!(0.6))), dec!(80))]
    #[case(Tier::Vip, purchase(dec!(100), Some(dec!(1))), dec!(0))]
    #[tokio::test]
    async fn test_call_purchase(
        #[case] tier: Tier,
        #[case] event: AddPointsEvent,
        #[case] expected: Decimal,
    ) -> Result<(), BoxError> {
        // GIVEN a new customer without points
        let domain = domain_with(Customer::new("Maria", tier)?).await?;

        // WHEN registering the purchase
        let req = AddPointsRequest {
            name: "Maria".to_string(),
            event,
        };
        let res = domain.clone().oneshot(req).await;

        // THEN the balance grows by the purchase points
        assert_that!(res).is_ok().is_equal_to(AddPointsResponse {
            name: "Maria".to_string(),
            tier,
            old_loyalty_points: dec!(0),
            new_loyalty_points: expected,
        });

        Ok(())
    }

    #[tokio::test]
    async fn test_call_bonus_after_purchase() -> Result<(), BoxError> {
        let domain = domain_with(Customer::new("Maria", Tier::Premium)?).await?;

        for event in [
            purchase(dec!(100), None),
            AddPointsEvent::Bonus {
                multiplier: dec!(1.2),
            },
        ] {
            domain
                .clone()
                .oneshot(AddPointsRequest {
                    name: "Maria".to_string(),
                    event,
                })
                .await?;
        }

        let stored = domain.database.get_customer("Maria").await?;
        assert_that!(stored.balance()).is_equal_to(dec!(180));

        Ok(())
    }

    #[tokio::test]
    async fn test_call_multiple_purchases() -> Result<(), BoxError> {
        let domain = domain_with(Customer::new("João", Tier::Standard)?).await?;

        for amount in [dec!(50), dec!(30), dec!(20)] {
            domain
                .clone()
                .oneshot(AddPointsRequest {
                    name: "João".to_string(),
                    event: purchase(amount, None),
                })
                .await?;
        }

        let stored = domain.database.get_customer("João").await?;
        assert_that!(stored.balance()).is_equal_to(dec!(100));

        Ok(())
    }

    #[rstest]
    #[case(purchase(dec!(0), None))]
    #[case(purchase(dec!(-10), None))]
    #[case(purchase(dec!(100), Some(dec!(0))))]
    #[case(purchase(dec!(100), Some(dec!(1.5))))]
    #[case(AddPointsEvent::Manual { loyalty_points: dec!(-5), reason: None })]
    #[case(AddPointsEvent::Bonus { multiplier: dec!(0) })]
    #[tokio::test]
    async fn test_call_rejected(#[case] event: AddPointsEvent) -> Result<(), BoxError> {
        // GIVEN a customer with existing points
        let domain =
            domain_with(Customer::with_points("Pedro", Tier::Vip, dec!(40))?).await?;

        // WHEN calling the service with an invalid event
        let req = AddPointsRequest {
            name: "Pedro".to_string(),
            event,
        };
        let res = domain.clone().oneshot(req).await;

        // THEN
        // * It returns a domain error
        // * The balance is unchanged
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::Database(port::Error::Domain(_))));
        let stored = domain.database.get_customer("Pedro").await?;
        assert_that!(stored.balance()).is_equal_to(dec!(40));

        Ok(())
    }

    #[tokio::test]
    async fn test_call_invalid_discount_kind() -> Result<(), BoxError> {
        let domain = domain_with(Customer::new("Pedro", Tier::Vip)?).await?;

        let req = AddPointsRequest {
            name: "Pedro".to_string(),
            event: purchase(dec!(100), Some(dec!(1.5))),
        };
        let res = domain.clone().oneshot(req).await;

        assert_that!(res).is_err().matches(|err| {
            matches!(
                err,
                Error::Database(port::Error::Domain(DomainError::InvalidDiscount(_)))
            )
        });

        Ok(())
    }

    #[rstest]
    #[tokio::test]
    async fn test_call_mock(config: LoyaltyConfig) -> Result<(), BoxError> {
        // GIVEN a database with an existing customer
        let mut database = MockDatabasePort::new();
        database
            .expect_apply_operation()
            .times(1)
            .withf(|name, operation| {
                name == "Rui" && *operation == LedgerOperation::Credit { points: dec!(45) }
            })
            .returning(|_, _| {
                Ok(LedgerUpdate {
                    tier: Tier::Premium,
                    old_balance: dec!(305),
                    new_balance: dec!(350),
                    points: dec!(45),
                })
            });
        let domain = DomainLogic::new(Arc::new(database), Arc::new(config));

        // WHEN calling the service
        let req = AddPointsRequest {
            name: "Rui".to_string(),
            event: AddPointsEvent::Manual {
                loyalty_points: dec!(45),
                reason: Some("Support ticket".to_string()),
            },
        };
        let res = domain.clone().oneshot(req).await;

        // THEN
        // * It returns a valid response
        // * The database port is called
        assert_that!(res).is_ok().is_equal_to(AddPointsResponse {
            name: "Rui".to_string(),
            tier: Tier::Premium,
            old_loyalty_points: dec!(305),
            new_loyalty_points: dec!(350),
        });
        Arc::into_inner(domain.database).unwrap().checkpoint();

        Ok(())
    }

    #[tokio::test]
    async fn test_call_missing_customer() -> Result<(), BoxError> {
        let domain = DomainLogic::new(
            Arc::new(MemoryDatabase::default()),
            Arc::new(LoyaltyConfig::default()),
        );

        let req = AddPointsRequest {
            name: "Nobody".to_string(),
            event: AddPointsEvent::Welcome,
        };
        let res = domain.clone().oneshot(req).await;

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::Database(port::Error::CustomerNotFound(_))));

        Ok(())
    }
}
