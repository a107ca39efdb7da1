use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use rust_decimal::Decimal;
use tower::Service;

use crate::{
    domain::{
        report::{self, CustomerPoints, RankingEntry},
        Customer,
    },
    ports::database::DatabasePort,
};

use super::{DomainLogic, Error};

pub enum ReportRequest {
    /// Current balance of a single customer
    Balance(String),
    /// Balance of every customer, in registration order
    PointsByCustomer,
    /// Customers holding strictly more than the given number of points
    AboveThreshold(Decimal),
    SortedByPoints,
    TotalPoints,
    Ranking,
}

#[derive(Debug, PartialEq)]
pub enum ReportResponse {
    Balance(CustomerPoints),
    Customers(Vec<CustomerPoints>),
    TotalPoints(Decimal),
    Ranking(Vec<RankingEntry>),
}

impl<D> Service<ReportRequest> for DomainLogic<D>
where
    D: DatabasePort + 'static,
{
    type Response = ReportResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ReportRequest) -> Self::Future {
        let database = self.database.clone();
        Box::pin(async move {
            let response = match req {
                ReportRequest::Balance(name) => {
                    let customer = database.get_customer(&name).await?;
                    ReportResponse::Balance((&customer).into())
                }
                ReportRequest::PointsByCustomer => {
                    let customers = database.list_customers().await?;
                    ReportResponse::Customers(report::points_by_customer(&customers))
                }
                ReportRequest::AboveThreshold(limit) => {
                    let customers = database.list_customers().await?;
                    ReportResponse::Customers(summarize(report::filter_above(&customers, limit)))
                }
                ReportRequest::SortedByPoints => {
                    let customers = database.list_customers().await?;
                    ReportResponse::Customers(summarize(report::sort_by_points(&customers)))
                }
                ReportRequest::TotalPoints => {
                    let customers = database.list_customers().await?;
                    ReportResponse::TotalPoints(report::total_points(&customers)?)
                }
                ReportRequest::Ranking => {
                    let customers = database.list_customers().await?;
                    ReportResponse::Ranking(report::ranking(&customers))
                }
            };
            Ok(response)
        })
    }
}

fn summarize(customers: Vec<&Customer>) -> Vec<CustomerPoints> {
    customers.into_iter().map(CustomerPoints::from).collect()
}
