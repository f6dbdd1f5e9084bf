//! Read-shaped order projections.

use std::collections::HashMap;

use chrono::NaiveDate;
use common::{Page, PageParams};
use domain::{Customer, Order, OrderBookLink, Payment};
use serde::Serialize;
use store::{FilterSet, Gateway};

use crate::error::ListingError;
use crate::page::paginate;

/// An order as the API returns it: the header fields plus eagerly-resolved
/// customer, payment and associated book ids.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub order_date: NaiveDate,
    pub status: String,
    pub total_value: f64,
    pub book_ids: Vec<i64>,
    pub customer: Option<Customer>,
    pub payment: Option<Payment>,
}

/// Query access to orders, assembling [`OrderView`] projections.
#[derive(Clone)]
pub struct OrderDirectory<G> {
    gateway: G,
}

impl<G: Gateway> OrderDirectory<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// A single order view, or `None` when the id does not exist.
    pub async fn get(&self, id: i64) -> Result<Option<OrderView>, ListingError> {
        let Some(order) = self.gateway.fetch::<Order>(id).await? else {
            return Ok(None);
        };
        let mut views = self.resolve(vec![order]).await?;
        Ok(views.pop())
    }

    /// One page of order views. Related records are resolved for the whole
    /// page at once, not per item.
    pub async fn page(
        &self,
        filters: &FilterSet,
        params: PageParams,
    ) -> Result<Page<OrderView>, ListingError> {
        let Page {
            page,
            limit,
            total,
            items,
        } = paginate::<Order, G>(&self.gateway, filters, params).await?;
        let items = self.resolve(items).await?;
        Ok(Page {
            page,
            limit,
            total,
            items,
        })
    }

    async fn resolve(&self, orders: Vec<Order>) -> Result<Vec<OrderView>, ListingError> {
        let order_ids: Vec<i64> = orders.iter().filter_map(|o| o.id).collect();

        let mut customer_ids: Vec<i64> = orders.iter().filter_map(|o| o.customer_id).collect();
        customer_ids.sort_unstable();
        customer_ids.dedup();
        let customers: HashMap<i64, Customer> = self
            .gateway
            .fetch_many::<Customer>(&customer_ids)
            .await?
            .into_iter()
            .filter_map(|c| c.id.map(|id| (id, c)))
            .collect();

        let payments: HashMap<i64, Payment> = if order_ids.is_empty() {
            HashMap::new()
        } else {
            self.gateway
                .find::<Payment>(
                    &FilterSet::new().any_of("order_id", order_ids.clone()),
                    None,
                )
                .await?
                .into_iter()
                .map(|p| (p.order_id, p))
                .collect()
        };

        let mut books_by_order: HashMap<i64, Vec<i64>> = HashMap::new();
        for (order_id, book_id) in self
            .gateway
            .linked_ids_many::<OrderBookLink>(&order_ids)
            .await?
        {
            books_by_order.entry(order_id).or_default().push(book_id);
        }

        Ok(orders
            .into_iter()
            .filter_map(|order| {
                let id = order.id?;
                Some(OrderView {
                    id,
                    customer: order
                        .customer_id
                        .and_then(|cid| customers.get(&cid).cloned()),
                    payment: payments.get(&id).cloned(),
                    book_ids: books_by_order.remove(&id).unwrap_or_default(),
                    customer_id: order.customer_id,
                    order_date: order.order_date,
                    status: order.status,
                    total_value: order.total_value,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use domain::{Book, OrderService, memory_gateway};
    use store::InMemoryGateway;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    async fn seed_customer(gw: &InMemoryGateway, tax_id: &str) -> i64 {
        gw.insert(Customer {
            id: None,
            name: "Clara".to_string(),
            email: "clara@example.com".to_string(),
            tax_id: tax_id.to_string(),
            registration_date: date(1),
        })
        .await
        .unwrap()
        .id
        .unwrap()
    }

    async fn seed_book(gw: &InMemoryGateway, price: f64) -> i64 {
        gw.insert(Book {
            id: None,
            title: "b".to_string(),
            price,
            genre: "fiction".to_string(),
            author_id: None,
            publisher_id: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
    }

    #[tokio::test]
    async fn views_resolve_customer_payment_and_books() {
        let gw = memory_gateway();
        let directory = OrderDirectory::new(gw.clone());
        let orders = OrderService::new(gw.clone());

        let customer_id = seed_customer(&gw, "111").await;
        let b1 = seed_book(&gw, 10.0).await;
        let b2 = seed_book(&gw, 20.0).await;

        let order = orders
            .create(
                Order {
                    id: None,
                    customer_id: Some(customer_id),
                    order_date: date(10),
                    status: "pending".to_string(),
                    total_value: 30.0,
                },
                &[b1, b2],
            )
            .await
            .unwrap();
        let order_id = order.id.unwrap();

        gw.insert(Payment {
            id: None,
            order_id,
            payment_date: date(11),
            amount: 30.0,
            payment_method: "card".to_string(),
        })
        .await
        .unwrap();

        let view = directory.get(order_id).await.unwrap().unwrap();
        assert_eq!(view.id, order_id);
        assert_eq!(view.book_ids, vec![b1, b2]);
        assert_eq!(
            view.customer.as_ref().and_then(|c| c.id),
            Some(customer_id)
        );
        assert_eq!(view.payment.as_ref().map(|p| p.order_id), Some(order_id));
        assert_eq!(view.total_value, 30.0);
    }

    #[tokio::test]
    async fn missing_order_yields_none() {
        let directory = OrderDirectory::new(memory_gateway());
        assert!(directory.get(12).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn page_resolves_relations_per_item() {
        let gw = memory_gateway();
        let directory = OrderDirectory::new(gw.clone());
        let orders = OrderService::new(gw.clone());

        let customer_id = seed_customer(&gw, "111").await;
        for total in [10.0, 20.0] {
            orders
                .create(
                    Order {
                        id: None,
                        customer_id: Some(customer_id),
                        order_date: date(10),
                        status: "pending".to_string(),
                        total_value: total,
                    },
                    &[],
                )
                .await
                .unwrap();
        }

        let page = directory
            .page(
                &FilterSet::new().eq("customer_id", customer_id),
                PageParams::default(),
            )
            .await
            .unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 2);
        for view in &page.items {
            assert!(view.customer.is_some());
            assert!(view.payment.is_none());
        }
    }

    #[tokio::test]
    async fn unmatched_filters_yield_empty_page() {
        let directory = OrderDirectory::new(memory_gateway());
        let page = directory
            .page(
                &FilterSet::new().contains("status", "shipped"),
                PageParams::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }
}
