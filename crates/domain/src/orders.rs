//! Order aggregate manager.
//!
//! Owns creation, update and deletion of orders together with their book
//! associations and dependent payment. References are resolved before any
//! write, and the header plus its association rows commit as one atomic
//! unit, so a rejected request never leaves partial state behind.

use serde::Serialize;
use store::{Entity, FilterSet, Gateway, StoreError};

use crate::error::{DomainError, Result};
use crate::models::{Book, Customer, Order, OrderBookLink, OrderPatch};

/// Comparison of an order's stored total against its associated book
/// prices. The total is caller-supplied, so the two can drift.
#[derive(Debug, Clone, Serialize)]
pub struct TotalReconciliation {
    pub order_id: i64,
    pub stored: f64,
    pub computed: f64,
    pub matches: bool,
}

/// Service for managing orders as an aggregate: the header row, its
/// association rows, and the rules tying them to customers and payments.
#[derive(Clone)]
pub struct OrderService<G> {
    gateway: G,
}

impl<G: Gateway> OrderService<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Creates an order with its book associations.
    ///
    /// Every book id (and the customer, when given) must resolve before
    /// anything is written; the first missing reference fails the whole
    /// request. On success the stored association set equals the
    /// deduplicated requested set.
    #[tracing::instrument(skip(self, draft))]
    pub async fn create(&self, draft: Order, book_ids: &[i64]) -> Result<Order> {
        let mut wanted: Vec<i64> = book_ids.to_vec();
        wanted.sort_unstable();
        wanted.dedup();

        for &book_id in &wanted {
            if !self.gateway.exists::<Book>(book_id).await? {
                return Err(DomainError::MissingReference {
                    entity: Book::TABLE,
                    id: book_id,
                });
            }
        }
        if let Some(customer_id) = draft.customer_id
            && !self.gateway.exists::<Customer>(customer_id).await?
        {
            return Err(DomainError::MissingReference {
                entity: Customer::TABLE,
                id: customer_id,
            });
        }

        let created = self
            .gateway
            .insert_linked::<Order, OrderBookLink>(draft, &wanted)
            .await
            .map_err(DomainError::from_write)?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = created.id, books = wanted.len(), "order created");
        Ok(created)
    }

    /// Loads the raw order row.
    pub async fn get(&self, id: i64) -> Result<Order> {
        self.gateway
            .fetch::<Order>(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: Order::TABLE,
                id,
            })
    }

    /// The ids of the books associated with an order.
    pub async fn book_ids(&self, id: i64) -> Result<Vec<i64>> {
        Ok(self.gateway.linked_ids::<OrderBookLink>(id).await?)
    }

    /// Applies a partial update to the order's own scalar fields. Book
    /// associations and payment linkage are never touched here.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, id: i64, patch: OrderPatch) -> Result<Order> {
        if let Some(customer_id) = patch.customer_id
            && !self.gateway.exists::<Customer>(customer_id).await?
        {
            return Err(DomainError::MissingReference {
                entity: Customer::TABLE,
                id: customer_id,
            });
        }

        match self.gateway.update::<Order>(id, patch.into_patch()).await {
            Ok(Some(order)) => Ok(order),
            Ok(None) => Err(DomainError::NotFound {
                entity: Order::TABLE,
                id,
            }),
            Err(err) => Err(DomainError::from_write(err)),
        }
    }

    /// Deletes an order. Association rows cascade with it; a dependent
    /// payment blocks the removal.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        match self.gateway.delete::<Order>(id).await {
            Ok(true) => {
                metrics::counter!("orders_deleted_total").increment(1);
                Ok(())
            }
            Ok(false) => Err(DomainError::NotFound {
                entity: Order::TABLE,
                id,
            }),
            Err(StoreError::DependencyConflict { .. }) => Err(DomainError::DependencyConflict {
                entity: Order::TABLE,
                id,
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Counts orders, optionally restricted to one customer.
    pub async fn count(&self, customer_id: Option<i64>) -> Result<u64> {
        let filters = FilterSet::new().maybe_eq("customer_id", customer_id);
        Ok(self.gateway.count::<Order>(&filters).await?)
    }

    /// Compares the stored total against the sum of associated book prices,
    /// without changing anything.
    pub async fn reconcile_total(&self, id: i64) -> Result<TotalReconciliation> {
        let order = self.get(id).await?;
        let book_ids = self.book_ids(id).await?;
        let books = self.gateway.fetch_many::<Book>(&book_ids).await?;
        let computed: f64 = books.iter().map(|b| b.price).sum();
        let stored = order.total_value;
        Ok(TotalReconciliation {
            order_id: id,
            stored,
            computed,
            matches: (stored - computed).abs() < 0.005,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Payment;
    use crate::schema::memory_gateway;
    use chrono::NaiveDate;
    use store::InMemoryGateway;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn draft(customer_id: Option<i64>, total: f64) -> Order {
        Order {
            id: None,
            customer_id,
            order_date: date(10),
            status: "pending".to_string(),
            total_value: total,
        }
    }

    async fn seed_book(gw: &InMemoryGateway, title: &str, price: f64) -> i64 {
        gw.insert(Book {
            id: None,
            title: title.to_string(),
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

    async fn seed_customer(gw: &InMemoryGateway, tax_id: &str) -> i64 {
        gw.insert(Customer {
            id: None,
            name: "c".to_string(),
            email: "c@example.com".to_string(),
            tax_id: tax_id.to_string(),
            registration_date: date(1),
        })
        .await
        .unwrap()
        .id
        .unwrap()
    }

    #[tokio::test]
    async fn create_links_exactly_the_requested_books() {
        let gw = memory_gateway();
        let service = OrderService::new(gw.clone());
        let b1 = seed_book(&gw, "b1", 10.0).await;
        let b2 = seed_book(&gw, "b2", 20.0).await;

        let created = service.create(draft(None, 30.0), &[b2, b1]).await.unwrap();

        let linked = service.book_ids(created.id.unwrap()).await.unwrap();
        assert_eq!(linked, vec![b1, b2]);
    }

    #[tokio::test]
    async fn create_deduplicates_book_ids() {
        let gw = memory_gateway();
        let service = OrderService::new(gw.clone());
        let b1 = seed_book(&gw, "b1", 10.0).await;

        let created = service.create(draft(None, 10.0), &[b1, b1]).await.unwrap();

        let linked = service.book_ids(created.id.unwrap()).await.unwrap();
        assert_eq!(linked, vec![b1]);
    }

    #[tokio::test]
    async fn create_with_missing_book_leaves_no_order_behind() {
        let gw = memory_gateway();
        let service = OrderService::new(gw.clone());
        let b1 = seed_book(&gw, "b1", 10.0).await;

        let err = service
            .create(draft(None, 10.0), &[b1, 999])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::MissingReference {
                entity: "books",
                id: 999,
            }
        ));
        assert_eq!(service.count(None).await.unwrap(), 0);
        assert_eq!(gw.row_count("order_books").await, 0);
    }

    #[tokio::test]
    async fn create_with_missing_customer_is_rejected() {
        let gw = memory_gateway();
        let service = OrderService::new(gw);

        let err = service.create(draft(Some(77), 0.0), &[]).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::MissingReference {
                entity: "customers",
                id: 77,
            }
        ));
    }

    #[tokio::test]
    async fn create_with_empty_book_list_is_allowed() {
        let gw = memory_gateway();
        let service = OrderService::new(gw);

        let created = service.create(draft(None, 0.0), &[]).await.unwrap();
        assert!(service
            .book_ids(created.id.unwrap())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn update_touches_only_supplied_fields() {
        let gw = memory_gateway();
        let service = OrderService::new(gw.clone());
        let b1 = seed_book(&gw, "b1", 10.0).await;
        let created = service.create(draft(None, 10.0), &[b1]).await.unwrap();

        let patch = OrderPatch {
            status: Some("shipped".to_string()),
            ..OrderPatch::default()
        };
        let updated = service.update(created.id.unwrap(), patch).await.unwrap();

        assert_eq!(updated.status, "shipped");
        assert_eq!(updated.total_value, 10.0);
        assert_eq!(updated.order_date, created.order_date);
        // associations untouched
        let linked = service.book_ids(created.id.unwrap()).await.unwrap();
        assert_eq!(linked, vec![b1]);
    }

    #[tokio::test]
    async fn update_missing_order_is_not_found() {
        let service = OrderService::new(memory_gateway());
        let err = service.update(5, OrderPatch::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_with_payment_is_blocked_and_leaves_both_rows() {
        let gw = memory_gateway();
        let service = OrderService::new(gw.clone());
        let created = service.create(draft(None, 30.0), &[]).await.unwrap();
        let order_id = created.id.unwrap();

        gw.insert(Payment {
            id: None,
            order_id,
            payment_date: date(11),
            amount: 30.0,
            payment_method: "card".to_string(),
        })
        .await
        .unwrap();

        let err = service.delete(order_id).await.unwrap_err();
        assert!(matches!(err, DomainError::DependencyConflict { .. }));
        assert!(service.get(order_id).await.is_ok());
        assert_eq!(gw.row_count("payments").await, 1);
    }

    #[tokio::test]
    async fn delete_cascades_association_rows() {
        let gw = memory_gateway();
        let service = OrderService::new(gw.clone());
        let b1 = seed_book(&gw, "b1", 10.0).await;
        let created = service.create(draft(None, 10.0), &[b1]).await.unwrap();

        service.delete(created.id.unwrap()).await.unwrap();

        assert_eq!(gw.row_count("order_books").await, 0);
        assert!(gw.exists::<Book>(b1).await.unwrap());
    }

    #[tokio::test]
    async fn delete_missing_order_is_not_found() {
        let service = OrderService::new(memory_gateway());
        let err = service.delete(8).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn count_can_be_scoped_to_a_customer() {
        let gw = memory_gateway();
        let service = OrderService::new(gw.clone());
        let c1 = seed_customer(&gw, "111").await;
        let c2 = seed_customer(&gw, "222").await;

        service.create(draft(Some(c1), 1.0), &[]).await.unwrap();
        service.create(draft(Some(c1), 2.0), &[]).await.unwrap();
        service.create(draft(Some(c2), 3.0), &[]).await.unwrap();

        assert_eq!(service.count(None).await.unwrap(), 3);
        assert_eq!(service.count(Some(c1)).await.unwrap(), 2);
        assert_eq!(service.count(Some(c2)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn reconcile_total_reports_drift() {
        let gw = memory_gateway();
        let service = OrderService::new(gw.clone());
        let b1 = seed_book(&gw, "b1", 10.0).await;
        let b2 = seed_book(&gw, "b2", 20.0).await;

        let honest = service.create(draft(None, 30.0), &[b1, b2]).await.unwrap();
        let report = service.reconcile_total(honest.id.unwrap()).await.unwrap();
        assert!(report.matches);
        assert_eq!(report.computed, 30.0);

        let drifted = service.create(draft(None, 99.0), &[b1]).await.unwrap();
        let report = service.reconcile_total(drifted.id.unwrap()).await.unwrap();
        assert!(!report.matches);
        assert_eq!(report.stored, 99.0);
        assert_eq!(report.computed, 10.0);
    }
}
