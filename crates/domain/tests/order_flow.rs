//! End-to-end flow over the order aggregate: customer, books, order with
//! associations, payment, and the one-payment-per-order rule.

use chrono::NaiveDate;
use domain::{Book, Catalog, Customer, DomainError, Order, OrderService, Payment, memory_gateway};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

#[tokio::test]
async fn full_order_lifecycle() {
    let gateway = memory_gateway();
    let catalog = Catalog::new(gateway.clone());
    let orders = OrderService::new(gateway.clone());

    // Customer and two books
    let c1 = catalog
        .create(Customer {
            id: None,
            name: "Clara".to_string(),
            email: "clara@example.com".to_string(),
            tax_id: "123.456.789-00".to_string(),
            registration_date: date(1),
        })
        .await
        .unwrap();

    let b1 = catalog
        .create(Book {
            id: None,
            title: "First".to_string(),
            price: 10.0,
            genre: "fiction".to_string(),
            author_id: None,
            publisher_id: None,
        })
        .await
        .unwrap();
    let b2 = catalog
        .create(Book {
            id: None,
            title: "Second".to_string(),
            price: 20.0,
            genre: "fiction".to_string(),
            author_id: None,
            publisher_id: None,
        })
        .await
        .unwrap();

    // Order for both books
    let o1 = orders
        .create(
            Order {
                id: None,
                customer_id: c1.id,
                order_date: date(10),
                status: "pending".to_string(),
                total_value: 30.0,
            },
            &[b1.id.unwrap(), b2.id.unwrap()],
        )
        .await
        .unwrap();
    let order_id = o1.id.unwrap();

    // Fetching it back yields the same scalar fields and book id set
    let fetched = orders.get(order_id).await.unwrap();
    assert_eq!(fetched, o1);
    assert_eq!(
        orders.book_ids(order_id).await.unwrap(),
        vec![b1.id.unwrap(), b2.id.unwrap()]
    );

    let report = orders.reconcile_total(order_id).await.unwrap();
    assert!(report.matches);

    // First payment succeeds, second violates the one-to-one constraint
    catalog
        .create(Payment {
            id: None,
            order_id,
            payment_date: date(11),
            amount: 30.0,
            payment_method: "card".to_string(),
        })
        .await
        .unwrap();

    let second = catalog
        .create(Payment {
            id: None,
            order_id,
            payment_date: date(12),
            amount: 30.0,
            payment_method: "pix".to_string(),
        })
        .await;
    assert!(matches!(second, Err(DomainError::Constraint { .. })));

    // The payment now blocks deletion of the order
    let blocked = orders.delete(order_id).await;
    assert!(matches!(blocked, Err(DomainError::DependencyConflict { .. })));
    assert!(orders.get(order_id).await.is_ok());
}
