//! Stored record types for the bookstore.
//!
//! Each entity carries its surrogate id as `Option<i64>`, `None` until the
//! store generates one. The `*Patch` types mirror the entities with every
//! field optional; only supplied fields are applied on update.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use store::{Entity, LinkTable, Patch, SqlValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub nationality: String,
    #[serde(default)]
    pub biography: Option<String>,
}

impl Entity for Author {
    const TABLE: &'static str = "authors";
    const COLUMNS: &'static [&'static str] =
        &["name", "email", "birth_date", "nationality", "biography"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    fn insert_values(&self) -> Vec<SqlValue> {
        vec![
            self.name.clone().into(),
            self.email.clone().into(),
            self.birth_date.into(),
            self.nationality.clone().into(),
            self.biography.clone().into(),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub biography: Option<String>,
}

impl AuthorPatch {
    pub fn into_patch(self) -> Patch {
        Patch::new()
            .maybe("name", self.name)
            .maybe("email", self.email)
            .maybe("birth_date", self.birth_date)
            .maybe("nationality", self.nationality)
            .maybe("biography", self.biography)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Publisher {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl Entity for Publisher {
    const TABLE: &'static str = "publishers";
    const COLUMNS: &'static [&'static str] = &["name", "address", "phone", "email"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    fn insert_values(&self) -> Vec<SqlValue> {
        vec![
            self.name.clone().into(),
            self.address.clone().into(),
            self.phone.clone().into(),
            self.email.clone().into(),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublisherPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl PublisherPatch {
    pub fn into_patch(self) -> Patch {
        Patch::new()
            .maybe("name", self.name)
            .maybe("address", self.address)
            .maybe("phone", self.phone)
            .maybe("email", self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub price: f64,
    pub genre: String,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub publisher_id: Option<i64>,
}

impl Entity for Book {
    const TABLE: &'static str = "books";
    const COLUMNS: &'static [&'static str] =
        &["title", "price", "genre", "author_id", "publisher_id"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    fn insert_values(&self) -> Vec<SqlValue> {
        vec![
            self.title.clone().into(),
            self.price.into(),
            self.genre.clone().into(),
            self.author_id.into(),
            self.publisher_id.into(),
        ]
    }

    fn validate(&self) -> Result<(), String> {
        if self.price < 0.0 {
            return Err(format!("price must be non-negative, got {}", self.price));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub genre: Option<String>,
    pub author_id: Option<i64>,
    pub publisher_id: Option<i64>,
}

impl BookPatch {
    pub fn into_patch(self) -> Patch {
        Patch::new()
            .maybe("title", self.title)
            .maybe("price", self.price)
            .maybe("genre", self.genre)
            .maybe("author_id", self.author_id)
            .maybe("publisher_id", self.publisher_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub tax_id: String,
    pub registration_date: NaiveDate,
}

impl Entity for Customer {
    const TABLE: &'static str = "customers";
    const COLUMNS: &'static [&'static str] = &["name", "email", "tax_id", "registration_date"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    fn insert_values(&self) -> Vec<SqlValue> {
        vec![
            self.name.clone().into(),
            self.email.clone().into(),
            self.tax_id.clone().into(),
            self.registration_date.into(),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub tax_id: Option<String>,
    pub registration_date: Option<NaiveDate>,
}

impl CustomerPatch {
    pub fn into_patch(self) -> Patch {
        Patch::new()
            .maybe("name", self.name)
            .maybe("email", self.email)
            .maybe("tax_id", self.tax_id)
            .maybe("registration_date", self.registration_date)
    }
}

/// An order header. Its book associations live in [`OrderBookLink`] rows and
/// its payment, if any, in [`Payment`]; `total_value` is caller-supplied,
/// not derived from the associated books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    pub order_date: NaiveDate,
    pub status: String,
    pub total_value: f64,
}

impl Entity for Order {
    const TABLE: &'static str = "orders";
    const COLUMNS: &'static [&'static str] =
        &["customer_id", "order_date", "status", "total_value"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    fn insert_values(&self) -> Vec<SqlValue> {
        vec![
            self.customer_id.into(),
            self.order_date.into(),
            self.status.clone().into(),
            self.total_value.into(),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPatch {
    pub customer_id: Option<i64>,
    pub order_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub total_value: Option<f64>,
}

impl OrderPatch {
    pub fn into_patch(self) -> Patch {
        Patch::new()
            .maybe("customer_id", self.customer_id)
            .maybe("order_date", self.order_date)
            .maybe("status", self.status)
            .maybe("total_value", self.total_value)
    }
}

/// Association row linking one order to one book. Owned by the order: the
/// rows are written alongside order creation and cascade on order deletion.
pub struct OrderBookLink;

impl LinkTable for OrderBookLink {
    const TABLE: &'static str = "order_books";
    const LEFT: &'static str = "order_id";
    const RIGHT: &'static str = "book_id";
}

/// A payment for exactly one order; `order_id` is unique at the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    #[serde(default)]
    pub id: Option<i64>,
    pub order_id: i64,
    pub payment_date: NaiveDate,
    pub amount: f64,
    pub payment_method: String,
}

impl Entity for Payment {
    const TABLE: &'static str = "payments";
    const COLUMNS: &'static [&'static str] =
        &["order_id", "payment_date", "amount", "payment_method"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    fn insert_values(&self) -> Vec<SqlValue> {
        vec![
            self.order_id.into(),
            self.payment_date.into(),
            self.amount.into(),
            self.payment_method.clone().into(),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentPatch {
    pub order_id: Option<i64>,
    pub payment_date: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
}

impl PaymentPatch {
    pub fn into_patch(self) -> Patch {
        Patch::new()
            .maybe("order_id", self.order_id)
            .maybe("payment_date", self.payment_date)
            .maybe("amount", self.amount)
            .maybe("payment_method", self.payment_method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_book_price_fails_validation() {
        let book = Book {
            id: None,
            title: "t".to_string(),
            price: -1.0,
            genre: "g".to_string(),
            author_id: None,
            publisher_id: None,
        };
        assert!(book.validate().is_err());
    }

    #[test]
    fn zero_book_price_is_allowed() {
        let book = Book {
            id: None,
            title: "t".to_string(),
            price: 0.0,
            genre: "g".to_string(),
            author_id: None,
            publisher_id: None,
        };
        assert!(book.validate().is_ok());
    }

    #[test]
    fn patch_only_carries_supplied_fields() {
        let patch = OrderPatch {
            status: Some("shipped".to_string()),
            ..OrderPatch::default()
        }
        .into_patch();

        assert_eq!(patch.sets().len(), 1);
        assert_eq!(patch.sets()[0].0, "status");
    }

    #[test]
    fn entity_columns_match_insert_values() {
        let order = Order {
            id: None,
            customer_id: Some(1),
            order_date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            status: "new".to_string(),
            total_value: 30.0,
        };
        assert_eq!(order.insert_values().len(), Order::COLUMNS.len());

        let payment = Payment {
            id: None,
            order_id: 1,
            payment_date: NaiveDate::from_ymd_opt(2025, 6, 11).unwrap(),
            amount: 30.0,
            payment_method: "pix".to_string(),
        };
        assert_eq!(payment.insert_values().len(), Payment::COLUMNS.len());
    }
}
