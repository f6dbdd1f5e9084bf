//! Declared referential rules for the in-memory gateway.
//!
//! The real schema lives in the migrations; this mirrors its constraints so
//! tests exercise the same uniqueness and deletion behavior as PostgreSQL.

use store::{ForeignKey, InMemoryGateway, OnDelete};

fn fk(
    table: &'static str,
    column: &'static str,
    references: &'static str,
    on_delete: OnDelete,
) -> ForeignKey {
    ForeignKey {
        table,
        column,
        references,
        on_delete,
    }
}

/// Builds an in-memory gateway carrying the bookstore schema's constraints:
/// dependents block deletion of the row they reference, except association
/// rows which cascade with their order.
pub fn memory_gateway() -> InMemoryGateway {
    InMemoryGateway::new()
        .with_unique("customers", "tax_id")
        .with_unique("payments", "order_id")
        .with_foreign_key(fk("books", "author_id", "authors", OnDelete::Restrict))
        .with_foreign_key(fk("books", "publisher_id", "publishers", OnDelete::Restrict))
        .with_foreign_key(fk("orders", "customer_id", "customers", OnDelete::Restrict))
        .with_foreign_key(fk("payments", "order_id", "orders", OnDelete::Restrict))
        .with_foreign_key(fk("order_books", "order_id", "orders", OnDelete::Cascade))
        .with_foreign_key(fk("order_books", "book_id", "books", OnDelete::Restrict))
}
