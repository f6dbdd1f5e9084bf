//! Domain layer for the bookstore backend.
//!
//! This crate provides the stored record types and the services that
//! operate on them:
//! - Entity definitions for the six resource kinds plus the order↔book
//!   association
//! - [`Catalog`], one generic service covering plain CRUD for every entity
//! - [`OrderService`], the order aggregate manager enforcing referential
//!   and lifecycle rules
//! - [`schema::memory_gateway`] wiring the in-memory gateway with the same
//!   constraints as the migrations

pub mod catalog;
pub mod error;
pub mod models;
pub mod orders;
pub mod schema;

pub use catalog::Catalog;
pub use error::{DomainError, Result};
pub use models::{
    Author, AuthorPatch, Book, BookPatch, Customer, CustomerPatch, Order, OrderBookLink,
    OrderPatch, Payment, PaymentPatch, Publisher, PublisherPatch,
};
pub use orders::{OrderService, TotalReconciliation};
pub use schema::memory_gateway;
