//! HTTP route handlers, one module per resource.

pub mod authors;
pub mod books;
pub mod customers;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod payments;
pub mod publishers;

use domain::{Catalog, OrderService};
use listing::OrderDirectory;
use serde::Serialize;
use store::Gateway;

/// Shared application state accessible from all handlers.
pub struct AppState<G: Gateway> {
    pub catalog: Catalog<G>,
    pub orders: OrderService<G>,
    pub directory: OrderDirectory<G>,
    pub gateway: G,
}

/// Body of every count endpoint.
#[derive(Serialize)]
pub struct CountResponse {
    pub quantidade: u64,
}

/// Confirmation body for deletions.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}
