//! HTTP API server for the bookstore backend.
//!
//! REST endpoints for authors, publishers, books, customers, orders and
//! payments, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{delete, get, patch, post};
use domain::{Catalog, OrderService};
use listing::OrderDirectory;
use metrics_exporter_prometheus::PrometheusHandle;
use store::Gateway;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the application state over any gateway implementation.
pub fn create_state<G: Gateway + Clone + 'static>(gateway: G) -> Arc<AppState<G>> {
    Arc::new(AppState {
        catalog: Catalog::new(gateway.clone()),
        orders: OrderService::new(gateway.clone()),
        directory: OrderDirectory::new(gateway.clone()),
        gateway,
    })
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<G: Gateway + Clone + 'static>(
    state: Arc<AppState<G>>,
    metrics_handle: PrometheusHandle,
    request_timeout: Duration,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/autores", post(routes::authors::create::<G>))
        .route("/autores", get(routes::authors::list::<G>))
        .route("/autores/contar", get(routes::authors::count::<G>))
        .route("/autores/filtrar", get(routes::authors::filter::<G>))
        .route("/autores/{id}", get(routes::authors::get::<G>))
        .route("/autores/{id}", patch(routes::authors::update::<G>))
        .route("/autores/{id}", delete(routes::authors::remove::<G>))
        .route("/editoras", post(routes::publishers::create::<G>))
        .route("/editoras", get(routes::publishers::list::<G>))
        .route("/editoras/contar", get(routes::publishers::count::<G>))
        .route("/editoras/filtrar", get(routes::publishers::filter::<G>))
        .route("/editoras/{id}", get(routes::publishers::get::<G>))
        .route("/editoras/{id}", patch(routes::publishers::update::<G>))
        .route("/editoras/{id}", delete(routes::publishers::remove::<G>))
        .route("/livros", post(routes::books::create::<G>))
        .route("/livros", get(routes::books::list::<G>))
        .route("/livros/contar", get(routes::books::count::<G>))
        .route("/livros/filtrar", get(routes::books::filter::<G>))
        .route("/livros/{id}", get(routes::books::get::<G>))
        .route("/livros/{id}", patch(routes::books::update::<G>))
        .route("/livros/{id}", delete(routes::books::remove::<G>))
        .route("/usuarios", post(routes::customers::create::<G>))
        .route("/usuarios", get(routes::customers::list::<G>))
        .route("/usuarios/contar", get(routes::customers::count::<G>))
        .route("/usuarios/filtrar", get(routes::customers::filter::<G>))
        .route("/usuarios/{id}", get(routes::customers::get::<G>))
        .route("/usuarios/{id}", patch(routes::customers::update::<G>))
        .route("/usuarios/{id}", delete(routes::customers::remove::<G>))
        .route("/pedidos", post(routes::orders::create::<G>))
        .route("/pedidos", get(routes::orders::list::<G>))
        .route("/pedidos/contar", get(routes::orders::count::<G>))
        .route("/pedidos/filtrar", get(routes::orders::filter::<G>))
        .route("/pedidos/{id}", get(routes::orders::get::<G>))
        .route("/pedidos/{id}", patch(routes::orders::update::<G>))
        .route("/pedidos/{id}", delete(routes::orders::remove::<G>))
        .route("/pedidos/{id}/total", get(routes::orders::total::<G>))
        .route("/pagamentos", post(routes::payments::create::<G>))
        .route("/pagamentos", get(routes::payments::list::<G>))
        .route("/pagamentos/contar", get(routes::payments::count::<G>))
        .route("/pagamentos/filtrar", get(routes::payments::filter::<G>))
        .route("/pagamentos/{id}", get(routes::payments::get::<G>))
        .route("/pagamentos/{id}", patch(routes::payments::update::<G>))
        .route("/pagamentos/{id}", delete(routes::payments::remove::<G>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
}
