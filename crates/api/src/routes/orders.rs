//! Order endpoints: aggregate writes plus read-shaped listings.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use common::Page;
use domain::{Order, OrderPatch, TotalReconciliation};
use listing::{OrderFilterParams, OrderListParams, OrderView};
use serde::Deserialize;
use store::Gateway;

use crate::error::ApiError;
use crate::routes::{AppState, CountResponse, MessageResponse};

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: Option<i64>,
    pub order_date: NaiveDate,
    pub status: String,
    pub total_value: f64,
    #[serde(default)]
    pub book_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CountParams {
    pub customer_id: Option<i64>,
}

/// POST /pedidos — create an order with its book associations.
///
/// A book id that does not resolve fails the whole request; no header or
/// association row survives.
#[tracing::instrument(skip(state, req))]
pub async fn create<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderView>), ApiError> {
    let draft = Order {
        id: None,
        customer_id: req.customer_id,
        order_date: req.order_date,
        status: req.status,
        total_value: req.total_value,
    };
    let created = state.orders.create(draft, &req.book_ids).await?;

    let Some(id) = created.id else {
        return Err(ApiError::Internal(
            "created order has no generated id".to_string(),
        ));
    };
    let view = state
        .directory
        .get(id)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("order {id} not readable after creation")))?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /pedidos/{id} — read-shaped projection of one order.
#[tracing::instrument(skip(state))]
pub async fn get<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
) -> Result<Json<OrderView>, ApiError> {
    let view = state
        .directory
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("order {id} not found")))?;
    Ok(Json(view))
}

/// PATCH /pedidos/{id} — partial update of the order's scalar fields.
#[tracing::instrument(skip(state, patch))]
pub async fn update<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
    Json(patch): Json<OrderPatch>,
) -> Result<Json<Order>, ApiError> {
    let updated = state.orders.update(id, patch).await?;
    Ok(Json(updated))
}

/// GET /pedidos — paginated listing, optionally scoped to one customer.
/// Items eagerly include the customer, payment and book ids.
#[tracing::instrument(skip(state))]
pub async fn list<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(params): Query<OrderListParams>,
) -> Result<Json<Page<OrderView>>, ApiError> {
    let page = state
        .directory
        .page(&params.filters(), params.page()?)
        .await?;
    Ok(Json(page))
}

/// GET /pedidos/contar — count, optionally scoped to one customer.
#[tracing::instrument(skip(state))]
pub async fn count<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(params): Query<CountParams>,
) -> Result<Json<CountResponse>, ApiError> {
    let quantidade = state.orders.count(params.customer_id).await?;
    Ok(Json(CountResponse { quantidade }))
}

/// DELETE /pedidos/{id} — association rows cascade; a dependent payment
/// blocks the removal.
#[tracing::instrument(skip(state))]
pub async fn remove<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.orders.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "order deleted".to_string(),
    }))
}

/// GET /pedidos/filtrar — conjunctive filters plus pagination.
#[tracing::instrument(skip(state))]
pub async fn filter<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(params): Query<OrderFilterParams>,
) -> Result<Json<Page<OrderView>>, ApiError> {
    let filters = params.filters()?;
    let page = state.directory.page(&filters, params.page()?).await?;
    Ok(Json(page))
}

/// GET /pedidos/{id}/total — compare the stored total against the sum of
/// associated book prices.
#[tracing::instrument(skip(state))]
pub async fn total<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
) -> Result<Json<TotalReconciliation>, ApiError> {
    let report = state.orders.reconcile_total(id).await?;
    Ok(Json(report))
}
