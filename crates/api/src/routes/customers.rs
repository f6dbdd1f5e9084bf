//! Customer resource endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::Page;
use domain::{Customer, CustomerPatch};
use listing::{CustomerFilterParams, ListParams};
use store::{FilterSet, Gateway};

use crate::error::ApiError;
use crate::routes::{AppState, CountResponse, MessageResponse};

/// POST /usuarios — create a customer. The tax id must be unique.
pub async fn create<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Json(customer): Json<Customer>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let created = state.catalog.create(customer).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /usuarios
pub async fn list<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<Customer>>, ApiError> {
    let page =
        listing::paginate::<Customer, G>(&state.gateway, &FilterSet::new(), params.page()?)
            .await?;
    Ok(Json(page))
}

/// GET /usuarios/{id}
pub async fn get<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, ApiError> {
    Ok(Json(state.catalog.get::<Customer>(id).await?))
}

/// PATCH /usuarios/{id}
pub async fn update<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
    Json(patch): Json<CustomerPatch>,
) -> Result<Json<Customer>, ApiError> {
    let updated = state
        .catalog
        .update::<Customer>(id, patch.into_patch())
        .await?;
    Ok(Json(updated))
}

/// DELETE /usuarios/{id} — blocked while the customer still has orders.
pub async fn remove<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.catalog.delete::<Customer>(id).await?;
    Ok(Json(MessageResponse {
        message: "customer deleted".to_string(),
    }))
}

/// GET /usuarios/contar
pub async fn count<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
) -> Result<Json<CountResponse>, ApiError> {
    let quantidade = state.catalog.count::<Customer>(&FilterSet::new()).await?;
    Ok(Json(CountResponse { quantidade }))
}

/// GET /usuarios/filtrar
pub async fn filter<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(params): Query<CustomerFilterParams>,
) -> Result<Json<Page<Customer>>, ApiError> {
    let filters = params.filters()?;
    let page = listing::paginate::<Customer, G>(&state.gateway, &filters, params.page()?).await?;
    Ok(Json(page))
}
