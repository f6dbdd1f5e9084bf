//! Payment resource endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::Page;
use domain::{Payment, PaymentPatch};
use listing::{ListParams, PaymentFilterParams};
use store::{FilterSet, Gateway};

use crate::error::ApiError;
use crate::routes::{AppState, CountResponse, MessageResponse};

/// POST /pagamentos — create a payment. The referenced order must exist and
/// must not already have one; both rules are store constraints.
pub async fn create<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Json(payment): Json<Payment>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    let created = state.catalog.create(payment).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /pagamentos
pub async fn list<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<Payment>>, ApiError> {
    let page =
        listing::paginate::<Payment, G>(&state.gateway, &FilterSet::new(), params.page()?).await?;
    Ok(Json(page))
}

/// GET /pagamentos/{id}
pub async fn get<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
) -> Result<Json<Payment>, ApiError> {
    Ok(Json(state.catalog.get::<Payment>(id).await?))
}

/// PATCH /pagamentos/{id}
pub async fn update<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
    Json(patch): Json<PaymentPatch>,
) -> Result<Json<Payment>, ApiError> {
    let updated = state
        .catalog
        .update::<Payment>(id, patch.into_patch())
        .await?;
    Ok(Json(updated))
}

/// DELETE /pagamentos/{id}
pub async fn remove<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.catalog.delete::<Payment>(id).await?;
    Ok(Json(MessageResponse {
        message: "payment deleted".to_string(),
    }))
}

/// GET /pagamentos/contar
pub async fn count<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
) -> Result<Json<CountResponse>, ApiError> {
    let quantidade = state.catalog.count::<Payment>(&FilterSet::new()).await?;
    Ok(Json(CountResponse { quantidade }))
}

/// GET /pagamentos/filtrar
pub async fn filter<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(params): Query<PaymentFilterParams>,
) -> Result<Json<Page<Payment>>, ApiError> {
    let filters = params.filters()?;
    let page = listing::paginate::<Payment, G>(&state.gateway, &filters, params.page()?).await?;
    Ok(Json(page))
}
