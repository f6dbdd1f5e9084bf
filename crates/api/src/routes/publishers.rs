//! Publisher resource endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::Page;
use domain::{Publisher, PublisherPatch};
use listing::{ListParams, PublisherFilterParams};
use store::{FilterSet, Gateway};

use crate::error::ApiError;
use crate::routes::{AppState, CountResponse, MessageResponse};

/// POST /editoras
pub async fn create<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Json(publisher): Json<Publisher>,
) -> Result<(StatusCode, Json<Publisher>), ApiError> {
    let created = state.catalog.create(publisher).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /editoras
pub async fn list<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<Publisher>>, ApiError> {
    let page =
        listing::paginate::<Publisher, G>(&state.gateway, &FilterSet::new(), params.page()?)
            .await?;
    Ok(Json(page))
}

/// GET /editoras/{id}
pub async fn get<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
) -> Result<Json<Publisher>, ApiError> {
    Ok(Json(state.catalog.get::<Publisher>(id).await?))
}

/// PATCH /editoras/{id}
pub async fn update<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
    Json(patch): Json<PublisherPatch>,
) -> Result<Json<Publisher>, ApiError> {
    let updated = state
        .catalog
        .update::<Publisher>(id, patch.into_patch())
        .await?;
    Ok(Json(updated))
}

/// DELETE /editoras/{id}
pub async fn remove<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.catalog.delete::<Publisher>(id).await?;
    Ok(Json(MessageResponse {
        message: "publisher deleted".to_string(),
    }))
}

/// GET /editoras/contar
pub async fn count<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
) -> Result<Json<CountResponse>, ApiError> {
    let quantidade = state.catalog.count::<Publisher>(&FilterSet::new()).await?;
    Ok(Json(CountResponse { quantidade }))
}

/// GET /editoras/filtrar
pub async fn filter<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(params): Query<PublisherFilterParams>,
) -> Result<Json<Page<Publisher>>, ApiError> {
    let page = listing::paginate::<Publisher, G>(&state.gateway, &params.filters(), params.page()?)
        .await?;
    Ok(Json(page))
}
