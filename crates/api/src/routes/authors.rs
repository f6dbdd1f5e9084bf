//! Author resource endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::Page;
use domain::{Author, AuthorPatch};
use listing::{AuthorFilterParams, ListParams};
use store::{FilterSet, Gateway};

use crate::error::ApiError;
use crate::routes::{AppState, CountResponse, MessageResponse};

/// POST /autores — create an author.
pub async fn create<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Json(author): Json<Author>,
) -> Result<(StatusCode, Json<Author>), ApiError> {
    let created = state.catalog.create(author).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /autores — paginated listing.
pub async fn list<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<Author>>, ApiError> {
    let page =
        listing::paginate::<Author, G>(&state.gateway, &FilterSet::new(), params.page()?).await?;
    Ok(Json(page))
}

/// GET /autores/{id} — load an author by id.
pub async fn get<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
) -> Result<Json<Author>, ApiError> {
    Ok(Json(state.catalog.get::<Author>(id).await?))
}

/// PATCH /autores/{id} — apply a partial update.
pub async fn update<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
    Json(patch): Json<AuthorPatch>,
) -> Result<Json<Author>, ApiError> {
    let updated = state
        .catalog
        .update::<Author>(id, patch.into_patch())
        .await?;
    Ok(Json(updated))
}

/// DELETE /autores/{id}
pub async fn remove<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.catalog.delete::<Author>(id).await?;
    Ok(Json(MessageResponse {
        message: "author deleted".to_string(),
    }))
}

/// GET /autores/contar
pub async fn count<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
) -> Result<Json<CountResponse>, ApiError> {
    let quantidade = state.catalog.count::<Author>(&FilterSet::new()).await?;
    Ok(Json(CountResponse { quantidade }))
}

/// GET /autores/filtrar — filtered, paginated listing.
pub async fn filter<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(params): Query<AuthorFilterParams>,
) -> Result<Json<Page<Author>>, ApiError> {
    let filters = params.filters()?;
    let page = listing::paginate::<Author, G>(&state.gateway, &filters, params.page()?).await?;
    Ok(Json(page))
}
