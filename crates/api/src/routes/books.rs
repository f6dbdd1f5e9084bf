//! Book resource endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::Page;
use domain::{Book, BookPatch};
use listing::{BookFilterParams, ListParams};
use store::{FilterSet, Gateway};

use crate::error::ApiError;
use crate::routes::{AppState, CountResponse, MessageResponse};

/// POST /livros — create a book. Author and publisher references, when
/// given, must exist; the price may not be negative.
pub async fn create<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Json(book): Json<Book>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let created = state.catalog.create(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /livros
pub async fn list<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<Book>>, ApiError> {
    let page =
        listing::paginate::<Book, G>(&state.gateway, &FilterSet::new(), params.page()?).await?;
    Ok(Json(page))
}

/// GET /livros/{id}
pub async fn get<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
) -> Result<Json<Book>, ApiError> {
    Ok(Json(state.catalog.get::<Book>(id).await?))
}

/// PATCH /livros/{id}
pub async fn update<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
    Json(patch): Json<BookPatch>,
) -> Result<Json<Book>, ApiError> {
    let updated = state.catalog.update::<Book>(id, patch.into_patch()).await?;
    Ok(Json(updated))
}

/// DELETE /livros/{id} — blocked while any order still references the book.
pub async fn remove<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.catalog.delete::<Book>(id).await?;
    Ok(Json(MessageResponse {
        message: "book deleted".to_string(),
    }))
}

/// GET /livros/contar
pub async fn count<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
) -> Result<Json<CountResponse>, ApiError> {
    let quantidade = state.catalog.count::<Book>(&FilterSet::new()).await?;
    Ok(Json(CountResponse { quantidade }))
}

/// GET /livros/filtrar — substring match on title/genre, exact match on
/// author/publisher ids, inclusive price range.
pub async fn filter<G: Gateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(params): Query<BookFilterParams>,
) -> Result<Json<Page<Book>>, ApiError> {
    let page =
        listing::paginate::<Book, G>(&state.gateway, &params.filters(), params.page()?).await?;
    Ok(Json(page))
}
