use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    dto::MessageResponse,
    error::AppResult,
    extract::{ApiJson, ApiPath},
    state::AppState,
};

use super::dto::{CreateCategoryRequest, RenameCategoryRequest};
use super::services;

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/:name", put(rename_category).delete(delete_category))
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<String>>> {
    let names = services::list(state.store.as_ref(), user_id).await?;
    Ok(Json(names))
}

#[instrument(skip(state, body))]
pub async fn create_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    services::create(state.store.as_ref(), user_id, body.category.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new("Category added."))))
}

#[instrument(skip(state, body))]
pub async fn rename_category(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<RenameCategoryRequest>,
) -> AppResult<Json<MessageResponse>> {
    services::rename(state.store.as_ref(), user_id, &name, body.new_name.as_deref()).await?;
    Ok(Json(MessageResponse::new("Category updated.")))
}

#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<MessageResponse>> {
    services::delete(state.store.as_ref(), user_id, &name).await?;
    Ok(Json(MessageResponse::new("Category deleted.")))
}
