use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
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

use super::dto::{CreateExpenseRequest, ExpenseListItem, ExpenseResponse, UpdateExpenseRequest};
use super::repo_types::ExpenseId;
use super::services;

/// Handlers taking an id extract it before `AuthUser`, so a non-numeric id
/// is a 404 even without a token.
pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route(
            "/expenses/:id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}

#[instrument(skip(state))]
pub async fn list_expenses(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<ExpenseListItem>>> {
    let items = services::list(state.store.as_ref(), user_id).await?;
    Ok(Json(items))
}

#[instrument(skip(state, body))]
pub async fn create_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<CreateExpenseRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    services::create(state.store.as_ref(), user_id, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Expense added successfully.")),
    ))
}

#[instrument(skip(state))]
pub async fn get_expense(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ExpenseId>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<ExpenseResponse>> {
    let expense = services::get(state.store.as_ref(), user_id, id).await?;
    Ok(Json(ExpenseResponse { expense }))
}

#[instrument(skip(state, body))]
pub async fn update_expense(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ExpenseId>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<UpdateExpenseRequest>,
) -> AppResult<Json<MessageResponse>> {
    services::update(state.store.as_ref(), user_id, id, body).await?;
    Ok(Json(MessageResponse::new("Expense modified successfully.")))
}

#[instrument(skip(state))]
pub async fn delete_expense(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ExpenseId>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<MessageResponse>> {
    services::delete(state.store.as_ref(), user_id, id).await?;
    Ok(Json(MessageResponse::new("Expense deleted successfully.")))
}
