use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::repo_types::UserId;
use super::session::authenticate;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves the bearer token to the calling user's id.
pub struct AuthUser(pub UserId);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let user_id = authenticate(state.store.as_ref(), header).await?;
        Ok(AuthUser(user_id))
    }
}
