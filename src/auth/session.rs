//! Opaque bearer sessions.
//!
//! A token is a random UUID stored next to its owner in `sessions`. Tokens
//! carry no expiry and there is no logout, so an issued token stays valid for
//! as long as its row exists.

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::repo::SessionStore;
use crate::auth::repo_types::UserId;
use crate::error::{AppError, AppResult};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Header absent, wrong scheme, or not exactly `Bearer <token>`.
    #[error("Invalid authorization header.")]
    MalformedAuth,

    #[error("Invalid or expired token.")]
    InvalidOrExpiredToken,
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Unauthenticated(e.to_string())
    }
}

pub fn parse_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MalformedAuth)?;
    let parts: Vec<&str> = header.split_whitespace().collect();
    match parts.as_slice() {
        ["Bearer", token] => Ok(*token),
        _ => Err(AuthError::MalformedAuth),
    }
}

/// Resolve an `Authorization` header value to the user that owns the token.
pub async fn authenticate<S>(store: &S, header: Option<&str>) -> AppResult<UserId>
where
    S: SessionStore + ?Sized,
{
    let token = parse_bearer(header).inspect_err(|_| warn!("malformed authorization header"))?;

    match store.find_session_user(token).await? {
        Some(user_id) => {
            debug!(user_id, "session resolved");
            Ok(user_id)
        }
        None => {
            warn!("unknown session token");
            Err(AuthError::InvalidOrExpiredToken.into())
        }
    }
}

pub fn new_token() -> String {
    Uuid::new_v4().to_string()
}

/// Persist a fresh session for `user_id`. Earlier sessions stay valid.
pub async fn issue_session<S>(store: &S, user_id: UserId) -> AppResult<String>
where
    S: SessionStore + ?Sized,
{
    let token = new_token();
    store.insert_session(&token, user_id).await?;
    debug!(user_id, "session issued");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::UserStore;
    use crate::memory::MemoryStore;
    use axum::http::StatusCode;

    #[test]
    fn parse_bearer_accepts_exactly_two_parts() {
        assert_eq!(parse_bearer(Some("Bearer abc")), Ok("abc"));
        assert_eq!(parse_bearer(Some("Bearer   abc ")), Ok("abc"));
        assert_eq!(parse_bearer(None), Err(AuthError::MalformedAuth));
        assert_eq!(parse_bearer(Some("")), Err(AuthError::MalformedAuth));
        assert_eq!(parse_bearer(Some("Bearer")), Err(AuthError::MalformedAuth));
        assert_eq!(parse_bearer(Some("Bearer a b")), Err(AuthError::MalformedAuth));
        assert_eq!(parse_bearer(Some("Basic abc")), Err(AuthError::MalformedAuth));
        assert_eq!(parse_bearer(Some("bearer abc")), Err(AuthError::MalformedAuth));
    }

    #[test]
    fn tokens_are_unique_uuids() {
        let a = new_token();
        let b = new_token();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[tokio::test]
    async fn issued_session_authenticates_its_owner() {
        let store = MemoryStore::default();
        let user_id = store
            .create_user_with_session("ana", "ana@example.com", "hash", &new_token())
            .await
            .unwrap();

        let token = issue_session(&store, user_id).await.unwrap();
        let header = format!("Bearer {token}");
        assert_eq!(authenticate(&store, Some(&header)).await.unwrap(), user_id);
    }

    #[tokio::test]
    async fn unknown_token_is_rejected_with_401() {
        let store = MemoryStore::default();
        let err = authenticate(&store, Some("Bearer nope")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Invalid or expired token.");
    }

    #[tokio::test]
    async fn malformed_header_is_rejected_before_lookup() {
        let store = MemoryStore::default();
        let err = authenticate(&store, Some("Token abc")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Invalid authorization header.");
    }
}
