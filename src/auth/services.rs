use tracing::{info, instrument, warn};

use crate::auth::dto::AuthResponse;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::{SessionStore, UserStore};
use crate::auth::session::{issue_session, new_token};
use crate::error::{AppError, AppResult};
use crate::repo::StoreError;
use crate::validation::present;

pub const MISSING_CREDENTIALS: &str = "Missing required fields.";
pub const ACCOUNT_EXISTS: &str = "Username or email already exists.";
/// Shared by unknown-user and wrong-password so accounts cannot be probed.
pub const BAD_CREDENTIALS: &str = "Invalid username or password.";

#[instrument(skip_all)]
pub async fn register<S>(
    store: &S,
    username: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
) -> AppResult<AuthResponse>
where
    S: UserStore + ?Sized,
{
    let (Some(username), Some(email), Some(password)) =
        (present(username), present(email), present(password))
    else {
        warn!("register missing fields");
        return Err(AppError::validation(MISSING_CREDENTIALS));
    };

    let hash = hash_password(password)?;
    let token = new_token();

    match store
        .create_user_with_session(username, email, &hash, &token)
        .await
    {
        Ok(user_id) => {
            info!(user_id, %username, "user registered");
            Ok(AuthResponse {
                token,
                username: username.to_string(),
            })
        }
        Err(StoreError::UniqueViolation) => {
            warn!(%username, "username or email already registered");
            Err(AppError::Conflict(ACCOUNT_EXISTS.into()))
        }
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip_all)]
pub async fn login<S>(
    store: &S,
    username: Option<&str>,
    password: Option<&str>,
) -> AppResult<AuthResponse>
where
    S: UserStore + SessionStore + ?Sized,
{
    let (Some(username), Some(password)) = (present(username), present(password)) else {
        warn!("login missing fields");
        return Err(AppError::validation(MISSING_CREDENTIALS));
    };

    let Some(user) = store.find_user_by_username(username).await? else {
        warn!(%username, "login unknown username");
        return Err(AppError::Unauthenticated(BAD_CREDENTIALS.into()));
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(%username, user_id = user.id, "login invalid password");
        return Err(AppError::Unauthenticated(BAD_CREDENTIALS.into()));
    }

    let token = issue_session(store, user.id).await?;
    info!(user_id = user.id, %username, "user logged in");
    Ok(AuthResponse {
        token,
        username: user.username,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::authenticate;
    use crate::memory::MemoryStore;
    use axum::http::StatusCode;

    async fn registered(store: &MemoryStore, username: &str, email: &str) -> AuthResponse {
        register(store, Some(username), Some(email), Some("s3cret"))
            .await
            .expect("register")
    }

    #[tokio::test]
    async fn register_returns_a_usable_token() {
        let store = MemoryStore::default();
        let res = registered(&store, "ana", "ana@example.com").await;
        assert_eq!(res.username, "ana");

        let header = format!("Bearer {}", res.token);
        let user_id = authenticate(&store, Some(&header)).await.unwrap();
        let user = store.find_user_by_username("ana").await.unwrap().unwrap();
        assert_eq!(user.id, user_id);
        assert_ne!(user.password_hash, "s3cret");
    }

    #[tokio::test]
    async fn register_requires_every_field() {
        let store = MemoryStore::default();
        for (u, e, p) in [
            (None, Some("a@x.io"), Some("pw")),
            (Some("a"), Some(""), Some("pw")),
            (Some("a"), Some("a@x.io"), None),
        ] {
            let err = register(&store, u, e, p).await.unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts_and_keeps_one_row() {
        let store = MemoryStore::default();
        registered(&store, "ana", "ana@example.com").await;

        let err = register(&store, Some("ana"), Some("other@example.com"), Some("pw"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.session_count(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::default();
        registered(&store, "ana", "ana@example.com").await;

        let err = register(&store, Some("bob"), Some("ana@example.com"), Some("pw"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn login_issues_independent_sessions() {
        let store = MemoryStore::default();
        let first = registered(&store, "ana", "ana@example.com").await;

        let second = login(&store, Some("ana"), Some("s3cret")).await.unwrap();
        assert_ne!(first.token, second.token);
        assert_eq!(store.session_count(), 2);

        for token in [first.token, second.token] {
            let header = format!("Bearer {token}");
            assert!(authenticate(&store, Some(&header)).await.is_ok());
        }
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_look_the_same() {
        let store = MemoryStore::default();
        registered(&store, "ana", "ana@example.com").await;

        let unknown = login(&store, Some("nobody"), Some("s3cret")).await.unwrap_err();
        let wrong = login(&store, Some("ana"), Some("nope")).await.unwrap_err();
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn login_requires_username_and_password() {
        let store = MemoryStore::default();
        let err = login(&store, Some("ana"), Some("")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
