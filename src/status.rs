use axum::extract::State;
use tracing::{error, instrument};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub async fn index() -> &'static str {
    "Welcome to the SPENDLY API!"
}

/// Round-trips a trivial query through the store.
#[instrument(skip(state))]
pub async fn test_db(State(state): State<AppState>) -> AppResult<&'static str> {
    state.store.ping().await.map_err(|e| {
        error!(error = %e, "database ping failed");
        AppError::Internal(anyhow::Error::new(e))
    })?;
    Ok("Connection to the DB successful.")
}
