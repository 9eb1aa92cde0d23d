use axum::{extract::State, http::StatusCode};

use fitcoach_core::health::readiness;

use crate::state::AppState;

/// `GET /readyz`: ready while the data directory exists. Read-only.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    let ready = tokio::fs::metadata(&state.data_dir)
        .await
        .is_ok_and(|meta| meta.is_dir());
    readiness(ready)
}
