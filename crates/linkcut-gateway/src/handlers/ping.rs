use crate::error::Result;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;

/// `GET /ping`: a live round trip to the storage backend.
///
/// Backends without a database report an error here by design, so this
/// answers "can I reach the database", not "is the process alive".
pub async fn ping_handler(State(state): State<AppState>) -> Result<StatusCode> {
    state.storage().ping().await?;
    Ok(StatusCode::OK)
}
