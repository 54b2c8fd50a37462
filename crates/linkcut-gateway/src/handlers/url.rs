use crate::error::{AppError, Result};
use crate::model::{ShortenRequest, ShortenResponse};
use crate::state::AppState;
use crate::user::UserId;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use linkcut_core::UserUrl;

/// `POST /`: the request body is the raw long URL.
pub async fn add_url_handler(
    State(state): State<AppState>,
    UserId(user): UserId,
    body: String,
) -> Result<Response> {
    if body.is_empty() {
        return Err(AppError::BadRequest(
            "request body must not be empty".to_string(),
        ));
    }

    let short_url = state.storage().add_url(&body, &user).await?;
    Ok((StatusCode::CREATED, short_url).into_response())
}

/// `POST /api/shorten`: JSON body `{"url": "..."}`.
pub async fn shorten_handler(
    State(state): State<AppState>,
    UserId(user): UserId,
    Json(request): Json<ShortenRequest>,
) -> Result<Response> {
    if request.url.is_empty() {
        return Err(AppError::BadRequest("url must not be empty".to_string()));
    }

    let short_url = state.storage().add_url(&request.url, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse { result: short_url }),
    )
        .into_response())
}

/// `GET /{id}`: redirect to the original URL behind a short id.
pub async fn redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::BadRequest("id parameter must be an integer".to_string()))?;

    let url = state.storage().search_url(id).await?;
    Ok((
        StatusCode::TEMPORARY_REDIRECT,
        [(header::LOCATION, url.clone())],
        url,
    )
        .into_response())
}

/// `GET /api/user/urls`: every URL the requesting user has shortened.
pub async fn user_urls_handler(
    State(state): State<AppState>,
    UserId(user): UserId,
) -> Result<Json<Vec<UserUrl>>> {
    Ok(Json(state.storage().urls_for_user(&user).await?))
}
