use axum::routing::{get, post};
use axum::Router;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    add_url_handler, ping_handler, redirect_handler, shorten_handler, user_urls_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", post(add_url_handler))
            .route("/{id}", get(redirect_handler))
            .route("/ping", get(ping_handler))
            .nest(
                "/api",
                Router::new()
                    .route("/shorten", post(shorten_handler))
                    .route("/user/urls", get(user_urls_handler)),
            )
            .layer(RequestDecompressionLayer::new())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
