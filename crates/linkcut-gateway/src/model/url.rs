use serde::{Deserialize, Serialize};

/// Body of `POST /api/shorten`.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
}

/// Response of `POST /api/shorten`.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub result: String,
}
