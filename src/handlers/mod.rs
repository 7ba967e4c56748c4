// Handlers module
// HTTP handlers for the REST API

pub mod moods;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// JSON body extractor whose rejections surface as validation errors
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejections surface as validation errors
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Decode a JSON body that may legitimately be absent.
/// An empty body is treated as `{}`; anything else must be valid JSON for `T`.
pub fn json_body_or_default<T>(body: &Bytes) -> ApiResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let Json(value) = Json::<T>::from_bytes(body)?;
    Ok(value)
}

/// Health check handler
/// Returns "OK" with 200 status when the mood store answers
pub async fn health_check(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    state.store.health_check().await?;
    Ok((StatusCode::OK, "OK"))
}
