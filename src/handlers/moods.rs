// Mood handlers
// HTTP handlers for mood entry operations under /api/moods

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use super::{json_body_or_default, ApiJson, ApiQuery};
use crate::{
    error::{ApiError, ApiResult},
    identity::{first_claimed, OwnerId},
    models::{CreateMoodRequest, MoodEntry, UpdateMoodRequest},
    state::AppState,
};

/// Owner id supplied in the query string.
/// Repeated keys are tolerated: the first non-blank `ownerId` wins, then the older `userId`.
#[derive(Debug, Default, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct OwnerQuery {
    pub owner_id: Option<String>,
}

impl From<Vec<(String, String)>> for OwnerQuery {
    fn from(pairs: Vec<(String, String)>) -> Self {
        let owner_id = first_claimed([first_value(&pairs, "ownerId"), first_value(&pairs, "userId")])
            .map(str::to_string);
        OwnerQuery { owner_id }
    }
}

fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .filter(|(name, _)| name == key)
        .map(|(_, value)| value.trim())
        .find(|value| !value.is_empty())
}

/// Optional JSON body accepted by DELETE
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerBody {
    pub owner_id: Option<String>,
    pub user_id: Option<String>,
}

impl OwnerBody {
    pub fn claimed_owner(&self) -> Option<&str> {
        first_claimed([self.owner_id.as_deref(), self.user_id.as_deref()])
    }
}

/// List the caller's moods, newest first
/// GET /api/moods?ownerId=<id>
pub async fn list_moods(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(params): ApiQuery<OwnerQuery>,
) -> ApiResult<impl IntoResponse> {
    let owner = state.owners.resolve(&headers, params.owner_id.as_deref())?;
    info!("Fetching moods for owner: {}", owner);

    let moods = state.store.list_by_owner(owner.as_str()).await?;

    info!("Retrieved {} moods for owner: {}", moods.len(), owner);
    Ok((StatusCode::OK, Json(moods)))
}

/// Create a new mood entry
/// POST /api/moods
pub async fn create_mood(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<CreateMoodRequest>,
) -> ApiResult<impl IntoResponse> {
    let owner = state.owners.resolve(&headers, request.claimed_owner())?;
    info!("Creating mood entry for owner: {}", owner);

    let entry = request
        .into_entry(owner.into_inner())
        .map_err(ApiError::Validation)?;
    let mood = state.store.insert(entry).await?;

    info!("Successfully created mood entry with id: {}", mood.id);
    Ok((StatusCode::OK, Json(mood)))
}

/// Get a mood entry by ID
/// GET /api/moods/:id?ownerId=<id>
pub async fn get_mood_by_id(
    State(state): State<AppState>,
    Path(mood_id): Path<String>,
    headers: HeaderMap,
    ApiQuery(params): ApiQuery<OwnerQuery>,
) -> ApiResult<impl IntoResponse> {
    info!("Fetching mood entry with id: {}", mood_id);

    let mood = find_mood(&state, &mood_id).await?;
    let owner = state.owners.resolve(&headers, params.owner_id.as_deref())?;
    ensure_owner(&mood, &owner)?;

    Ok((StatusCode::OK, Json(mood)))
}

/// Update the supplied fields of a mood entry
/// PUT /api/moods/:id
///
/// The body is decoded only after the entry has been found, so unknown ids are
/// always 404 whatever the payload looks like. An empty body counts as `{}`.
pub async fn update_mood(
    State(state): State<AppState>,
    Path(mood_id): Path<String>,
    headers: HeaderMap,
    ApiQuery(params): ApiQuery<OwnerQuery>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    info!("Updating mood entry with id: {}", mood_id);

    let mut mood = find_mood(&state, &mood_id).await?;

    let request: UpdateMoodRequest = json_body_or_default(&body)?;
    let claimed = first_claimed([request.claimed_owner(), params.owner_id.as_deref()]);
    let owner = state.owners.resolve(&headers, claimed)?;
    ensure_owner(&mood, &owner)?;

    request.validate().map_err(ApiError::Validation)?;
    mood.apply_update(request);
    mood.validate().map_err(ApiError::Validation)?;

    let updated = state.store.update(&mood).await?;

    info!("Successfully updated mood entry with id: {}", updated.id);
    Ok((StatusCode::OK, Json(updated)))
}

/// Delete a mood entry
/// DELETE /api/moods/:id?ownerId=<id>
pub async fn delete_mood(
    State(state): State<AppState>,
    Path(mood_id): Path<String>,
    headers: HeaderMap,
    ApiQuery(params): ApiQuery<OwnerQuery>,
    body: Option<Json<OwnerBody>>,
) -> ApiResult<impl IntoResponse> {
    info!("Deleting mood entry with id: {}", mood_id);

    let mood = find_mood(&state, &mood_id).await?;

    let body = body.map(|Json(body)| body).unwrap_or_default();
    let claimed = first_claimed([params.owner_id.as_deref(), body.claimed_owner()]);
    let owner = state.owners.resolve(&headers, claimed)?;
    ensure_owner(&mood, &owner)?;

    if !state.store.delete(mood.id).await? {
        return Err(ApiError::not_found("Mood"));
    }

    info!("Successfully deleted mood entry with id: {}", mood.id);
    Ok((StatusCode::OK, Json(json!({ "msg": "Mood removed" }))))
}

/// Ids that are not valid UUIDs are reported exactly like missing entries.
async fn find_mood(state: &AppState, mood_id: &str) -> ApiResult<MoodEntry> {
    let id = Uuid::parse_str(mood_id).map_err(|_| ApiError::not_found("Mood"))?;

    state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Mood"))
}

fn ensure_owner(mood: &MoodEntry, owner: &OwnerId) -> ApiResult<()> {
    if !mood.is_owned_by(owner.as_str()) {
        warn!("Owner {} attempted to access mood entry {}", owner, mood.id);
        return Err(ApiError::unauthorized("User not authorized"));
    }

    Ok(())
}
