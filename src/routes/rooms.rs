//! Room lifecycle and mutation handlers.
//!
//! DESIGN
//! ======
//! Every mutation follows the same shape: load the document, normalize it
//! against wall-clock time, apply exactly one action, normalize again, and
//! persist the whole result. Normalizing on both sides keeps lazy status
//! transitions convergent no matter which client's request lands first.
//!
//! ERROR HANDLING
//! ==============
//! `ApiError` is the single boundary type: validation → 400, authorization
//! → 403, missing room → 404 (checked before dispatch), storage failure →
//! 500. All errors surface as `{"error": <message>}`; storage details are
//! logged server-side, never leaked to the caller.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::actions::{self, ActionError, ActionOutcome, RoomAction};
use crate::prompts;
use crate::room::{ANONYMOUS_NAME, LanguageCode, Room, now_ms};
use crate::state::AppState;
use crate::store::{self, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Room not found")]
    NotFound,
    #[error("Unexpected error")]
    Upstream(#[from] StoreError),
}

impl From<ActionError> for ApiError {
    fn from(err: ActionError) -> Self {
        if err.is_forbidden() {
            Self::Forbidden(err.to_string())
        } else {
            Self::Validation(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Upstream(error) => {
                tracing::error!(%error, "room storage failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Success envelope: the full room document.
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomEnvelope {
    pub room: Room,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomBody {
    #[serde(default)]
    pub name: Option<String>,
    pub player_id: Option<String>,
    #[serde(default)]
    pub language: Option<LanguageCode>,
}

/// `POST /api/rooms` — create a lobby with the caller as host.
pub async fn create_room(
    State(state): State<AppState>,
    Json(body): Json<CreateRoomBody>,
) -> Result<Json<RoomEnvelope>, ApiError> {
    let player_id = match body.player_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_owned(),
        _ => return Err(ApiError::Validation("playerId is required".to_owned())),
    };
    let name = match body.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => ANONYMOUS_NAME.to_owned(),
    };
    let language = body.language.unwrap_or_default();

    let code = store::generate_unique_code(state.store.as_ref()).await?;
    let prompt = prompts::random_prompt(language).to_owned();
    let room = Room::new(code.clone(), prompt, player_id, name, language, now_ms());

    state.store.set(room).await?;
    let room = state.store.get(&code).await?.ok_or(ApiError::NotFound)?;
    tracing::info!(code, language = prompts::language_label(language), "room created");

    Ok(Json(RoomEnvelope { room }))
}

/// `GET /api/rooms/:code` — poll target. Normalizes lazily and persists the
/// transition when one fired, so the next poller sees it too.
pub async fn fetch_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<RoomEnvelope>, ApiError> {
    let code = code.to_uppercase();
    let room = state.store.get(&code).await?.ok_or(ApiError::NotFound)?;

    let normalized = room.clone().normalized(now_ms());
    if normalized != room {
        state.store.set(normalized.clone()).await?;
    }

    Ok(Json(RoomEnvelope { room: normalized }))
}

/// `PATCH /api/rooms/:code` — apply one action from the envelope.
///
/// A leave that empties the room deletes it and answers 204 with no body;
/// every other success returns the persisted, normalized document.
pub async fn update_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
    body: Result<Json<RoomAction>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(action) = body
        .map_err(|_| ApiError::Validation("Unsupported or malformed action".to_owned()))?;
    let code = code.to_uppercase();

    let current = state.store.get(&code).await?.ok_or(ApiError::NotFound)?;
    let now = now_ms();

    match actions::apply(current.normalized(now), action, now)? {
        ActionOutcome::Deleted => {
            state.store.delete(&code).await?;
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        ActionOutcome::Updated(room) => {
            let room = room.normalized(now);
            state.store.set(room).await?;
            let room = state.store.get(&code).await?.ok_or(ApiError::NotFound)?;
            Ok(Json(RoomEnvelope { room }).into_response())
        }
    }
}

/// `DELETE /api/rooms/:code` — explicit teardown.
pub async fn delete_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, ApiError> {
    let code = code.to_uppercase();
    if state.store.get(&code).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    state.store.delete(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}
