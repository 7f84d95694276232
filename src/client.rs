//! Client side of the room synchronization protocol.
//!
//! DESIGN
//! ======
//! The protocol is poll-only. [`RaceSession`] runs a fixed-interval fetch of
//! the room document in a background task and feeds every local keystroke
//! snapshot through its own [`TypingSession`], pushing the derived progress
//! back as fire-and-forget `progress` actions. Poll failures are logged and
//! retried on the next scheduled tick — never immediately, to avoid retry
//! storms.
//!
//! CANCELLATION
//! ============
//! The poll task is aborted on drop, and the departing `leave` action is a
//! courtesy signal: its failure (or never being sent at all) cannot corrupt
//! anything, because absent players are reconciled by other members' actions
//! or by the room's TTL.

use std::time::Duration;

use serde::Deserialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::actions::RoomAction;
use crate::room::{ANONYMOUS_NAME, LanguageCode, Room, RoomStatus, now_ms};
use crate::routes::rooms::RoomEnvelope;
use crate::session::{HistorySink, InputUpdate, MemoryHistory, SessionStatus, TypingSession};

/// Fixed room poll cadence, matched to countdown granularity.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1_500);

const REQUEST_TIMEOUT_SECS: u64 = 10;
const CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to build http client: {0}")]
    HttpClientBuild(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("room not found")]
    RoomNotFound,
    #[error("server rejected the request ({status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Self-issued opaque identity, stable for as long as the caller keeps it.
/// Persisting it across sessions is the embedding application's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub id: String,
    pub name: String,
}

impl PlayerIdentity {
    #[must_use]
    pub fn generate(name: Option<&str>) -> Self {
        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => ANONYMOUS_NAME.to_owned(),
        };
        Self { id: uuid::Uuid::new_v4().to_string(), name }
    }
}

/// Typed wrapper over the room endpoints.
#[derive(Clone)]
pub struct RoomClient {
    http: reqwest::Client,
    base_url: String,
}

impl RoomClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.into().trim_end_matches('/').to_owned() })
    }

    fn room_url(&self, code: &str) -> String {
        format!("{}/api/rooms/{code}", self.base_url)
    }

    async fn error_from(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        if status == 404 {
            return ClientError::RoomNotFound;
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => "unreadable error body".to_owned(),
        };
        ClientError::Api { status, message }
    }

    /// `POST /api/rooms` — create a lobby hosted by `identity`.
    pub async fn create_room(
        &self,
        identity: &PlayerIdentity,
        language: LanguageCode,
    ) -> Result<Room, ClientError> {
        let body = serde_json::json!({
            "playerId": identity.id,
            "name": identity.name,
            "language": language,
        });
        let response = self
            .http
            .post(format!("{}/api/rooms", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json::<RoomEnvelope>().await?.room)
    }

    /// `GET /api/rooms/:code` — one poll.
    pub async fn fetch_room(&self, code: &str) -> Result<Room, ClientError> {
        let response = self.http.get(self.room_url(code)).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json::<RoomEnvelope>().await?.room)
    }

    /// `PATCH /api/rooms/:code` — apply one action. `Ok(None)` means the
    /// action emptied and deleted the room.
    pub async fn send_action(
        &self,
        code: &str,
        action: &RoomAction,
    ) -> Result<Option<Room>, ClientError> {
        let response = self.http.patch(self.room_url(code)).json(action).send().await?;

        if response.status().as_u16() == 204 {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(Some(response.json::<RoomEnvelope>().await?.room))
    }

    /// `DELETE /api/rooms/:code` — explicit teardown.
    pub async fn delete_room(&self, code: &str) -> Result<(), ClientError> {
        let response = self.http.delete(self.room_url(code)).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }
}

/// One player's end of a multiplayer race: the local typing session plus the
/// poll loop and progress reporting that keep it in step with the room.
pub struct RaceSession {
    client: RoomClient,
    code: String,
    identity: PlayerIdentity,
    session: TypingSession,
    room_rx: watch::Receiver<Room>,
    poll_task: JoinHandle<()>,
    history: MemoryHistory,
}

impl RaceSession {
    /// Join `code` (idempotent — safe to call again with the same identity)
    /// and start polling the room document.
    pub async fn join(
        client: RoomClient,
        code: &str,
        identity: PlayerIdentity,
    ) -> Result<Self, ClientError> {
        let join = RoomAction::Join {
            player_id: Some(identity.id.clone()),
            name: Some(identity.name.clone()),
        };
        let room = client
            .send_action(code, &join)
            .await?
            .ok_or(ClientError::RoomNotFound)?;

        let session = TypingSession::race(&room.prompt, room.language, &room.code);
        let code = room.code.clone();
        let (room_tx, room_rx) = watch::channel(room);
        let poll_task = spawn_poll_task(client.clone(), code.clone(), room_tx);

        Ok(Self {
            client,
            code,
            identity,
            session,
            room_rx,
            poll_task,
            history: MemoryHistory::new(),
        })
    }

    #[must_use]
    pub fn room(&self) -> Room {
        self.room_rx.borrow().clone()
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn identity(&self) -> &PlayerIdentity {
        &self.identity
    }

    #[must_use]
    pub fn is_host(&self) -> bool {
        self.room_rx.borrow().host_id == self.identity.id
    }

    #[must_use]
    pub fn typing(&self) -> &TypingSession {
        &self.session
    }

    /// Completed-race summaries recorded by this client, newest first.
    #[must_use]
    pub fn history(&self) -> &MemoryHistory {
        &self.history
    }

    /// Reconcile the local typing session with the last polled room state:
    /// a prompt swap or a return to the lobby wipes local typing state.
    pub fn sync(&mut self) {
        let (prompt, status) = {
            let room = self.room_rx.borrow();
            (room.prompt.clone(), room.status)
        };

        if prompt != self.session.prompt() {
            self.session.reset(Some(&prompt));
        } else if status == RoomStatus::Lobby && self.session.status() != SessionStatus::Idle {
            self.session.reset(None);
        }
    }

    /// Feed one local input snapshot. Ignored unless the room is racing;
    /// accepted updates are pushed to the room as a fire-and-forget
    /// `progress` action, independent of the poll cadence.
    pub fn type_input(&mut self, value: &str) -> Option<InputUpdate> {
        self.sync();
        if self.room_rx.borrow().status != RoomStatus::Racing {
            return None;
        }

        let update = self.session.handle_input(value, now_ms())?;

        let action = RoomAction::Progress {
            player_id: Some(self.identity.id.clone()),
            progress: Some(f64::from(update.progress)),
            wpm: Some(f64::from(update.hud.wpm)),
            accuracy: Some(f64::from(update.hud.accuracy)),
            mistakes: Some(f64::from(update.hud.mistakes)),
            finished: Some(update.finished),
        };
        let client = self.client.clone();
        let code = self.code.clone();
        tokio::spawn(async move {
            if let Err(error) = client.send_action(&code, &action).await {
                tracing::warn!(%error, code, "failed to push progress");
            }
        });

        if let Some(row) = &update.history {
            self.history.append(row.clone());
        }

        Some(update)
    }

    /// Host action: begin the countdown.
    pub async fn start(&self, countdown_ms: Option<i64>) -> Result<(), ClientError> {
        let action = RoomAction::Start { player_id: Some(self.identity.id.clone()), countdown_ms };
        self.client.send_action(&self.code, &action).await?;
        Ok(())
    }

    /// Host action: back to the lobby, optionally with a fresh prompt.
    pub async fn reset(
        &self,
        prompt: Option<String>,
        language: Option<LanguageCode>,
    ) -> Result<(), ClientError> {
        let action =
            RoomAction::Reset { player_id: Some(self.identity.id.clone()), prompt, language };
        self.client.send_action(&self.code, &action).await?;
        Ok(())
    }

    /// Depart. The leave notification is best-effort: it is fired without
    /// waiting and its loss only delays roster cleanup until the TTL or the
    /// next member action.
    pub fn leave(self) {
        let action = RoomAction::Leave { player_id: Some(self.identity.id.clone()) };
        let client = self.client.clone();
        let code = self.code.clone();
        tokio::spawn(async move {
            if let Err(error) = client.send_action(&code, &action).await {
                tracing::debug!(%error, code, "leave notification dropped");
            }
        });
        // Drop aborts the poll task.
    }
}

impl Drop for RaceSession {
    fn drop(&mut self) {
        self.poll_task.abort();
    }
}

fn spawn_poll_task(
    client: RoomClient,
    code: String,
    room_tx: watch::Sender<Room>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match client.fetch_room(&code).await {
                Ok(room) => {
                    if room_tx.send(room).is_err() {
                        break;
                    }
                }
                Err(ClientError::RoomNotFound) => {
                    tracing::info!(code, "room expired or was deleted; stopping poll");
                    break;
                }
                Err(error) => {
                    tracing::warn!(%error, code, "room poll failed; retrying on next tick");
                }
            }
        }
    })
}
