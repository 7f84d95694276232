//! Room and player documents plus the lazy status transition.
//!
//! DESIGN
//! ======
//! A `Room` is the only shared mutable resource in the system. It is stored
//! and replaced whole; nothing mutates it in place across requests. Status
//! advances lazily via [`Room::normalized`], which every read and write path
//! runs before trusting the document — there is no background scheduler
//! driving the `countdown -> racing -> finished` progression.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Fallback display name for players who never set one.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Current time as milliseconds since Unix epoch.
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

/// Prompt catalogue selector. Closed set; the wire format is the two-letter
/// language code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageCode {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "mn")]
    Mn,
}

/// Room lifecycle. `lobby` and `finished` are stable until an explicit
/// action; the other two advance on normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Lobby,
    Countdown,
    Racing,
    Finished,
}

/// One participant's live race state. Owned by a `Room`, never stored
/// independently. Metrics are client-reported and not re-validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    /// Percentage of the prompt covered by the player's input, 0–100.
    pub progress: u8,
    pub wpm: u32,
    pub accuracy: u8,
    pub mistakes: u32,
    pub finished: bool,
    /// Last mutation time. Display/debugging only, never used for eviction.
    pub updated_at: i64,
}

impl Player {
    #[must_use]
    pub fn new(id: String, name: String, now: i64) -> Self {
        Self {
            id,
            name,
            progress: 0,
            wpm: 0,
            accuracy: 0,
            mistakes: 0,
            finished: false,
            updated_at: now,
        }
    }

    /// Zero the race metrics ahead of a new round.
    pub fn reset_metrics(&mut self, now: i64) {
        self.progress = 0;
        self.wpm = 0;
        self.accuracy = 0;
        self.mistakes = 0;
        self.finished = false;
        self.updated_at = now;
    }
}

/// The shared race document.
///
/// Invariants (maintained by the action layer, not the store):
/// - `host_id` names a current member whenever `players` is non-empty.
/// - a room with zero players is deleted, never persisted.
/// - `starts_at` is set exactly when `status` is `countdown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub code: String,
    pub language: LanguageCode,
    pub host_id: String,
    pub status: RoomStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<i64>,
    pub players: Vec<Player>,
    pub prompt: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Room {
    /// Create a fresh lobby containing only the host.
    #[must_use]
    pub fn new(
        code: String,
        prompt: String,
        host_id: String,
        host_name: String,
        language: LanguageCode,
        now: i64,
    ) -> Self {
        let host = Player::new(host_id.clone(), host_name, now);
        Self {
            code,
            language,
            host_id,
            status: RoomStatus::Lobby,
            starts_at: None,
            players: vec![host],
            prompt,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn find_player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.id == player_id)
    }

    pub fn find_player_mut(&mut self, player_id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.id == player_id)
    }

    /// Advance the status against wall-clock time and player completion.
    ///
    /// Idempotent: applying it twice with the same `now` yields the same
    /// document, so every caller runs it freely before reads and writes.
    #[must_use]
    pub fn normalized(mut self, now: i64) -> Self {
        if self.status == RoomStatus::Countdown {
            if let Some(starts_at) = self.starts_at {
                if now >= starts_at {
                    self.status = RoomStatus::Racing;
                }
            }
        }

        if self.status == RoomStatus::Racing {
            let everyone_finished =
                !self.players.is_empty() && self.players.iter().all(|player| player.finished);
            if everyone_finished {
                self.status = RoomStatus::Finished;
            }
        }

        self
    }
}

#[cfg(test)]
#[path = "room_test.rs"]
mod tests;
