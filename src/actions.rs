//! Room mutation actions — the closed envelope dispatched by the PATCH
//! endpoint and a pure `apply` over it.
//!
//! DESIGN
//! ======
//! Each action takes the current normalized room plus a bounded payload and
//! produces either a replacement document or a deletion signal. The tag is a
//! closed serde enum, so an unrecognized action name never reaches dispatch:
//! it fails deserialization at the protocol boundary.
//!
//! ERROR HANDLING
//! ==============
//! Failures are typed, not stringly dispatched: a blank `playerId` or a
//! progress report from a non-member is a validation error (400); `start`
//! and `reset` from anyone but the host is an authorization error (403).
//! A failed action leaves the room untouched.

use serde::{Deserialize, Serialize};

use crate::room::{ANONYMOUS_NAME, LanguageCode, Player, Room, RoomStatus};

/// Countdown length used when the host does not supply one.
pub const DEFAULT_COUNTDOWN_MS: i64 = 3_000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("playerId is required")]
    MissingPlayerId,
    #[error("Player is not part of this room")]
    NotAMember,
    #[error("Only host can start the countdown")]
    StartNotHost,
    #[error("Only host can reset the room")]
    ResetNotHost,
}

impl ActionError {
    /// Authorization failures map to 403; the rest are validation (400).
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::StartNotHost | Self::ResetNotHost)
    }
}

/// One client mutation. Metrics arrive as loose JSON numbers and are clamped
/// on application; nothing client-reported is trusted beyond that.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum RoomAction {
    Join {
        player_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Leave {
        player_id: Option<String>,
    },
    Start {
        player_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        countdown_ms: Option<i64>,
    },
    Progress {
        player_id: Option<String>,
        #[serde(default)]
        progress: Option<f64>,
        #[serde(default)]
        wpm: Option<f64>,
        #[serde(default)]
        accuracy: Option<f64>,
        #[serde(default)]
        mistakes: Option<f64>,
        #[serde(default)]
        finished: Option<bool>,
    },
    Reset {
        player_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prompt: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<LanguageCode>,
    },
}

/// Result of applying an action: a replacement document, or "delete the
/// room" when the last player walks out.
#[derive(Debug, PartialEq)]
pub enum ActionOutcome {
    Updated(Room),
    Deleted,
}

/// Apply one action to a normalized room document.
pub fn apply(room: Room, action: RoomAction, now: i64) -> Result<ActionOutcome, ActionError> {
    match action {
        RoomAction::Join { player_id, name } => {
            Ok(ActionOutcome::Updated(join(room, player_id, name, now)?))
        }
        RoomAction::Leave { player_id } => leave(room, player_id),
        RoomAction::Start { player_id, countdown_ms } => {
            Ok(ActionOutcome::Updated(start(room, player_id, countdown_ms, now)?))
        }
        RoomAction::Progress { player_id, progress, wpm, accuracy, mistakes, finished } => {
            let report = ProgressReport { progress, wpm, accuracy, mistakes, finished };
            Ok(ActionOutcome::Updated(apply_progress(room, player_id, report, now)?))
        }
        RoomAction::Reset { player_id, prompt, language } => {
            Ok(ActionOutcome::Updated(reset(room, player_id, prompt, language, now)?))
        }
    }
}

fn require_player_id(player_id: Option<String>) -> Result<String, ActionError> {
    match player_id {
        Some(id) if !id.trim().is_empty() => Ok(id.trim().to_owned()),
        _ => Err(ActionError::MissingPlayerId),
    }
}

fn display_name(name: Option<String>) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => name.trim().to_owned(),
        _ => ANONYMOUS_NAME.to_owned(),
    }
}

/// Idempotent: re-joining with the same id only refreshes the name.
/// Never touches `status`, so a mid-race rejoin keeps racing.
fn join(
    mut room: Room,
    player_id: Option<String>,
    name: Option<String>,
    now: i64,
) -> Result<Room, ActionError> {
    let player_id = require_player_id(player_id)?;
    let name = display_name(name);

    if let Some(player) = room.find_player_mut(&player_id) {
        player.name = name;
        player.updated_at = now;
    } else {
        room.players.push(Player::new(player_id, name, now));
    }

    Ok(room)
}

fn leave(mut room: Room, player_id: Option<String>) -> Result<ActionOutcome, ActionError> {
    let player_id = require_player_id(player_id)?;

    if room.find_player(&player_id).is_none() {
        return Ok(ActionOutcome::Updated(room));
    }

    room.players.retain(|player| player.id != player_id);

    let Some(first_remaining) = room.players.first() else {
        return Ok(ActionOutcome::Deleted);
    };

    if room.host_id == player_id {
        room.host_id = first_remaining.id.clone();
    }

    // A finished race with a reduced roster drops back to the lobby so the
    // remaining players can configure a new round.
    if room.status == RoomStatus::Finished {
        room.status = RoomStatus::Lobby;
    }

    Ok(ActionOutcome::Updated(room))
}

fn start(
    mut room: Room,
    player_id: Option<String>,
    countdown_ms: Option<i64>,
    now: i64,
) -> Result<Room, ActionError> {
    let player_id = require_player_id(player_id)?;
    if room.host_id != player_id {
        return Err(ActionError::StartNotHost);
    }

    let countdown_ms = match countdown_ms {
        Some(ms) if ms > 0 => ms,
        _ => DEFAULT_COUNTDOWN_MS,
    };

    room.status = RoomStatus::Countdown;
    room.starts_at = Some(now + countdown_ms);
    for player in &mut room.players {
        player.reset_metrics(now);
    }

    Ok(room)
}

struct ProgressReport {
    progress: Option<f64>,
    wpm: Option<f64>,
    accuracy: Option<f64>,
    mistakes: Option<f64>,
    finished: Option<bool>,
}

fn clamp_round(value: Option<f64>, max: f64) -> u32 {
    let value = value.unwrap_or(0.0);
    if !value.is_finite() {
        return 0;
    }
    value.clamp(0.0, max).round() as u32
}

fn apply_progress(
    mut room: Room,
    player_id: Option<String>,
    report: ProgressReport,
    now: i64,
) -> Result<Room, ActionError> {
    let player_id = require_player_id(player_id)?;
    if room.find_player(&player_id).is_none() {
        return Err(ActionError::NotAMember);
    }

    let progress = clamp_round(report.progress, 100.0) as u8;
    let wpm = clamp_round(report.wpm, f64::MAX);
    let accuracy = clamp_round(report.accuracy, 100.0) as u8;
    let mistakes = clamp_round(report.mistakes, f64::MAX);
    let finished = report.finished.unwrap_or(false) || progress >= 100;

    // Evaluated against the roster as it stands before this update lands.
    let everyone_else_finished = room
        .players
        .iter()
        .all(|player| player.id == player_id || player.finished);

    let player = room
        .find_player_mut(&player_id)
        .ok_or(ActionError::NotAMember)?;
    player.progress = progress;
    player.wpm = wpm;
    player.accuracy = accuracy;
    player.mistakes = mistakes;
    player.finished = finished;
    player.updated_at = now;

    if finished && everyone_else_finished {
        room.status = RoomStatus::Finished;
    }

    Ok(room)
}

fn reset(
    mut room: Room,
    player_id: Option<String>,
    prompt: Option<String>,
    language: Option<LanguageCode>,
    now: i64,
) -> Result<Room, ActionError> {
    let player_id = require_player_id(player_id)?;
    if room.host_id != player_id {
        return Err(ActionError::ResetNotHost);
    }

    if let Some(prompt) = prompt {
        if !prompt.is_empty() {
            room.prompt = prompt;
        }
    }
    if let Some(language) = language {
        room.language = language;
    }

    room.status = RoomStatus::Lobby;
    room.starts_at = None;
    for player in &mut room.players {
        player.reset_metrics(now);
    }

    Ok(room)
}

#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;
