//! Typing session engine — one typist against one fixed prompt.
//!
//! DESIGN
//! ======
//! The engine consumes full input-buffer snapshots (the whole text typed so
//! far, not discrete keystrokes) and recomputes correctness state on every
//! change, so rapid input and backspace edits can never desynchronize it.
//! It runs identically in solo practice and in a multiplayer race; the race
//! glue in [`crate::client`] only adds progress reporting on top.
//!
//! The edit policy models typing-test discipline: text before the first
//! mistake is immutable. Deletions are accepted only from the first
//! mismatched character onward, so a typist can correct errors but cannot
//! erase and retype prose that was already correct.

use serde::{Deserialize, Serialize};

use crate::room::LanguageCode;

/// Correctness of one prompt position against the current input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharState {
    Pending,
    Correct,
    Wrong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Typing,
    Completed,
}

/// How `total_mistakes` reacts when a correction shrinks the instantaneous
/// mismatch count.
///
/// The two call sites of the original system disagree: solo practice never
/// decrements the lifetime total, while the multiplayer handler lets
/// corrections pull it back down (floored at zero). Both behaviors are kept
/// behind this switch rather than silently unified; `Monotonic` is the
/// canonical one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MistakePolicy {
    #[default]
    Monotonic,
    ClampedDecrease,
}

/// Where a completed session's history row comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    Practice,
    Room { code: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    Practice,
    Room,
}

/// One completed session's summary, handed to the history sink exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub at: i64,
    pub mode: HistoryMode,
    pub language: LanguageCode,
    pub wpm: u32,
    pub mistakes: u32,
    pub accuracy: i32,
    pub time_ms: i64,
    pub prompt_len: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

/// Consumer of completed-session summaries. At-least-once from the engine's
/// perspective; de-duplication is the sink's problem.
pub trait HistorySink {
    fn append(&mut self, row: HistoryRow);
}

/// In-memory sink keeping the most recent rows first, capped like the
/// original history display.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    rows: Vec<HistoryRow>,
}

const HISTORY_CAP: usize = 100;

impl MemoryHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }
}

impl HistorySink for MemoryHistory {
    fn append(&mut self, row: HistoryRow) {
        self.rows.insert(0, row);
        self.rows.truncate(HISTORY_CAP);
    }
}

/// Derived metrics, computed on demand and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub wpm: u32,
    /// Cumulative mistakes, not the instantaneous count.
    pub mistakes: u32,
    /// Deliberately unclamped below zero: a session with more lifetime
    /// mistakes than typed characters reports negative accuracy.
    pub accuracy: i32,
    pub time_ms: i64,
}

/// Outcome of one accepted input snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct InputUpdate {
    /// Percentage of the prompt covered by the input, 0–100.
    pub progress: u8,
    pub finished: bool,
    pub hud: Hud,
    /// Present exactly once, on the update that completed the session.
    pub history: Option<HistoryRow>,
}

#[derive(Debug)]
pub struct TypingSession {
    prompt: Vec<char>,
    input: Vec<char>,
    char_states: Vec<CharState>,
    /// Positions currently wrong. Can decrease when errors are retyped.
    mistakes: u32,
    /// Lifetime mistake account, governed by the policy.
    total_mistakes: u32,
    policy: MistakePolicy,
    mode: SessionMode,
    language: LanguageCode,
    start_time: Option<i64>,
    end_time: Option<i64>,
    status: SessionStatus,
    history_logged: bool,
}

impl TypingSession {
    /// Solo practice session: monotonic mistake accounting.
    #[must_use]
    pub fn practice(prompt: &str, language: LanguageCode) -> Self {
        Self::new(prompt, language, MistakePolicy::Monotonic, SessionMode::Practice)
    }

    /// Multiplayer race session: corrections may pull the lifetime total
    /// back down, matching the room progress handler.
    #[must_use]
    pub fn race(prompt: &str, language: LanguageCode, room_code: &str) -> Self {
        Self::new(
            prompt,
            language,
            MistakePolicy::ClampedDecrease,
            SessionMode::Room { code: room_code.to_owned() },
        )
    }

    #[must_use]
    pub fn new(
        prompt: &str,
        language: LanguageCode,
        policy: MistakePolicy,
        mode: SessionMode,
    ) -> Self {
        let prompt: Vec<char> = prompt.chars().collect();
        let char_states = vec![CharState::Pending; prompt.len()];
        Self {
            prompt,
            input: Vec::new(),
            char_states,
            mistakes: 0,
            total_mistakes: 0,
            policy,
            mode,
            language,
            start_time: None,
            end_time: None,
            status: SessionStatus::Idle,
            history_logged: false,
        }
    }

    /// Replace the prompt (or keep it, with `None`) and reinitialize every
    /// session field. There is no partial reset.
    pub fn reset(&mut self, next_prompt: Option<&str>) {
        if let Some(prompt) = next_prompt {
            if !prompt.is_empty() {
                self.prompt = prompt.chars().collect();
            }
        }
        self.input.clear();
        self.char_states = vec![CharState::Pending; self.prompt.len()];
        self.mistakes = 0;
        self.total_mistakes = 0;
        self.start_time = None;
        self.end_time = None;
        self.status = SessionStatus::Idle;
        self.history_logged = false;
    }

    #[must_use]
    pub fn prompt(&self) -> String {
        self.prompt.iter().collect()
    }

    #[must_use]
    pub fn input(&self) -> String {
        self.input.iter().collect()
    }

    #[must_use]
    pub fn char_states(&self) -> &[CharState] {
        &self.char_states
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    #[must_use]
    pub fn total_mistakes(&self) -> u32 {
        self.total_mistakes
    }

    /// First prompt position where the given text diverges from the prompt.
    /// Positions past the end of the prompt always diverge.
    fn first_mismatch(&self, text: &[char]) -> Option<usize> {
        text.iter()
            .enumerate()
            .position(|(i, &c)| self.prompt.get(i) != Some(&c))
    }

    /// Feed one input-buffer snapshot.
    ///
    /// Returns `None` when the snapshot is rejected (deletion of immutable
    /// correct text) or ignored (session already completed); otherwise the
    /// update carries fresh derived metrics and, exactly once, the history
    /// row for a completed session.
    pub fn handle_input(&mut self, value: &str, now: i64) -> Option<InputUpdate> {
        if self.status == SessionStatus::Completed {
            return None;
        }

        let value: Vec<char> = value.chars().collect();

        // Backspace guard: the deletion point must not precede the first
        // mismatch — scanned in the shrunk value first, then (when the value
        // is entirely prefix-correct) in the previous input.
        if value.len() < self.input.len() {
            let first_mistake = self
                .first_mismatch(&value)
                .or_else(|| self.first_mismatch(&self.input));
            if let Some(first_mistake) = first_mistake {
                if value.len() < first_mistake {
                    return None;
                }
            }
        }

        if self.start_time.is_none() && !value.is_empty() {
            self.start_time = Some(now);
            self.status = SessionStatus::Typing;
        }

        let mut states = vec![CharState::Pending; self.prompt.len()];
        let mut current_mistakes: u32 = 0;
        for i in 0..value.len().min(self.prompt.len()) {
            if value[i] == self.prompt[i] {
                states[i] = CharState::Correct;
            } else {
                states[i] = CharState::Wrong;
                current_mistakes += 1;
            }
        }

        let delta = i64::from(current_mistakes) - i64::from(self.mistakes);
        match self.policy {
            MistakePolicy::Monotonic => {
                if delta > 0 {
                    self.total_mistakes += delta as u32;
                }
            }
            MistakePolicy::ClampedDecrease => {
                let total = i64::from(self.total_mistakes) + delta;
                self.total_mistakes = u32::try_from(total.max(0)).unwrap_or(0);
            }
        }

        self.input = value;
        self.char_states = states;
        self.mistakes = current_mistakes;

        let finished = self.input == self.prompt;
        if finished {
            self.end_time = Some(now);
            self.status = SessionStatus::Completed;
        }

        let hud = self.hud(now);
        let history = if finished && !self.history_logged {
            self.history_logged = true;
            let (mode, room) = match &self.mode {
                SessionMode::Practice => (HistoryMode::Practice, None),
                SessionMode::Room { code } => (HistoryMode::Room, Some(code.clone())),
            };
            Some(HistoryRow {
                at: now,
                mode,
                language: self.language,
                wpm: hud.wpm,
                mistakes: hud.mistakes,
                accuracy: hud.accuracy,
                time_ms: hud.time_ms,
                prompt_len: self.prompt.len(),
                room,
            })
        } else {
            None
        };

        Some(InputUpdate { progress: self.progress(), finished, hud, history })
    }

    /// Percentage of the prompt covered by the current input.
    #[must_use]
    pub fn progress(&self) -> u8 {
        if self.prompt.is_empty() {
            return 0;
        }
        let pct = (self.input.len() as f64 / self.prompt.len() as f64 * 100.0).round();
        pct.min(100.0) as u8
    }

    /// Derived metrics at `now`. Not stored; safe to call on a 100ms tick.
    #[must_use]
    pub fn hud(&self, now: i64) -> Hud {
        let time_ms = match self.start_time {
            Some(start) => (self.end_time.unwrap_or(now) - start).max(0),
            None => 0,
        };

        let correct = self
            .char_states
            .iter()
            .filter(|state| **state == CharState::Correct)
            .count();
        let minutes = time_ms as f64 / 60_000.0;
        let wpm = if minutes > 0.0 {
            (correct as f64 / 5.0 / minutes).round() as u32
        } else {
            0
        };

        let typed = self.input.len();
        let accuracy = if typed > 0 {
            let typed = typed as f64;
            ((typed - f64::from(self.total_mistakes)) / typed * 100.0).round() as i32
        } else {
            0
        };

        Hud { wpm, mistakes: self.total_mistakes, accuracy, time_ms }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
