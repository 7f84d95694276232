use super::*;

const T0: i64 = 100_000;

fn practice(prompt: &str) -> TypingSession {
    TypingSession::practice(prompt, LanguageCode::En)
}

// =============================================================================
// lifecycle
// =============================================================================

#[test]
fn session_starts_idle_with_all_pending() {
    let session = practice("abc");
    assert_eq!(session.status(), SessionStatus::Idle);
    assert_eq!(session.char_states(), &[CharState::Pending; 3]);
    assert_eq!(session.hud(T0), Hud { wpm: 0, mistakes: 0, accuracy: 0, time_ms: 0 });
}

#[test]
fn first_nonempty_input_starts_the_timer() {
    let mut session = practice("abc");
    session.handle_input("a", T0).unwrap();
    assert_eq!(session.status(), SessionStatus::Typing);
    assert_eq!(session.hud(T0 + 500).time_ms, 500);
}

#[test]
fn empty_snapshot_does_not_start_the_timer() {
    let mut session = practice("abc");
    session.handle_input("", T0).unwrap();
    assert_eq!(session.status(), SessionStatus::Idle);
    assert_eq!(session.hud(T0 + 500).time_ms, 0);
}

#[test]
fn exact_match_completes_and_freezes_time() {
    let mut session = practice("abc");
    session.handle_input("ab", T0).unwrap();
    let update = session.handle_input("abc", T0 + 2_000).unwrap();

    assert!(update.finished);
    assert_eq!(session.status(), SessionStatus::Completed);
    // Clock keeps moving, elapsed does not.
    assert_eq!(session.hud(T0 + 60_000).time_ms, 2_000);
}

#[test]
fn input_after_completion_is_ignored() {
    let mut session = practice("abc");
    session.handle_input("abc", T0).unwrap();
    assert!(session.handle_input("abcd", T0 + 100).is_none());
    assert_eq!(session.input(), "abc");
}

#[test]
fn history_row_is_emitted_exactly_once() {
    let mut session = TypingSession::race("ab", LanguageCode::Mn, "ABCDE");
    session.handle_input("a", T0).unwrap();
    let update = session.handle_input("ab", T0 + 1_000).unwrap();

    let row = update.history.expect("completion must emit a history row");
    assert_eq!(row.mode, HistoryMode::Room);
    assert_eq!(row.room.as_deref(), Some("ABCDE"));
    assert_eq!(row.language, LanguageCode::Mn);
    assert_eq!(row.prompt_len, 2);
    assert_eq!(row.time_ms, 1_000);
}

#[test]
fn practice_history_row_has_no_room() {
    let mut session = practice("a");
    let update = session.handle_input("a", T0).unwrap();
    let row = update.history.unwrap();
    assert_eq!(row.mode, HistoryMode::Practice);
    assert_eq!(row.room, None);
}

// =============================================================================
// char states and mistakes
// =============================================================================

#[test]
fn char_states_track_the_snapshot() {
    let mut session = practice("abcdef");
    session.handle_input("abx", T0).unwrap();

    assert_eq!(
        session.char_states(),
        &[
            CharState::Correct,
            CharState::Correct,
            CharState::Wrong,
            CharState::Pending,
            CharState::Pending,
            CharState::Pending,
        ]
    );
    assert_eq!(session.mistakes(), 1);
}

#[test]
fn input_beyond_the_prompt_length_is_not_counted() {
    let mut session = practice("ab");
    session.handle_input("abzz", T0).unwrap();
    assert_eq!(session.mistakes(), 0, "overflow positions have no prompt char to disagree with");
    assert_eq!(session.status(), SessionStatus::Typing, "overlong input is not a completion");
}

#[test]
fn monotonic_total_survives_correction() {
    let mut session = practice("abc");
    session.handle_input("x", T0).unwrap();
    assert_eq!(session.total_mistakes(), 1);

    let update = session.handle_input("a", T0 + 100).unwrap();
    assert_eq!(session.mistakes(), 0);
    assert_eq!(session.total_mistakes(), 1, "correction never decrements the lifetime total");
    assert_eq!(update.hud.mistakes, 1);
}

#[test]
fn monotonic_total_accumulates_repeated_errors() {
    let mut session = practice("abcd");
    session.handle_input("x", T0).unwrap();
    session.handle_input("a", T0).unwrap();
    session.handle_input("ay", T0).unwrap();
    assert_eq!(session.total_mistakes(), 2);
}

#[test]
fn clamped_policy_lets_corrections_reduce_the_total() {
    let mut session = TypingSession::race("abc", LanguageCode::En, "ABCDE");
    session.handle_input("xy", T0).unwrap();
    assert_eq!(session.total_mistakes(), 2);

    session.handle_input("x", T0).unwrap();
    assert_eq!(session.total_mistakes(), 1);

    session.handle_input("", T0).unwrap();
    assert_eq!(session.total_mistakes(), 0, "clamped at zero, never negative");
}

// =============================================================================
// backspace guard
// =============================================================================

#[test]
fn deletion_at_the_first_mistake_is_allowed() {
    let mut session = practice("abcdef");
    session.handle_input("abz", T0).unwrap();

    // "abz" -> "ab": deletion point 2 == first mismatch 2.
    let update = session.handle_input("ab", T0 + 10);
    assert!(update.is_some());
    assert_eq!(session.input(), "ab");
}

#[test]
fn deletion_before_the_first_mistake_is_rejected() {
    let mut session = practice("abcdef");
    session.handle_input("abz", T0).unwrap();

    // "abz" -> "a": would erase the correct 'b' at index 1 < mismatch index 2.
    assert!(session.handle_input("a", T0 + 10).is_none());
    assert_eq!(session.input(), "abz", "rejected edits leave the input unchanged");
    assert_eq!(session.mistakes(), 1);
}

#[test]
fn fully_correct_input_may_be_erased() {
    let mut session = practice("abcdef");
    session.handle_input("abc", T0).unwrap();

    // No mismatch anywhere, so the guard has nothing to protect.
    assert!(session.handle_input("ab", T0 + 10).is_some());
    assert_eq!(session.input(), "ab");
}

#[test]
fn mismatch_is_found_in_the_previous_input_when_the_value_is_prefix_correct() {
    let mut session = practice("abcdef");
    session.handle_input("abcz", T0).unwrap();

    // "abcz" -> "abc" deletes exactly the wrong char; the shrunk value is
    // prefix-correct so the mismatch is located in the previous input.
    assert!(session.handle_input("abc", T0 + 10).is_some());
    // Once the mistake is gone the input is fully correct again and further
    // shrinking is unguarded.
    assert!(session.handle_input("ab", T0 + 20).is_some());
    assert_eq!(session.input(), "ab");
}

#[test]
fn growth_is_never_guarded() {
    let mut session = practice("abc");
    session.handle_input("ax", T0).unwrap();
    assert!(session.handle_input("axc", T0 + 10).is_some());
}

// =============================================================================
// metrics
// =============================================================================

#[test]
fn wpm_and_accuracy_match_the_reference_computation() {
    // 50-char prompt, 50 chars typed with 5 of them wrong, one minute in:
    // accuracy = round((50-5)/50*100) = 90, wpm = round(45/5/1) = 9.
    let prompt: String = "a".repeat(50);
    let mut session = practice(&prompt);

    let flawed = format!("{}{}", "a".repeat(45), "b".repeat(5));
    session.handle_input(&flawed, T0).unwrap();
    assert_eq!(session.total_mistakes(), 5);

    let hud = session.hud(T0 + 60_000);
    assert_eq!(hud.time_ms, 60_000);
    assert_eq!(hud.accuracy, 90);
    assert_eq!(hud.wpm, 9);
}

#[test]
fn accuracy_goes_negative_when_mistakes_exceed_typed_length() {
    let mut session = practice("abcdefgh");
    session.handle_input("xxxx", T0).unwrap();
    session.handle_input("x", T0).unwrap();
    session.handle_input("xzzz", T0).unwrap();
    // total mistakes 7 against 4 typed chars.
    assert_eq!(session.total_mistakes(), 7);
    let hud = session.hud(T0 + 1_000);
    assert_eq!(hud.accuracy, -75, "accuracy is deliberately unclamped");
}

#[test]
fn progress_tracks_input_length() {
    let mut session = practice("abcdefghij");
    assert_eq!(session.progress(), 0);
    let update = session.handle_input("abcde", T0).unwrap();
    assert_eq!(update.progress, 50);
}

// =============================================================================
// reset
// =============================================================================

#[test]
fn reset_reinitializes_every_field() {
    let mut session = practice("abc");
    session.handle_input("abx", T0).unwrap();
    session.reset(None);

    assert_eq!(session.status(), SessionStatus::Idle);
    assert_eq!(session.input(), "");
    assert_eq!(session.prompt(), "abc");
    assert_eq!(session.mistakes(), 0);
    assert_eq!(session.total_mistakes(), 0);
    assert_eq!(session.char_states(), &[CharState::Pending; 3]);
}

#[test]
fn reset_with_a_new_prompt_replaces_it() {
    let mut session = practice("abc");
    session.handle_input("abc", T0).unwrap();
    session.reset(Some("wxyz"));

    assert_eq!(session.prompt(), "wxyz");
    assert_eq!(session.status(), SessionStatus::Idle);
    assert_eq!(session.char_states().len(), 4);
    // A completed-then-reset session may complete (and log) again.
    let update = session.handle_input("wxyz", T0 + 1_000).unwrap();
    assert!(update.history.is_some());
}

#[test]
fn reset_ignores_an_empty_replacement_prompt() {
    let mut session = practice("abc");
    session.reset(Some(""));
    assert_eq!(session.prompt(), "abc");
}

// =============================================================================
// history sink
// =============================================================================

#[test]
fn memory_history_keeps_newest_first_and_caps_at_one_hundred() {
    let mut sink = MemoryHistory::new();
    for i in 0..110 {
        sink.append(HistoryRow {
            at: i,
            mode: HistoryMode::Practice,
            language: LanguageCode::En,
            wpm: 0,
            mistakes: 0,
            accuracy: 0,
            time_ms: 0,
            prompt_len: 0,
            room: None,
        });
    }

    assert_eq!(sink.rows().len(), 100);
    assert_eq!(sink.rows()[0].at, 109);
}
