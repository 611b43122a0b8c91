//! Property tests for the focus timer and the study desk.
//!
//! These exercise the countdown state machine through its public API only,
//! including the persistence side effects of a completed focus session.

use capystudy_core::events::Event;
use capystudy_core::storage::keys;
use capystudy_core::{MemoryStore, Store, StudyDesk, Subject, SubjectBook, TimerConfig, TimerEngine, TimerMode, TimerState};
use proptest::prelude::*;

fn engine_with(focus: u32, brk: u32) -> TimerEngine {
    let mut engine = TimerEngine::new(TimerConfig::new(focus, brk).unwrap());
    engine.select_subject(Some("1".into()));
    engine
}

fn single_subject_store(total: u64) -> Store {
    let store = Store::new(MemoryStore::new());
    store.write(
        keys::SUBJECTS,
        &SubjectBook::from_subjects(vec![Subject {
            id: "1".into(),
            name: "Mathematics".into(),
            color: "#3b82f6".into(),
            total_time_studied: total,
        }]),
    );
    store
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// A full focus countdown completes exactly once and resets to Idle(Focus).
    #[test]
    fn test_full_focus_countdown_completes_once(focus in 1u32..=30) {
        let mut engine = engine_with(focus, 5);
        engine.start();
        let completions: Vec<Event> = (0..u64::from(focus) * 60).filter_map(|_| engine.tick()).collect();

        prop_assert_eq!(completions.len(), 1);
        match &completions[0] {
            Event::FocusSessionCompleted { subject_id, minutes, .. } => {
                prop_assert_eq!(subject_id.as_str(), "1");
                prop_assert_eq!(*minutes, focus);
            }
            other => prop_assert!(false, "unexpected event {:?}", other),
        }
        prop_assert_eq!(engine.state(), TimerState::Idle);
        prop_assert_eq!(engine.mode(), TimerMode::Focus);
        prop_assert_eq!(engine.seconds_remaining(), u64::from(focus) * 60);
    }

    /// Pause then start never changes the remaining time.
    #[test]
    fn test_pause_resume_preserves_remaining(focus in 1u32..=60, ticks in 0u64..3600) {
        let mut engine = engine_with(focus, 5);
        engine.start();
        for _ in 0..ticks.min(u64::from(focus) * 60 - 1) {
            engine.tick();
        }
        let before = engine.seconds_remaining();
        engine.pause();
        engine.start();
        prop_assert_eq!(engine.seconds_remaining(), before);
        prop_assert_eq!(engine.state(), TimerState::Running);
    }

    /// Reset always restores the configured duration of the current mode.
    #[test]
    fn test_reset_restores_mode_duration(
        focus in 1u32..=90,
        brk in 1u32..=30,
        rest in any::<bool>(),
        ticks in 0u64..120,
    ) {
        let mut engine = engine_with(focus, brk);
        if rest {
            engine.switch_mode(TimerMode::ShortBreak);
        }
        engine.start();
        for _ in 0..ticks.min(u64::from(brk.min(focus)) * 60 - 1) {
            engine.tick();
        }
        engine.reset();
        let expected = if rest { brk } else { focus };
        prop_assert_eq!(engine.seconds_remaining(), u64::from(expected) * 60);
        prop_assert_eq!(engine.state(), TimerState::Idle);
    }

    /// Changing focus minutes applies at once when idle in Focus and is
    /// deferred while running.
    #[test]
    fn test_focus_change_timing(initial in 1u32..=60, changed in 1u32..=60) {
        let mut idle = engine_with(initial, 5);
        idle.set_focus_minutes(changed).unwrap();
        prop_assert_eq!(idle.seconds_remaining(), u64::from(changed) * 60);

        let mut running = engine_with(initial, 5);
        running.start();
        running.tick();
        running.set_focus_minutes(changed).unwrap();
        prop_assert_eq!(running.seconds_remaining(), u64::from(initial) * 60 - 1);
        running.reset();
        prop_assert_eq!(running.seconds_remaining(), u64::from(changed) * 60);
    }

    /// Switching mode while running is rejected with nothing changed.
    #[test]
    fn test_switch_mode_rejected_while_running(focus in 1u32..=60, ticks in 0u64..60) {
        let mut engine = engine_with(focus, 5);
        engine.start();
        for _ in 0..ticks {
            engine.tick();
        }
        let remaining = engine.seconds_remaining();
        prop_assert!(engine.switch_mode(TimerMode::ShortBreak).is_none());
        prop_assert_eq!(engine.mode(), TimerMode::Focus);
        prop_assert_eq!(engine.seconds_remaining(), remaining);
        prop_assert_eq!(engine.state(), TimerState::Running);
    }

    /// Crediting an unknown subject changes nothing.
    #[test]
    fn test_unknown_subject_credit_is_noop(id in "[a-z]{3,8}", minutes in 1u32..500) {
        let mut book = SubjectBook::default();
        let before = book.clone();
        prop_assert!(!book.add_minutes(&id, minutes));
        prop_assert_eq!(book, before);
    }
}

#[test]
fn test_deleting_only_subject_is_noop() {
    let mut desk = StudyDesk::open(single_subject_store(120));
    assert!(!desk.delete_subject("1"));
    assert_eq!(desk.subjects().len(), 1);
    assert_eq!(desk.engine().selected_subject_id(), Some("1"));
}

#[test]
fn test_twenty_five_minute_session_credits_subject() {
    let store = single_subject_store(120);
    let mut desk = StudyDesk::open(store);
    assert_eq!(desk.engine().config(), TimerConfig::new(25, 5).unwrap());
    desk.select_subject("1").unwrap();
    desk.start();

    let events: Vec<Event> = (0..1500).filter_map(|_| desk.tick()).collect();

    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        Event::FocusSessionCompleted { subject_id, minutes: 25, .. } if subject_id == "1"
    ));
    assert_eq!(desk.subjects().get("1").unwrap().total_time_studied, 145);
    assert_eq!(desk.engine().state(), TimerState::Idle);
    assert_eq!(desk.engine().mode(), TimerMode::Focus);
    assert_eq!(desk.engine().seconds_remaining(), 1500);

    let stored: SubjectBook = desk.store().read_or_default(keys::SUBJECTS);
    assert_eq!(stored.get("1").unwrap().total_time_studied, 145);
}

#[test]
fn test_break_completion_credits_nothing() {
    let mut desk = StudyDesk::open(single_subject_store(120));
    desk.set_break_minutes(1).unwrap();
    desk.switch_mode(TimerMode::ShortBreak);
    desk.start();
    let events: Vec<Event> = (0..60).filter_map(|_| desk.tick()).collect();

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Event::TimerCompleted { mode: TimerMode::ShortBreak, .. }));
    assert_eq!(desk.subjects().get("1").unwrap().total_time_studied, 120);
    assert_eq!(desk.engine().mode(), TimerMode::ShortBreak);
}
