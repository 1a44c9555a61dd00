use std::sync::Once;

use hunter_core::{update, Effect, Msg, RunState};

static INIT: Once = Once::new();

fn apply_all(msgs: &[Msg]) -> (RunState, Vec<Effect>) {
    INIT.call_once(hunter_logging::initialize_for_tests);
    msgs.iter().fold((RunState::default(), Vec::new()), |(state, mut seen), msg| {
        let (state, effects) = update(state, *msg);
        seen.extend(effects);
        (state, seen)
    })
}

#[test]
fn run_starts_in_running() {
    assert_eq!(RunState::default(), RunState::Running);
}

#[test]
fn interrupt_toggles_pause_any_number_of_times() {
    let (state, effects) = apply_all(&[Msg::Interrupt, Msg::Interrupt, Msg::Interrupt]);
    assert_eq!(state, RunState::Paused);
    assert_eq!(effects, vec![Effect::Paused, Effect::Resumed, Effect::Paused]);

    let (state, _) = apply_all(&[Msg::Interrupt; 4]);
    assert_eq!(state, RunState::Running);
}

#[test]
fn terminate_stops_from_running_and_paused() {
    let (state, effects) = update(RunState::Running, Msg::Terminate);
    assert_eq!(state, RunState::Stopped);
    assert_eq!(effects, vec![Effect::Stopping]);

    let (state, effects) = update(RunState::Paused, Msg::Terminate);
    assert_eq!(state, RunState::Stopped);
    assert_eq!(effects, vec![Effect::Stopping]);
}

#[test]
fn stopped_is_terminal() {
    for msg in [Msg::Interrupt, Msg::Terminate] {
        let (state, effects) = update(RunState::Stopped, msg);
        assert_eq!(state, RunState::Stopped);
        assert!(effects.is_empty(), "{msg:?} produced {effects:?}");
    }
}

#[test]
fn interrupt_after_terminate_does_not_resume() {
    let (state, effects) = apply_all(&[Msg::Interrupt, Msg::Terminate, Msg::Interrupt]);
    assert_eq!(state, RunState::Stopped);
    assert_eq!(effects, vec![Effect::Paused, Effect::Stopping]);
}
