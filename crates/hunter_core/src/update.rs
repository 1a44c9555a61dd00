use crate::{Effect, Msg, RunState};

/// Pure update function: applies a signal to the run state and returns any effects.
pub fn update(state: RunState, msg: Msg) -> (RunState, Vec<Effect>) {
    match (state, msg) {
        (RunState::Running, Msg::Interrupt) => (RunState::Paused, vec![Effect::Paused]),
        (RunState::Paused, Msg::Interrupt) => (RunState::Running, vec![Effect::Resumed]),
        (RunState::Running | RunState::Paused, Msg::Terminate) => {
            (RunState::Stopped, vec![Effect::Stopping])
        }
        // Stopped is terminal.
        (RunState::Stopped, _) => (state, Vec::new()),
    }
}
