/// Process-wide run state, driven by operator signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Running,
    Paused,
    /// Terminal: no new network call starts once stopped.
    Stopped,
}

impl RunState {
    pub fn is_stopped(self) -> bool {
        self == RunState::Stopped
    }
}
