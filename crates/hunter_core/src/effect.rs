/// Announcements produced by a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Paused,
    Resumed,
    Stopping,
}
