#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    /// Interrupt signal (Ctrl+C): toggles pause.
    Interrupt,
    /// Termination signal: stop the run.
    Terminate,
}
