use std::sync::Arc;

use hunter_core::{update, Effect, Msg, RunState};
use hunter_logging::hunter_debug;
use tokio::sync::watch;

/// Answer of a [`RunControl::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    Proceed,
    Stop,
}

/// Shared handle over the process-wide [`RunState`].
///
/// Cloned into every task. Only the signal boundary calls [`RunControl::apply`];
/// tasks only read and wait.
#[derive(Debug, Clone)]
pub struct RunControl {
    tx: Arc<watch::Sender<RunState>>,
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new()
    }
}

impl RunControl {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(RunState::Running);
        Self { tx: Arc::new(tx) }
    }

    pub fn state(&self) -> RunState {
        *self.tx.borrow()
    }

    pub fn is_stopped(&self) -> bool {
        self.state().is_stopped()
    }

    /// Runs the transition atomically and wakes waiting tasks when the state changed.
    pub fn apply(&self, msg: Msg) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.tx.send_if_modified(|state| {
            let (next, produced) = update(*state, msg);
            effects = produced;
            let changed = next != *state;
            if changed {
                hunter_debug!("run state {:?} -> {:?}", *state, next);
            }
            *state = next;
            changed
        });
        effects
    }

    pub fn pause(&self) -> Vec<Effect> {
        if self.state() == RunState::Running {
            self.apply(Msg::Interrupt)
        } else {
            Vec::new()
        }
    }

    pub fn resume(&self) -> Vec<Effect> {
        if self.state() == RunState::Paused {
            self.apply(Msg::Interrupt)
        } else {
            Vec::new()
        }
    }

    pub fn stop(&self) -> Vec<Effect> {
        self.apply(Msg::Terminate)
    }

    /// Returns once the run may touch the network, or is stopped.
    ///
    /// While paused this parks on the watch channel; no polling.
    pub async fn checkpoint(&self) -> Checkpoint {
        let mut rx = self.tx.subscribe();
        let state = match rx.wait_for(|state| *state != RunState::Paused).await {
            Ok(state) => *state,
            // The sender lives as long as `self`.
            Err(_) => RunState::Stopped,
        };
        match state {
            RunState::Stopped => Checkpoint::Stop,
            RunState::Running | RunState::Paused => Checkpoint::Proceed,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn running_passes_checkpoint() {
        let control = RunControl::new();
        assert_eq!(control.checkpoint().await, Checkpoint::Proceed);
    }

    #[tokio::test]
    async fn paused_checkpoint_waits_for_resume() {
        let control = RunControl::new();
        assert_eq!(control.pause(), vec![Effect::Paused]);

        let waiter = {
            let control = control.clone();
            tokio::spawn(async move { control.checkpoint().await })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!waiter.is_finished());

        assert_eq!(control.resume(), vec![Effect::Resumed]);
        assert_eq!(waiter.await.unwrap(), Checkpoint::Proceed);
    }

    #[tokio::test]
    async fn stop_releases_paused_waiters() {
        let control = RunControl::new();
        control.pause();

        let waiter = {
            let control = control.clone();
            tokio::spawn(async move { control.checkpoint().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        control.stop();

        assert_eq!(waiter.await.unwrap(), Checkpoint::Stop);
        assert!(control.is_stopped());
        assert!(control.resume().is_empty());
    }
}
