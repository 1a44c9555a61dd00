//! Turns process signals into run-state transitions.
//!
//! Ctrl+C toggles pause. SIGTERM stops the run; in-flight probes still
//! finish. A Ctrl+C after the run is already stopping exits at once.

use std::io;

use colored::{ColoredString, Colorize};
use hunter_core::{Effect, Msg};
use hunter_engine::RunControl;
use hunter_logging::{hunter_info, hunter_warn};
use indicatif::ProgressBar;
use tokio::signal;
use tokio::task::JoinHandle;

pub const INTERRUPTED_EXIT_CODE: i32 = 130;

pub fn interrupted_notice() -> ColoredString {
    "Script interrupted.".red()
}

pub fn announcement(effect: Effect) -> ColoredString {
    match effect {
        Effect::Paused => "Pausing script. Press Ctrl+C again to resume.".yellow(),
        Effect::Resumed => "Resuming script...".yellow(),
        Effect::Stopping => "Stopping script...".red(),
    }
}

/// Listens for signals until the returned task is aborted.
pub fn spawn(control: RunControl, bar: ProgressBar) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(err) = listen(&control, &bar).await {
            hunter_warn!("signal handling stopped: {err}");
        }
    })
}

async fn listen(control: &RunControl, bar: &ProgressBar) -> io::Result<()> {
    let mut signals = Signals::new()?;
    loop {
        let msg = signals.next().await?;
        if msg == Msg::Interrupt && control.is_stopped() {
            bar.println(interrupted_notice().to_string());
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }

        hunter_info!("received {msg:?} in state {:?}", control.state());
        for effect in control.apply(msg) {
            bar.println(announcement(effect).to_string());
        }
    }
}

#[cfg(unix)]
struct Signals {
    terminate: signal::unix::Signal,
}

#[cfg(unix)]
impl Signals {
    fn new() -> io::Result<Self> {
        let terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        Ok(Self { terminate })
    }

    async fn next(&mut self) -> io::Result<Msg> {
        tokio::select! {
            result = signal::ctrl_c() => result.map(|()| Msg::Interrupt),
            Some(()) = self.terminate.recv() => Ok(Msg::Terminate),
        }
    }
}

#[cfg(not(unix))]
struct Signals;

#[cfg(not(unix))]
impl Signals {
    fn new() -> io::Result<Self> {
        Ok(Self)
    }

    async fn next(&mut self) -> io::Result<Msg> {
        signal::ctrl_c().await.map(|()| Msg::Interrupt)
    }
}
