use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::{FutureExt, Stream};
use hunter_core::{NetworkErrorKind, ProbeOutcome, ProbeReport, ProbeTask, WorkPlan};
use hunter_logging::{hunter_debug, hunter_warn};
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};

use crate::control::{Checkpoint, RunControl};
use crate::probe::{ProbeSession, Prober};

pub const DEFAULT_CONCURRENCY: usize = 5;

/// Runs a [`WorkPlan`] through a [`Prober`] with at most `concurrency`
/// probes in flight.
pub struct Dispatcher<P> {
    prober: Arc<P>,
    control: RunControl,
    concurrency: usize,
}

impl<P> Dispatcher<P>
where
    P: Prober + 'static,
{
    pub fn new(prober: Arc<P>, control: RunControl) -> Self {
        Self {
            prober,
            control,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Starts the run on the current tokio runtime.
    ///
    /// Reports arrive in completion order. The stream yields exactly
    /// [`WorkPlan::total`] items and then ends.
    ///
    /// Every admitted task holds a reserved place in the report channel, so
    /// running tasks plus unread reports never exceed twice the concurrency
    /// however slowly the stream is drained.
    pub fn run(&self, plan: WorkPlan) -> ReportStream {
        let total = plan.total();
        let (tx, rx) = mpsc::channel(self.concurrency * 2);
        let gate = Arc::new(Semaphore::new(self.concurrency));

        hunter_debug!(
            "dispatching {total} probes over {} address(es), concurrency {}",
            plan.addresses.len(),
            self.concurrency
        );

        let producer = Producer {
            prober: self.prober.clone(),
            control: self.control.clone(),
            gate,
            tx,
        };
        tokio::spawn(producer.run(plan));

        ReportStream { rx, total }
    }
}

struct Producer<P> {
    prober: Arc<P>,
    control: RunControl,
    gate: Arc<Semaphore>,
    tx: mpsc::Sender<ProbeReport>,
}

impl<P> Producer<P>
where
    P: Prober + 'static,
{
    async fn run(self, plan: WorkPlan) {
        for address in plan.addresses.iter() {
            // Opened lazily so a stopped run does not build clients it never uses.
            let mut session: Option<Result<Arc<P::Session>, String>> = None;

            for task in plan.tasks_for(address) {
                // A task is only admitted once its report has room in the
                // channel, so an idle reader stalls enumeration here.
                let Ok(slot) = self.tx.clone().reserve_owned().await else {
                    hunter_debug!("report stream dropped, abandoning the run");
                    return;
                };

                if self.control.is_stopped() {
                    slot.send(ProbeReport {
                        task,
                        outcome: ProbeOutcome::Cancelled,
                    });
                    continue;
                }

                let Ok(permit) = self.gate.clone().acquire_owned().await else {
                    // The gate is never closed.
                    return;
                };

                let opened = session.get_or_insert_with(|| {
                    self.prober
                        .open_session(address, &plan.domains)
                        .map_err(|err| {
                            hunter_warn!("cannot prepare probes for {address}: {err}");
                            err.to_string()
                        })
                });

                match opened {
                    Ok(session) => self.spawn_probe(session.clone(), task, permit, slot),
                    Err(message) => {
                        drop(permit);
                        let outcome =
                            ProbeOutcome::network_error(NetworkErrorKind::Other, message.clone());
                        slot.send(ProbeReport { task, outcome });
                    }
                }
            }
        }
    }

    fn spawn_probe(
        &self,
        session: Arc<P::Session>,
        task: ProbeTask,
        permit: OwnedSemaphorePermit,
        slot: mpsc::OwnedPermit<ProbeReport>,
    ) {
        let control = self.control.clone();

        tokio::spawn(async move {
            let outcome = match control.checkpoint().await {
                Checkpoint::Stop => ProbeOutcome::Cancelled,
                Checkpoint::Proceed => AssertUnwindSafe(session.probe(&task))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        ProbeOutcome::network_error(NetworkErrorKind::Other, "probe panicked")
                    }),
            };
            drop(permit);
            drop(session);
            slot.send(ProbeReport { task, outcome });
        });
    }
}

/// Live stream of [`ProbeReport`]s from one run.
#[derive(Debug)]
pub struct ReportStream {
    rx: mpsc::Receiver<ProbeReport>,
    total: u64,
}

impl ReportStream {
    /// Number of reports the stream will yield.
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl Stream for ReportStream {
    type Item = ProbeReport;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<ProbeReport>> {
        self.rx.poll_recv(cx)
    }
}
