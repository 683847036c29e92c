use std::collections::HashMap;
use std::time::Duration;

use tokio::select;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::events::{TimerFired, TimerHandle, TimerKind};
use crate::schedule::{Scheduler, repeat_period};

/// [`Scheduler`] backed by tokio timers.
///
/// Each timer runs in its own task guarded by a child of the scheduler's
/// cancellation token, and reports expiries on the channel returned by
/// [`TokioScheduler::new`]. Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    tx: Sender<TimerFired>,
    cancel: CancellationToken,
    next_id: u64,
    timers: HashMap<TimerHandle, CancellationToken>,
}

impl TokioScheduler {
    pub fn new(cancel: CancellationToken, capacity: usize) -> (Self, Receiver<TimerFired>) {
        let (tx, rx) = mpsc::channel(capacity);
        let scheduler = Self {
            tx,
            cancel,
            next_id: 0,
            timers: HashMap::new(),
        };
        (scheduler, rx)
    }

    /// Timers started and not yet cancelled. Finished one-shot timers count
    /// until their owner cancels them.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    fn spawn(&mut self, kind: TimerKind, delay: Duration, period: Option<Duration>) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let token = self.cancel.child_token();
        let fired = TimerFired { handle, kind };
        let tx = self.tx.clone();
        let cancelled = token.clone();

        tokio::spawn(async move {
            match period {
                Some(period) => {
                    let mut ticks = interval_at(Instant::now() + period, period);
                    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    loop {
                        select! {
                            _ = cancelled.cancelled() => break,
                            _ = ticks.tick() => {}
                        }
                        if !deliver(&tx, fired, &cancelled).await {
                            break;
                        }
                    }
                }
                None => {
                    select! {
                        _ = cancelled.cancelled() => {}
                        _ = sleep(delay) => {
                            deliver(&tx, fired, &cancelled).await;
                        }
                    }
                }
            }
            trace!(?handle, %kind, "timer task finished");
        });

        self.timers.insert(handle, token);
        handle
    }
}

/// Send one expiry unless the timer is cancelled first. Returns `false` when
/// the timer should stop.
async fn deliver(tx: &Sender<TimerFired>, fired: TimerFired, cancelled: &CancellationToken) -> bool {
    select! {
        _ = cancelled.cancelled() => false,
        res = tx.send(fired) => res.is_ok(),
    }
}

impl Scheduler for TokioScheduler {
    fn repeat(&mut self, kind: TimerKind, period: Duration) -> TimerHandle {
        let period = repeat_period(period);
        self.spawn(kind, period, Some(period))
    }

    fn once(&mut self, kind: TimerKind, delay: Duration) -> TimerHandle {
        self.spawn(kind, delay, None)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(token) = self.timers.remove(&handle) {
            token.cancel();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, token) in self.timers.drain() {
            token.cancel();
        }
    }
}
