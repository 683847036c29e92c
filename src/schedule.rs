//! Timer scheduling capability injected into the carousel.
//!
//! The carousel never sleeps itself. It asks a [`Scheduler`] for repeating or
//! one-shot timers and receives their expiry back as [`TimerFired`] values.
//! [`VirtualScheduler`] runs on a simulated clock so behaviour over time can be
//! checked without real delays; the tokio-backed scheduler lives in
//! `tasks::timers`.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{trace, warn};

use crate::events::{TimerFired, TimerHandle, TimerKind};

pub trait Scheduler {
    /// Fire `kind` every `period` until cancelled. The first firing happens
    /// one full period from now.
    fn repeat(&mut self, kind: TimerKind, period: Duration) -> TimerHandle;

    /// Fire `kind` once after `delay`.
    fn once(&mut self, kind: TimerKind, delay: Duration) -> TimerHandle;

    /// Cancel a timer. Unknown or already finished handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Shortest period a repeating timer may run at.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Clamp a repeating period to [`MIN_PERIOD`]. A zero period would fire
/// forever at a single instant.
pub fn repeat_period(period: Duration) -> Duration {
    if period < MIN_PERIOD {
        warn!(
            period_ms = period.as_millis() as u64,
            "repeating period too short; using {}ms",
            MIN_PERIOD.as_millis()
        );
        return MIN_PERIOD;
    }
    period
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    kind: TimerKind,
    due: Duration,
    period: Option<Duration>,
}

/// Deterministic scheduler over a virtual clock starting at zero.
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<TimerHandle, Pending>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since construction.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers that have not been cancelled or completed.
    pub fn active_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of live timers of the given kind.
    pub fn active_of(&self, kind: TimerKind) -> usize {
        self.pending.values().filter(|p| p.kind == kind).count()
    }

    /// Time at which the earliest pending timer expires.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.values().map(|p| p.due).min()
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its expiry. Timers due at the same instant fire in scheduling order.
    /// Returns `None` and leaves the clock alone when nothing is due.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerFired> {
        let (handle, pending) = self
            .pending
            .iter()
            .filter(|(_, p)| p.due <= until)
            .min_by_key(|(handle, p)| (p.due, **handle))
            .map(|(h, p)| (*h, *p))?;

        self.now = self.now.max(pending.due);
        match pending.period {
            Some(period) => {
                if let Some(entry) = self.pending.get_mut(&handle) {
                    entry.due = pending.due + period;
                }
            }
            None => {
                self.pending.remove(&handle);
            }
        }
        trace!(
            ?handle,
            kind = %pending.kind,
            at_ms = self.now.as_millis() as u64,
            "virtual timer fired"
        );
        Some(TimerFired {
            handle,
            kind: pending.kind,
        })
    }

    /// Move the clock forward without firing anything.
    ///
    /// Callers are expected to drain [`Self::pop_due`] first; timers that
    /// were due are left pending and fire on the next poll.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    fn insert(&mut self, kind: TimerKind, delay: Duration, period: Option<Duration>) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.insert(
            handle,
            Pending {
                kind,
                due: self.now + delay,
                period,
            },
        );
        handle
    }
}

impl Scheduler for VirtualScheduler {
    fn repeat(&mut self, kind: TimerKind, period: Duration) -> TimerHandle {
        let period = repeat_period(period);
        self.insert(kind, period, Some(period))
    }

    fn once(&mut self, kind: TimerKind, delay: Duration) -> TimerHandle {
        self.insert(kind, delay, None)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn repeating_timer_rearms() {
        let mut s = VirtualScheduler::new();
        let h = s.repeat(TimerKind::AutoAdvance, ms(100));
        let fired: Vec<_> = std::iter::from_fn(|| s.pop_due(ms(350))).collect();
        assert_eq!(fired.len(), 3);
        assert!(fired.iter().all(|f| f.handle == h));
        assert_eq!(s.now(), ms(300));
        assert_eq!(s.next_due(), Some(ms(400)));
    }

    #[test]
    fn once_timer_fires_once_then_disappears() {
        let mut s = VirtualScheduler::new();
        s.once(TimerKind::FadeIn, ms(10));
        assert_eq!(s.pop_due(ms(5)), None);
        assert_eq!(s.pop_due(ms(20)).map(|f| f.kind), Some(TimerKind::FadeIn));
        assert_eq!(s.pop_due(ms(1_000)), None);
        assert_eq!(s.active_count(), 0);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut s = VirtualScheduler::new();
        let h = s.repeat(TimerKind::AutoAdvance, ms(100));
        s.cancel(h);
        s.cancel(h);
        s.cancel(TimerHandle(999));
        assert_eq!(s.active_count(), 0);
        assert_eq!(s.pop_due(ms(1_000)), None);
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut s = VirtualScheduler::new();
        let a = s.once(TimerKind::HideOverlay, ms(50));
        let b = s.once(TimerKind::FadeIn, ms(50));
        assert_eq!(s.pop_due(ms(50)).map(|f| f.handle), Some(a));
        assert_eq!(s.pop_due(ms(50)).map(|f| f.handle), Some(b));
    }

    #[test]
    fn zero_period_is_clamped() {
        let mut s = VirtualScheduler::new();
        s.repeat(TimerKind::AutoAdvance, Duration::ZERO);
        let fired = std::iter::from_fn(|| s.pop_due(ms(5))).take(100).count();
        assert_eq!(fired, 5);
        assert_eq!(s.next_due(), Some(ms(6)));
    }

    #[test]
    fn timers_start_from_current_virtual_time() {
        let mut s = VirtualScheduler::new();
        s.set_now(ms(1_000));
        s.once(TimerKind::FadeIn, ms(10));
        assert_eq!(s.next_due(), Some(ms(1_010)));
    }
}
