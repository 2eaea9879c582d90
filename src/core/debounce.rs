//! Reusable debounce for input-driven requests.
//!
//! Every [`Debouncer::schedule`] or [`Debouncer::cancel`] bumps a generation
//! counter. A scheduled task waits out the delay and proceeds only if its
//! ticket is still the newest, so a burst of keystrokes collapses into the
//! last one.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use gloo_timers::future::TimeoutFuture;

pub type SleepFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a>>;

/// Timer source.
pub trait Sleeper {
    fn sleep(&self, ms: u32) -> SleepFuture<'_>;
}

/// `setTimeout`-backed sleeper.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimerSleeper;

impl Sleeper for TimerSleeper {
    fn sleep(&self, ms: u32) -> SleepFuture<'_> {
        Box::pin(TimeoutFuture::new(ms))
    }
}

/// Identifies one scheduled run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Clone, Debug)]
pub struct Debouncer<S> {
    sleeper: S,
    delay_ms: u32,
    generation: Arc<AtomicU64>,
}

impl<S: Sleeper> Debouncer<S> {
    pub fn new(sleeper: S, delay_ms: u32) -> Self {
        Self {
            sleeper,
            delay_ms,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Start a new window, superseding any pending one.
    pub fn schedule(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Supersede any pending window without starting a new one.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Wait out the delay. `true` if `ticket` survived it.
    pub async fn settle(&self, ticket: Ticket) -> bool {
        self.sleeper.sleep(self.delay_ms).await;
        self.is_current(ticket)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::mock::TokioSleeper;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_ticket_settles() {
        let debouncer = Debouncer::new(TokioSleeper, 300);
        let first = debouncer.schedule();
        let early = debouncer.settle(first);
        let late = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let second = debouncer.schedule();
            debouncer.settle(second).await
        };
        let (early, late) = tokio::join!(early, late);
        assert!(!early);
        assert!(late);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_waits_full_delay() {
        let debouncer = Debouncer::new(TokioSleeper, 300);
        let start = tokio::time::Instant::now();
        let ticket = debouncer.schedule();
        assert!(debouncer.settle(ticket).await);
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_invalidates() {
        let debouncer = Debouncer::new(TokioSleeper, 50);
        let ticket = debouncer.schedule();
        debouncer.cancel();
        assert!(!debouncer.settle(ticket).await);
    }
}
