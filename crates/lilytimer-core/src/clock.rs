//! Tick sources for the session.
//!
//! The session polls its [`TickSource`] only while a phase is active, so a
//! source never has to know about timer state.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::debug;

/// A recurring, payload-less clock pulse.
pub trait TickSource: Send {
    /// Resolve at the next tick.
    fn next_tick(&mut self) -> impl Future<Output = ()> + Send;

    /// Called when a work phase starts. The first tick after this must land
    /// one full period later, and anything buffered while idle is dropped.
    fn restart(&mut self) {}
}

/// Wall-clock ticks from `tokio::time::interval`.
///
/// Missed ticks are skipped, not replayed: time spent suspended is simply
/// not counted.
#[derive(Debug)]
pub struct IntervalTicks {
    interval: Interval,
}

impl IntervalTicks {
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    pub fn every_second() -> Self {
        Self::new(Self::DEFAULT_PERIOD)
    }
}

impl TickSource for IntervalTicks {
    async fn next_tick(&mut self) {
        self.interval.tick().await;
    }

    fn restart(&mut self) {
        self.interval.reset();
    }
}

/// Synthetic ticks fed through a [`TickSender`].
///
/// Ticks queued before [`TickSource::restart`] are discarded. Once every
/// sender is dropped the source never yields again.
#[derive(Debug)]
pub struct ManualTicks {
    rx: mpsc::UnboundedReceiver<()>,
}

/// Handle used by tests and hosts to inject ticks into a [`ManualTicks`].
#[derive(Debug, Clone)]
pub struct TickSender {
    tx: mpsc::UnboundedSender<()>,
}

impl ManualTicks {
    pub fn channel() -> (TickSender, ManualTicks) {
        let (tx, rx) = mpsc::unbounded_channel();
        (TickSender { tx }, ManualTicks { rx })
    }
}

impl TickSender {
    /// Queue one tick. Returns false if the receiving side is gone.
    pub fn tick(&self) -> bool {
        self.tx.send(()).is_ok()
    }

    /// Queue `n` ticks.
    pub fn ticks(&self, n: u64) -> bool {
        (0..n).all(|_| self.tick())
    }
}

impl TickSource for ManualTicks {
    async fn next_tick(&mut self) {
        if self.rx.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }

    fn restart(&mut self) {
        let mut dropped = 0u64;
        while self.rx.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, "discarded ticks queued while idle");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn manual_ticks_yield_in_order() {
        let (sender, mut ticks) = ManualTicks::channel();
        assert!(sender.ticks(2));
        ticks.next_tick().await;
        ticks.next_tick().await;
        drop(sender);
        let pending = tokio::time::timeout(Duration::from_millis(20), ticks.next_tick()).await;
        assert!(pending.is_err());
    }

    #[tokio::test]
    async fn restart_discards_queued_ticks() {
        let (sender, mut ticks) = ManualTicks::channel();
        assert!(sender.ticks(3));
        ticks.restart();
        let pending = tokio::time::timeout(Duration::from_millis(20), ticks.next_tick()).await;
        assert!(pending.is_err());

        assert!(sender.tick());
        ticks.next_tick().await;
    }

    #[tokio::test]
    async fn sender_reports_closed_receiver() {
        let (sender, ticks) = ManualTicks::channel();
        drop(ticks);
        assert!(!sender.tick());
    }

    #[tokio::test(start_paused = true)]
    async fn interval_first_tick_is_one_period_out() {
        let mut ticks = IntervalTicks::every_second();
        let started = Instant::now();
        ticks.next_tick().await;
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_pushes_next_tick_back() {
        let mut ticks = IntervalTicks::every_second();
        tokio::time::sleep(Duration::from_millis(700)).await;
        ticks.restart();
        let restarted = Instant::now();
        ticks.next_tick().await;
        assert!(restarted.elapsed() >= Duration::from_secs(1));
    }
}
