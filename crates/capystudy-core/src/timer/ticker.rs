//! Periodic tick source.
//!
//! A [`Ticker`] owns at most one tokio task that invokes a callback once per
//! period. Starting it again aborts the previous task first, and dropping it
//! aborts the task, so an engine driven through one `Ticker` never has two
//! concurrent tick sources.
//!
//! Late ticks are not caught up: the interval uses
//! [`MissedTickBehavior::Delay`], so a stalled runtime produces one late tick
//! rather than a burst.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any running task, then spawn a new one calling `on_tick` every
    /// `period`, first after one full period. The task ends when `on_tick`
    /// returns `ControlFlow::Break`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F, Fut>(&mut self, period: Duration, mut on_tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        self.cancel();

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if on_tick().await.is_break() {
                    break;
                }
            }
        });
        self.handle = Some(handle);
    }

    /// Abort the running task, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("ticker cancelled");
        }
    }

    /// Whether a task is spawned and has not finished.
    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counting(count: &Arc<AtomicU32>) -> impl FnMut() -> std::future::Ready<ControlFlow<()>> {
        let count = Arc::clone(count);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            std::future::ready(ControlFlow::Continue(()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let count = Arc::new(AtomicU32::new(0));
        let mut ticker = Ticker::new();
        ticker.start(Duration::from_secs(1), counting(&count));

        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(ticker.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_previous_task() {
        let count = Arc::new(AtomicU32::new(0));
        let mut ticker = Ticker::new();
        ticker.start(Duration::from_secs(1), counting(&count));
        ticker.start(Duration::from_secs(1), counting(&count));

        time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticks() {
        let count = Arc::new(AtomicU32::new(0));
        let mut ticker = Ticker::new();
        ticker.start(Duration::from_secs(1), counting(&count));

        time::sleep(Duration::from_millis(1500)).await;
        ticker.cancel();
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!ticker.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_ticks() {
        let count = Arc::new(AtomicU32::new(0));
        {
            let mut ticker = Ticker::new();
            ticker.start(Duration::from_secs(1), counting(&count));
            time::sleep(Duration::from_millis(1500)).await;
        }
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn break_ends_task() {
        let count = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&count);
        let mut ticker = Ticker::new();
        ticker.start(Duration::from_secs(1), move || {
            let n = c.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(if n >= 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            })
        });

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!ticker.is_active());
    }
}
