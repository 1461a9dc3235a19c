//! One-second study timer
//!
//! Runs as a tokio task that sends a tick per elapsed second. The task stops
//! as soon as the timer is stopped or dropped, so leaving the reader never
//! leaves a timer behind.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Tick sent once per second while the timer runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudyTick;

/// A running study timer
#[derive(Debug)]
pub struct StudyTimer {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl StudyTimer {
    pub const PERIOD: Duration = Duration::from_secs(1);

    /// Start ticking into `tx`. The first tick arrives one period from now.
    pub fn start(tx: mpsc::Sender<StudyTick>) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + Self::PERIOD;
            let mut interval = tokio::time::interval_at(start, Self::PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        if tx.send(StudyTick).await.is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("Study timer stopped");
        });

        Self { cancel, handle }
    }

    /// Stop the timer. No tick is sent after this returns.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.handle.is_finished()
    }
}

impl Drop for StudyTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_every_second() {
        let (tx, mut rx) = mpsc::channel(16);
        let timer = StudyTimer::start(tx);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let mut ticks = 0;
        while rx.try_recv().is_ok() {
            ticks += 1;
        }
        assert_eq!(ticks, 3);
        assert!(timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_ticks() {
        let (tx, mut rx) = mpsc::channel(16);
        let timer = StudyTimer::start(tx);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        timer.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;

        let mut ticks = 0;
        while rx.try_recv().is_ok() {
            ticks += 1;
        }
        assert_eq!(ticks, 1);
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_closes_channel() {
        let (tx, mut rx) = mpsc::channel(16);
        drop(StudyTimer::start(tx));
        // The task exits and drops its sender
        assert_eq!(rx.recv().await, None);
    }
}
