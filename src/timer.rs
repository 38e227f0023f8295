use crate::utils::format_time_ms;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Wall-clock stopwatch for a quiz attempt. Elapsed time only moves on
/// `tick` or `stop`, so the displayed value is whatever was last sampled.
#[derive(Debug, Clone)]
pub struct QuizTimer {
    clock: Arc<dyn Clock>,
    started_at: Option<u64>,
    elapsed_ms: u64,
    running: bool,
}

impl QuizTimer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            started_at: None,
            elapsed_ms: 0,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.started_at = Some(self.clock.now_ms());
        self.elapsed_ms = 0;
        self.running = true;
    }

    pub fn tick(&mut self) {
        if self.running {
            self.sample();
        }
    }

    /// Stop ticking and take one final sample so the last partial interval
    /// is not lost.
    pub fn stop(&mut self) {
        self.running = false;
        self.sample();
    }

    pub fn reset(&mut self) {
        self.started_at = None;
        self.elapsed_ms = 0;
        self.running = false;
    }

    pub fn set_elapsed(&mut self, elapsed_ms: u64) {
        self.elapsed_ms = elapsed_ms;
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn display(&self) -> String {
        format_time_ms(self.elapsed_ms)
    }

    fn sample(&mut self) {
        if let Some(started_at) = self.started_at {
            let elapsed = self.clock.now_ms().saturating_sub(started_at);
            self.elapsed_ms = self.elapsed_ms.max(elapsed);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

/// Periodic tick source. Aborted on `stop` and on drop.
#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, period: Duration, tx: mpsc::UnboundedSender<Tick>) {
        self.stop();
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(Tick).is_err() {
                    break;
                }
            }
        }));
        tracing::debug!("ticker started");
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("ticker stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
