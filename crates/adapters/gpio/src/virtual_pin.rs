//! Virtual pin — stands in for GPIO on machines without hardware access.
//!
//! As an output it only remembers the last level. As an input it
//! synthesizes a rising edge every `edge_interval`, so the motion pipeline
//! behaves the same as on a Raspberry Pi.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use pumpkinpi_app::ports::{Edge, InputPin, Level, OutputPin};
use pumpkinpi_domain::error::PumpkinError;

/// Interval between synthetic edges when none is configured.
pub const DEFAULT_EDGE_INTERVAL: Duration = Duration::from_secs(5);

struct Watchers {
    tasks: Vec<JoinHandle<()>>,
    senders: Vec<mpsc::Sender<Edge>>,
}

/// A simulated GPIO line.
pub struct VirtualPin {
    label: String,
    level: Mutex<Level>,
    edge_interval: Option<Duration>,
    buffer: usize,
    watchers: Mutex<Watchers>,
}

impl VirtualPin {
    /// An output that starts low.
    #[must_use]
    pub fn output(label: impl Into<String>) -> Self {
        Self::new(label.into(), None, 1)
    }

    /// An input firing a synthetic edge every `edge_interval`.
    ///
    /// With `None`, edges only come from [`trigger`](Self::trigger).
    #[must_use]
    pub fn input(label: impl Into<String>, edge_interval: Option<Duration>, buffer: usize) -> Self {
        Self::new(label.into(), edge_interval, buffer.max(1))
    }

    fn new(label: String, edge_interval: Option<Duration>, buffer: usize) -> Self {
        Self {
            label,
            level: Mutex::new(Level::Low),
            edge_interval,
            buffer,
            watchers: Mutex::new(Watchers {
                tasks: Vec::new(),
                senders: Vec::new(),
            }),
        }
    }

    /// Last level written.
    #[must_use]
    pub fn level(&self) -> Level {
        *self.level.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver an edge to every current watcher right away.
    pub fn trigger(&self) {
        let edge = Edge::now();
        self.lock_watchers()
            .senders
            .retain(|tx| !matches!(tx.try_send(edge), Err(TrySendError::Closed(_))));
        tracing::debug!(pin = %self.label, "virtual edge triggered");
    }

    fn lock_watchers(&self) -> MutexGuard<'_, Watchers> {
        self.watchers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OutputPin for VirtualPin {
    fn write(&self, level: Level) -> Result<(), PumpkinError> {
        *self.level.lock().unwrap_or_else(PoisonError::into_inner) = level;
        tracing::debug!(pin = %self.label, ?level, "virtual pin written");
        Ok(())
    }
}

impl InputPin for VirtualPin {
    fn watch(&self) -> Result<mpsc::Receiver<Edge>, PumpkinError> {
        let (tx, rx) = mpsc::channel(self.buffer);
        let mut watchers = self.lock_watchers();

        if let Some(period) = self.edge_interval {
            let ticker_tx = tx.clone();
            let label = self.label.clone();
            watchers.tasks.push(tokio::spawn(async move {
                let mut ticker =
                    tokio::time::interval_at(tokio::time::Instant::now() + period, period);
                loop {
                    ticker.tick().await;
                    match ticker_tx.try_send(Edge::now()) {
                        Ok(()) => tracing::debug!(pin = %label, "synthetic edge"),
                        Err(TrySendError::Full(_)) => {
                            tracing::debug!(pin = %label, "synthetic edge dropped");
                        }
                        Err(TrySendError::Closed(_)) => break,
                    }
                }
            }));
        }
        watchers.senders.push(tx);
        Ok(rx)
    }

    fn unwatch_all(&self) {
        let mut watchers = self.lock_watchers();
        for task in watchers.tasks.drain(..) {
            task.abort();
        }
        watchers.senders.clear();
    }
}
