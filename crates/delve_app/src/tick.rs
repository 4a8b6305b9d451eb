//! Session tick loop.
//!
//! Each tick runs, under the session lock:
//!
//! 1. Apply every input command queued since the previous tick.
//! 2. Run the system collection once, in order.
//!
//! Between ticks the loop waits one period on the stop signal. A tick that
//! overruns its period delays the next one; missed ticks are not caught up.

use std::sync::Arc;
use std::time::{Duration, Instant};

use delve_component::Components;
use delve_net::{InputReceiver, apply_pending};
use delve_system::SystemCollection;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::config::TickConfig;

/// Timing summary over one statistics window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSummary {
    pub ticks: u64,
    pub min_ms: f64,
    pub avg_ms: f64,
    pub max_ms: f64,
}

/// Accumulates tick durations and summarises them every `window` ticks.
#[derive(Debug)]
pub struct TickStats {
    window: u64,
    count: u64,
    total: Duration,
    min: Duration,
    max: Duration,
}

impl TickStats {
    #[must_use]
    pub fn new(window: u64) -> Self {
        Self {
            window,
            count: 0,
            total: Duration::ZERO,
            min: Duration::MAX,
            max: Duration::ZERO,
        }
    }

    /// Record one tick. Returns the summary, and resets, when the window
    /// fills.
    pub fn record(&mut self, elapsed: Duration) -> Option<StatsSummary> {
        if self.window == 0 {
            return None;
        }
        self.count += 1;
        self.total += elapsed;
        self.min = self.min.min(elapsed);
        self.max = self.max.max(elapsed);
        if self.count < self.window {
            return None;
        }

        let summary = StatsSummary {
            ticks: self.count,
            min_ms: self.min.as_secs_f64() * 1000.0,
            avg_ms: self.total.as_secs_f64() * 1000.0 / self.count as f64,
            max_ms: self.max.as_secs_f64() * 1000.0,
        };
        *self = Self::new(self.window);
        Some(summary)
    }
}

/// A session's tick loop state.
#[derive(Debug)]
pub struct TickLoop {
    /// Ticks executed so far.
    tick_id: u64,
    config: TickConfig,
    components: Arc<Mutex<Components>>,
    systems: SystemCollection,
    inputs: InputReceiver,
    stats: TickStats,
}

impl TickLoop {
    #[must_use]
    pub fn new(
        config: TickConfig,
        components: Arc<Mutex<Components>>,
        systems: SystemCollection,
        inputs: InputReceiver,
    ) -> Self {
        let stats = TickStats::new(config.stats_window);
        Self {
            tick_id: 0,
            config,
            components,
            systems,
            inputs,
            stats,
        }
    }

    /// Returns the number of ticks executed.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Run one tick and return how long it took.
    pub fn tick(&mut self) -> Duration {
        let start = Instant::now();
        self.tick_id += 1;
        {
            let mut components = self.components.lock();
            let applied = apply_pending(&mut self.inputs, &mut components);
            if applied > 0 {
                debug!(tick_id = self.tick_id, applied, "applied input commands");
            }
            self.systems.update(&mut components, self.tick_id);
        }
        let elapsed = start.elapsed();

        if let Some(summary) = self.stats.record(elapsed) {
            info!(
                tick_id = self.tick_id,
                ticks = summary.ticks,
                min_ms = summary.min_ms,
                avg_ms = summary.avg_ms,
                max_ms = summary.max_ms,
                "tick timing"
            );
        }
        elapsed
    }

    /// Tick once per period until `stop` fires (or its sender is dropped)
    /// or `max_ticks` is reached. Returns the number of ticks executed by
    /// this call.
    pub async fn run(&mut self, mut stop: oneshot::Receiver<()>) -> u64 {
        let period = self.config.period();
        let mut executed = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            systems = ?self.systems.names(),
            "starting tick loop"
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut stop => {
                    debug!(tick_id = self.tick_id, "stop signal received");
                    break;
                }
                () = tokio::time::sleep(period) => {}
            }

            let elapsed = self.tick();
            executed += 1;

            if elapsed > period {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = period.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }

            if self.config.max_ticks > 0 && executed >= self.config.max_ticks {
                info!(ticks = executed, "tick limit reached");
                break;
            }
        }

        info!(ticks = executed, "tick loop stopped");
        executed
    }
}
