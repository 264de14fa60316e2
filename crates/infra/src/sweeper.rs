//! Periodic expiry sweep runner.
//!
//! Runs `InventoryService::release_expired_holds` on a background thread:
//! once on startup, then every `interval`, plus whenever triggered.

use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use stockhold_inventory::{InventoryService, SweepReport};

/// Upper bound on how long the loop sleeps before re-checking triggers.
const MAX_IDLE: Duration = Duration::from_millis(250);

/// Config for the expiry sweep runner.
#[derive(Debug, Clone)]
pub struct ExpirySweeper {
    /// How often to sweep.
    pub interval: Duration,
    /// Holds older than this are expired.
    pub hold_ttl: Duration,
}

impl Default for ExpirySweeper {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            hold_ttl: Duration::from_secs(15 * 60),
        }
    }
}

impl ExpirySweeper {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_hold_ttl(mut self, hold_ttl: Duration) -> Self {
        self.hold_ttl = hold_ttl;
        self
    }

    /// Spawn the runner thread.
    ///
    /// The thread stops on `handle.shutdown()` or when the handle is dropped.
    pub fn spawn(
        &self,
        name: &str,
        service: Arc<InventoryService>,
    ) -> std::io::Result<ExpirySweeperHandle> {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let (trigger_tx, trigger_rx) = mpsc::sync_channel::<()>(1);
        let stats = Arc::new(Mutex::new(SweeperStats::default()));

        let cfg = self.clone();
        let loop_stats = stats.clone();
        let runner = name.to_string();
        let join = thread::Builder::new().name(name.to_string()).spawn(move || {
            sweeper_loop(&runner, cfg, service, shutdown_rx, trigger_rx, loop_stats)
        })?;

        Ok(ExpirySweeperHandle {
            shutdown: shutdown_tx,
            trigger: trigger_tx,
            join: Some(join),
            stats,
        })
    }
}

/// Cumulative sweep statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweeperStats {
    pub sweeps: u64,
    pub holds_released: u64,
    pub units_released: u64,
}

impl SweeperStats {
    fn record(&mut self, report: &SweepReport) {
        self.sweeps += 1;
        self.holds_released += report.holds_released as u64;
        self.units_released += report.units_released;
    }
}

/// Handle for the running sweeper (shutdown + trigger hook).
#[derive(Debug)]
pub struct ExpirySweeperHandle {
    shutdown: mpsc::Sender<()>,
    trigger: mpsc::SyncSender<()>,
    join: Option<thread::JoinHandle<()>>,
    stats: Arc<Mutex<SweeperStats>>,
}

impl ExpirySweeperHandle {
    /// Request an extra sweep as soon as possible.
    ///
    /// Triggers are coalesced: if one is already pending this is a no-op.
    pub fn trigger(&self) {
        let _ = self.trigger.try_send(());
    }

    pub fn stats(&self) -> SweeperStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stop the runner thread and wait for it to exit.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

fn sweeper_loop(
    name: &str,
    cfg: ExpirySweeper,
    service: Arc<InventoryService>,
    shutdown_rx: mpsc::Receiver<()>,
    trigger_rx: mpsc::Receiver<()>,
    stats: Arc<Mutex<SweeperStats>>,
) {
    let interval = cfg.interval.max(Duration::from_millis(1));
    info!(
        runner = name,
        interval_ms = interval.as_millis() as u64,
        hold_ttl_secs = cfg.hold_ttl.as_secs(),
        "expiry sweeper started"
    );

    // Sweep once on startup.
    let mut next_tick = Instant::now();

    loop {
        match shutdown_rx.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => break,
            Err(TryRecvError::Empty) => {}
        }

        let mut pending = false;
        let now = Instant::now();
        if now >= next_tick {
            pending = true;
            // Keep a stable cadence even if we were delayed.
            while next_tick <= now {
                next_tick += interval;
            }
        }

        // Coalesce any number of triggers into one sweep.
        while trigger_rx.try_recv().is_ok() {
            pending = true;
        }

        if pending {
            let report = service.release_expired_holds(cfg.hold_ttl);
            stats
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .record(&report);
            debug!(
                runner = name,
                holds_released = report.holds_released,
                records_scanned = report.records_scanned,
                "expiry sweep finished"
            );
        }

        let sleep_for = next_tick
            .saturating_duration_since(Instant::now())
            .min(MAX_IDLE);
        match shutdown_rx.recv_timeout(sleep_for) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }

    info!(runner = name, "expiry sweeper stopped");
}
