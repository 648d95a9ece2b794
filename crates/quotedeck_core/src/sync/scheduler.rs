//! Background worker driving periodic sync cycles.
//!
//! # Responsibility
//! - Run `SyncEngine::run_cycle` on a fixed interval from one worker thread.
//! - Drain fire-and-forget publish jobs between ticks.
//!
//! # Invariants
//! - The worker holds no lock while sleeping; it blocks on its job channel
//!   with a deadline and never delays a tick for a publish job.
//! - `stop` (and `Drop`) joins the worker; a stopped scheduler leaves no
//!   thread behind.

use crate::model::quote::Quote;
use crate::sync::engine::SyncEngine;
use log::{info, warn};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

enum SchedulerJob {
    Publish(Quote),
    Shutdown,
}

/// Handle to the periodic sync worker.
///
/// Dropping the handle stops the worker; keep it alive for as long as
/// automatic syncing should run.
pub struct SyncScheduler {
    jobs: Sender<SchedulerJob>,
    worker: Option<JoinHandle<()>>,
}

impl SyncScheduler {
    /// Spawns the worker thread and schedules the first cycle one full
    /// `interval` from now.
    pub fn start(engine: Arc<SyncEngine>, interval: Duration) -> Self {
        let (jobs, inbox) = mpsc::channel();
        let worker = thread::spawn(move || run_worker(&engine, &inbox, interval));
        Self {
            jobs,
            worker: Some(worker),
        }
    }

    /// Enqueues one publish job for the worker.
    ///
    /// Returns immediately; the job's outcome is only ever logged. When the
    /// worker is already stopped the job is dropped with a `warn`.
    pub fn notify_remote_async(&self, quote: Quote) {
        if self.jobs.send(SchedulerJob::Publish(quote)).is_err() {
            warn!("event=sync_publish module=sync status=warn error_code=scheduler_stopped");
        }
    }

    /// Stops the worker and joins it. Idempotent.
    pub fn stop(&mut self) {
        let _ = self.jobs.send(SchedulerJob::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("event=sync_scheduler module=sync status=warn error_code=worker_panicked");
            }
        }
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker(engine: &SyncEngine, inbox: &Receiver<SchedulerJob>, interval: Duration) {
    info!(
        "event=sync_scheduler module=sync status=start interval_ms={}",
        interval.as_millis()
    );

    let mut next_tick = Instant::now() + interval;
    loop {
        let now = Instant::now();
        if now >= next_tick {
            engine.run_cycle();
            // Reschedule from completion, not from the missed deadline, so a
            // slow cycle does not cause back-to-back catch-up cycles.
            next_tick = Instant::now() + interval;
        }

        let wait = next_tick.saturating_duration_since(Instant::now());
        match inbox.recv_timeout(wait) {
            Ok(SchedulerJob::Publish(quote)) => engine.publish_quote(&quote),
            Ok(SchedulerJob::Shutdown) => break,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    info!("event=sync_scheduler module=sync status=stop");
}
