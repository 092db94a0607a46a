//! Timer engine for the countdown.
//!
//! This module provides the tick source:
//! - One dedicated background scheduler thread
//! - At most one outstanding run at a time
//! - Tick and finish events delivered over a channel to the UI loop
//! - Generation tokens so a cancelled run can never clobber a newer one
//!
//! Pause and resume are stop-and-restart: resuming schedules a fresh run
//! whose cadence starts at the resume instant.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::error::EngineError;
use super::CountdownDriver;

/// Name of the scheduler thread.
pub const TIMER_THREAD_NAME: &str = "countdown-timer";

// ============================================================================
// RunId / TimerEvent
// ============================================================================

/// Generation token identifying one run of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u64);

impl RunId {
    /// Wraps a raw generation value.
    pub const fn new(generation: u64) -> Self {
        Self(generation)
    }

    /// Returns the raw generation value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

/// Events emitted by the engine for the UI loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One interval elapsed
    Tick {
        /// Run that produced the tick
        run: RunId,
        /// Remaining seconds, never negative
        remaining_seconds: u64,
    },
    /// The run reached zero; sent exactly once per run
    Finished {
        /// Run that finished
        run: RunId,
    },
}

impl TimerEvent {
    /// Returns the run this event belongs to.
    pub fn run(&self) -> RunId {
        match self {
            TimerEvent::Tick { run, .. } | TimerEvent::Finished { run } => *run,
        }
    }
}

// ============================================================================
// TimerEngine
// ============================================================================

struct ActiveRun {
    run: RunId,
    handle: JoinHandle<()>,
}

/// Drives one countdown at a time on a dedicated background thread.
pub struct TimerEngine {
    /// Scheduler; `None` after shutdown
    scheduler: Option<Runtime>,
    /// Channel to the UI loop
    event_tx: mpsc::UnboundedSender<TimerEvent>,
    /// Time between ticks
    interval: Duration,
    /// Current generation, shared with the running task
    generation: Arc<AtomicU64>,
    /// The outstanding run, if any
    active: Option<ActiveRun>,
}

impl TimerEngine {
    /// Creates an engine ticking once per second.
    ///
    /// # Errors
    ///
    /// Returns an error if the scheduler thread cannot be created.
    pub fn new(event_tx: mpsc::UnboundedSender<TimerEvent>) -> Result<Self, EngineError> {
        Self::with_interval(event_tx, Duration::from_secs(1))
    }

    /// Creates an engine with a custom tick interval.
    ///
    /// # Errors
    ///
    /// Returns an error if the scheduler thread cannot be created.
    pub fn with_interval(
        event_tx: mpsc::UnboundedSender<TimerEvent>,
        interval: Duration,
    ) -> Result<Self, EngineError> {
        let scheduler = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name(TIMER_THREAD_NAME)
            .enable_time()
            .build()?;

        debug!("Timer engine created (interval {:?})", interval);

        Ok(Self {
            scheduler: Some(scheduler),
            event_tx,
            interval,
            generation: Arc::new(AtomicU64::new(0)),
            active: None,
        })
    }

    /// Starts a new run counting down from `total_seconds`.
    ///
    /// Any outstanding run is cancelled first. A total of zero finishes
    /// immediately without ticking.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine has been shut down.
    pub fn start(&mut self, total_seconds: u64) -> Result<RunId, EngineError> {
        self.cancel_active();

        let scheduler = self.scheduler.as_ref().ok_or(EngineError::ShutDown)?;
        let run = RunId(self.generation.fetch_add(1, Ordering::SeqCst) + 1);

        let task = CountdownTask {
            run,
            total_seconds,
            interval: self.interval,
            generation: Arc::clone(&self.generation),
            event_tx: self.event_tx.clone(),
        };
        let handle = scheduler.spawn(task.run());
        self.active = Some(ActiveRun { run, handle });

        debug!("Started {} from {} seconds", run, total_seconds);
        Ok(run)
    }

    /// Cancels the outstanding run. Remaining time is the caller's to keep.
    pub fn pause(&mut self) {
        if !self.cancel_active() {
            debug!("Pause requested with nothing scheduled");
        }
    }

    /// Starts a fresh run from `remaining_seconds`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine has been shut down.
    pub fn resume(&mut self, remaining_seconds: u64) -> Result<RunId, EngineError> {
        self.start(remaining_seconds)
    }

    /// Cancels the outstanding run, if any.
    pub fn stop(&mut self) {
        self.cancel_active();
    }

    /// Cancels everything and releases the scheduler thread.
    pub fn shutdown(&mut self) {
        self.cancel_active();
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.shutdown_background();
            info!("Timer engine shut down");
        }
    }

    /// Returns true while a run is still ticking.
    pub fn is_scheduled(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.handle.is_finished())
    }

    /// Returns the outstanding run, if any.
    pub fn current_run(&self) -> Option<RunId> {
        self.active.as_ref().map(|active| active.run)
    }

    /// Returns true once `shutdown` has been called.
    pub fn is_shut_down(&self) -> bool {
        self.scheduler.is_none()
    }

    /// Returns the time between ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Cancels the active run without waiting for it.
    ///
    /// Bumping the generation makes a firing that is already in flight drop
    /// its event instead of delivering it.
    fn cancel_active(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                self.generation.fetch_add(1, Ordering::SeqCst);
                active.handle.abort();
                debug!("Cancelled {}", active.run);
                true
            }
            None => false,
        }
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEngine")
            .field("interval", &self.interval)
            .field("current_run", &self.current_run())
            .field("shut_down", &self.is_shut_down())
            .finish_non_exhaustive()
    }
}

impl CountdownDriver for TimerEngine {
    fn start(&mut self, total_seconds: u64) -> Result<RunId, EngineError> {
        TimerEngine::start(self, total_seconds)
    }

    fn pause(&mut self) {
        TimerEngine::pause(self)
    }

    fn resume(&mut self, remaining_seconds: u64) -> Result<RunId, EngineError> {
        TimerEngine::resume(self, remaining_seconds)
    }

    fn stop(&mut self) {
        TimerEngine::stop(self)
    }
}

// ============================================================================
// CountdownTask
// ============================================================================

/// The body of one run, executed on the scheduler thread.
struct CountdownTask {
    run: RunId,
    total_seconds: u64,
    interval: Duration,
    generation: Arc<AtomicU64>,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl CountdownTask {
    async fn run(self) {
        if self.total_seconds == 0 {
            self.emit(TimerEvent::Finished { run: self.run });
            return;
        }

        // Fixed rate: the first firing is one interval after the start.
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        let mut remaining = self.total_seconds;
        loop {
            ticker.tick().await;

            remaining = remaining.saturating_sub(1);
            let delivered = self.emit(TimerEvent::Tick {
                run: self.run,
                remaining_seconds: remaining,
            });
            if !delivered {
                return;
            }

            if remaining == 0 {
                self.emit(TimerEvent::Finished { run: self.run });
                return;
            }
        }
    }

    fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.run.0
    }

    /// Sends an event unless this run went stale. Returns false if the run
    /// should stop.
    fn emit(&self, event: TimerEvent) -> bool {
        if !self.is_current() {
            debug!("Dropping stale event from {}", self.run);
            return false;
        }
        if self.event_tx.send(event).is_err() {
            warn!("UI loop is gone, stopping {}", self.run);
            return false;
        }
        true
    }
}

// ============================================================================
// Tests
// ============================================================================
