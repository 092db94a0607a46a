//! Timer engine module.
//!
//! This module contains the tick source behind the countdown:
//! - `timer`: the engine with its dedicated scheduler thread
//! - `error`: engine errors
//!
//! The view-model talks to the engine through [`CountdownDriver`], so tests
//! can swap in [`MockCountdownDriver`] and feed ticks by hand.

mod error;
pub mod timer;

pub use error::EngineError;
pub use timer::{RunId, TimerEngine, TimerEvent, TIMER_THREAD_NAME};

/// Operations the view-model needs from a tick source.
pub trait CountdownDriver {
    /// Starts a run from `total_seconds`, cancelling any previous run.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver can no longer schedule runs.
    fn start(&mut self, total_seconds: u64) -> Result<RunId, EngineError>;

    /// Cancels the current run; no-op when nothing is scheduled.
    fn pause(&mut self);

    /// Starts a fresh run from `remaining_seconds`.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver can no longer schedule runs.
    fn resume(&mut self, remaining_seconds: u64) -> Result<RunId, EngineError>;

    /// Cancels the current run; idempotent.
    fn stop(&mut self);
}

/// A call recorded by [`MockCountdownDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCall {
    Start(u64),
    Pause,
    Resume(u64),
    Stop,
}

/// Driver that schedules nothing and records every call.
#[derive(Debug, Default)]
pub struct MockCountdownDriver {
    calls: Vec<DriverCall>,
    next_run: u64,
    current: Option<RunId>,
    shut_down: bool,
}

impl MockCountdownDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `start`/`resume` calls fail as after shutdown.
    pub fn set_shut_down(&mut self, shut_down: bool) {
        self.shut_down = shut_down;
    }

    #[must_use]
    pub fn calls(&self) -> &[DriverCall] {
        &self.calls
    }

    /// Number of `start` and `resume` calls, i.e. schedules created.
    #[must_use]
    pub fn schedule_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DriverCall::Start(_) | DriverCall::Resume(_)))
            .count()
    }

    /// The run handed out by the last successful `start`/`resume`, if it
    /// has not been cancelled since.
    #[must_use]
    pub fn current_run(&self) -> Option<RunId> {
        self.current
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn schedule(&mut self) -> Result<RunId, EngineError> {
        if self.shut_down {
            return Err(EngineError::ShutDown);
        }
        self.next_run += 1;
        let run = RunId::new(self.next_run);
        self.current = Some(run);
        Ok(run)
    }
}

impl CountdownDriver for MockCountdownDriver {
    fn start(&mut self, total_seconds: u64) -> Result<RunId, EngineError> {
        self.calls.push(DriverCall::Start(total_seconds));
        self.current = None;
        self.schedule()
    }

    fn pause(&mut self) {
        self.calls.push(DriverCall::Pause);
        self.current = None;
    }

    fn resume(&mut self, remaining_seconds: u64) -> Result<RunId, EngineError> {
        self.calls.push(DriverCall::Resume(remaining_seconds));
        self.current = None;
        self.schedule()
    }

    fn stop(&mut self) {
        self.calls.push(DriverCall::Stop);
        self.current = None;
    }
}
