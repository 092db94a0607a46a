//! Countdown view-model.
//!
//! Bridges user intents and the timer engine:
//! - Enforces the Idle → Running ⇄ Paused → Completed state machine
//! - Applies engine ticks and completion to the countdown state
//! - Publishes a [`CountdownSnapshot`] to subscribers after every change
//!
//! All methods run on the UI thread; the engine only reaches the
//! view-model through [`CountdownViewModel::handle_event`].

use tracing::{debug, error, info};

use crate::engine::{CountdownDriver, RunId, TimerEvent};
use crate::sound::SoundService;
use crate::time;
use crate::types::{
    CountdownSnapshot, CountdownStatus, PresetCatalog, PresetDuration,
    DEFAULT_CRITICAL_THRESHOLD_SECONDS,
};

/// Status message before anything happened.
pub const MSG_WAITING: &str = "等待开始";
/// Status message for a non-positive duration.
pub const MSG_INVALID_DURATION: &str = "请输入一个大于 0 的时间";
/// Status message while running.
pub const MSG_RUNNING: &str = "倒计时进行中";
/// Status message while paused.
pub const MSG_PAUSED: &str = "倒计时已暂停";
/// Status message after a reset.
pub const MSG_RESET: &str = "已复位，等待开始";
/// Status message after completion.
pub const MSG_COMPLETED: &str = "时间到！";

/// Identifies an observer registered with [`CountdownViewModel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&CountdownSnapshot)>;

// ============================================================================
// CountdownViewModel
// ============================================================================

/// The countdown state and its legal transitions.
pub struct CountdownViewModel<D: CountdownDriver> {
    driver: D,
    sound: SoundService,
    presets: PresetCatalog,
    critical_threshold: u64,

    status: CountdownStatus,
    initial_seconds: u64,
    remaining_seconds: u64,
    formatted_time: String,
    status_message: String,
    finish_time_text: String,
    critical: bool,
    active_preset: Option<PresetDuration>,
    /// Run whose events are accepted; `None` when nothing should tick
    current_run: Option<RunId>,

    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl<D: CountdownDriver> CountdownViewModel<D> {
    /// Creates an idle view-model with the given preset catalog.
    pub fn new(driver: D, sound: SoundService, presets: PresetCatalog) -> Self {
        Self {
            driver,
            sound,
            presets,
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD_SECONDS,
            status: CountdownStatus::Idle,
            initial_seconds: 0,
            remaining_seconds: 0,
            formatted_time: time::format_hms(0),
            status_message: MSG_WAITING.to_string(),
            finish_time_text: time::NO_FINISH_TEXT.to_string(),
            critical: false,
            active_preset: None,
            current_run: None,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Sets the remaining seconds at or below which an active run is critical.
    pub fn with_critical_threshold(mut self, seconds: u64) -> Self {
        self.critical_threshold = seconds;
        self
    }

    // ------------------------------------------------------------------------
    // User intents
    // ------------------------------------------------------------------------

    /// Starts a countdown of `hours:minutes:seconds`.
    ///
    /// Returns false, with a status message, when the total is not positive
    /// or overflows, or when the engine refuses to start. Any previous run is
    /// superseded.
    pub fn start(&mut self, hours: i64, minutes: i64, seconds: i64) -> bool {
        let total = match time::to_seconds(hours, minutes, seconds) {
            Some(total) if total > 0 => total.unsigned_abs(),
            total => {
                debug!(
                    "Rejected start with {}h {}m {}s (total {:?})",
                    hours, minutes, seconds, total
                );
                return self.reject_duration();
            }
        };

        let run = match self.driver.start(total) {
            Ok(run) => run,
            Err(e) => {
                error!("Failed to start countdown: {}", e);
                // The driver cancels before it fails, so nothing is ticking.
                self.current_run = None;
                if self.status == CountdownStatus::Running {
                    self.status = CountdownStatus::Idle;
                    self.finish_time_text = time::NO_FINISH_TEXT.to_string();
                    self.critical = false;
                }
                self.status_message = e.to_string();
                self.notify();
                return false;
            }
        };

        self.current_run = Some(run);
        self.initial_seconds = total;
        self.remaining_seconds = total;
        self.formatted_time = time::format_seconds(total);
        self.finish_time_text = time::estimate_finish_text(total);
        self.status = CountdownStatus::Running;
        self.status_message = MSG_RUNNING.to_string();
        self.critical = total <= self.critical_threshold;
        info!("Countdown started: {} seconds ({})", total, run);

        self.notify();
        true
    }

    /// Pauses a running countdown; no-op otherwise.
    pub fn pause(&mut self) {
        if self.status != CountdownStatus::Running {
            debug!("Pause ignored in {} state", self.status.as_str());
            return;
        }

        self.driver.pause();
        self.current_run = None;
        self.status = CountdownStatus::Paused;
        self.status_message = MSG_PAUSED.to_string();
        info!("Countdown paused at {} seconds", self.remaining_seconds);

        self.notify();
    }

    /// Resumes a paused countdown from the remaining time; no-op otherwise.
    pub fn resume(&mut self) {
        if self.status != CountdownStatus::Paused {
            debug!("Resume ignored in {} state", self.status.as_str());
            return;
        }

        match self.driver.resume(self.remaining_seconds) {
            Ok(run) => {
                self.current_run = Some(run);
                self.status = CountdownStatus::Running;
                self.status_message = MSG_RUNNING.to_string();
                self.finish_time_text = time::estimate_finish_text(self.remaining_seconds);
                info!(
                    "Countdown resumed from {} seconds ({})",
                    self.remaining_seconds, run
                );
            }
            Err(e) => {
                error!("Failed to resume countdown: {}", e);
                self.status_message = e.to_string();
            }
        }

        self.notify();
    }

    /// Stops any run and restores the remaining time to the initial duration.
    pub fn reset(&mut self) {
        self.driver.stop();
        self.current_run = None;
        self.status = CountdownStatus::Idle;
        self.remaining_seconds = self.initial_seconds;
        self.formatted_time = time::format_seconds(self.initial_seconds);
        self.finish_time_text = time::NO_FINISH_TEXT.to_string();
        self.status_message = MSG_RESET.to_string();
        self.critical = false;
        info!("Countdown reset to {} seconds", self.initial_seconds);

        self.notify();
    }

    /// Applies a preset without starting it, or clears the active preset
    /// with `None`.
    ///
    /// Returns false while a countdown is running.
    pub fn select_preset(&mut self, preset: Option<&PresetDuration>) -> bool {
        let Some(preset) = preset else {
            self.active_preset = None;
            self.notify();
            return true;
        };

        if !self.allow_edits() {
            debug!("Preset '{}' ignored while running", preset.label);
            return false;
        }

        if self.status == CountdownStatus::Paused {
            // The paused run is abandoned in favour of the preset.
            self.driver.stop();
        }
        self.current_run = None;
        self.status = CountdownStatus::Idle;
        self.active_preset = Some(preset.clone());
        self.initial_seconds = preset.seconds;
        self.remaining_seconds = preset.seconds;
        self.formatted_time = time::format_seconds(preset.seconds);
        self.finish_time_text = time::NO_FINISH_TEXT.to_string();
        self.status_message = format!("已选择预设：{}", preset.label);
        self.critical = false;
        info!("Preset selected: {} ({} seconds)", preset.label, preset.seconds);

        self.notify();
        true
    }

    /// Applies the catalog preset with the given label.
    ///
    /// Returns false if no such preset exists or a countdown is running.
    pub fn select_preset_by_label(&mut self, label: &str) -> bool {
        match self.presets.find(label).cloned() {
            Some(preset) => self.select_preset(Some(&preset)),
            None => {
                self.status_message = format!("未找到预设：{}", label);
                self.notify();
                false
            }
        }
    }

    /// Starts the given preset immediately.
    pub fn start_preset(&mut self, preset: &PresetDuration) -> bool {
        if !self.select_preset(Some(preset)) {
            return false;
        }
        match i64::try_from(preset.seconds) {
            Ok(seconds) => self.start(0, 0, seconds),
            Err(_) => {
                debug!("Preset '{}' is too long to start", preset.label);
                self.reject_duration()
            }
        }
    }

    fn reject_duration(&mut self) -> bool {
        self.status_message = MSG_INVALID_DURATION.to_string();
        self.notify();
        false
    }

    // ------------------------------------------------------------------------
    // Engine events
    // ------------------------------------------------------------------------

    /// Applies an engine event. Events from any run other than the current
    /// one are discarded.
    pub fn handle_event(&mut self, event: TimerEvent) {
        if self.current_run != Some(event.run()) || self.status != CountdownStatus::Running {
            debug!("Discarding stale event from {}", event.run());
            return;
        }

        match event {
            TimerEvent::Tick {
                remaining_seconds, ..
            } => self.handle_tick(remaining_seconds),
            TimerEvent::Finished { .. } => self.handle_completion(),
        }
    }

    fn handle_tick(&mut self, seconds_left: u64) {
        self.remaining_seconds = seconds_left.min(self.initial_seconds);
        self.formatted_time = time::format_seconds(self.remaining_seconds);
        self.finish_time_text = time::estimate_finish_text(self.remaining_seconds);
        self.critical = self.remaining_seconds <= self.critical_threshold;

        self.notify();
    }

    fn handle_completion(&mut self) {
        self.current_run = None;
        self.status = CountdownStatus::Completed;
        self.remaining_seconds = 0;
        self.formatted_time = time::format_hms(0);
        self.finish_time_text = time::NOW_TEXT.to_string();
        self.status_message = MSG_COMPLETED.to_string();
        self.critical = false;
        info!("Countdown completed");

        self.sound.play_completion_tone();
        self.notify();
    }

    // ------------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------------

    /// Registers an observer called synchronously after every change.
    pub fn subscribe(&mut self, observer: impl FnMut(&CountdownSnapshot) + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, observer) in &mut self.observers {
            observer(&snapshot);
        }
    }

    // ------------------------------------------------------------------------
    // Observable state
    // ------------------------------------------------------------------------

    /// Returns the current presentation state.
    pub fn snapshot(&self) -> CountdownSnapshot {
        CountdownSnapshot {
            status: self.status,
            initial_seconds: self.initial_seconds,
            remaining_seconds: self.remaining_seconds,
            formatted_time: self.formatted_time.clone(),
            progress: self.progress(),
            critical: self.critical,
            running: self.is_running(),
            allow_edits: self.allow_edits(),
            status_message: self.status_message.clone(),
            finish_time_text: self.finish_time_text.clone(),
            active_preset: self.active_preset.clone(),
        }
    }

    pub fn status(&self) -> CountdownStatus {
        self.status
    }

    pub fn initial_seconds(&self) -> u64 {
        self.initial_seconds
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn formatted_time(&self) -> &str {
        &self.formatted_time
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn finish_time_text(&self) -> &str {
        &self.finish_time_text
    }

    /// Consumed fraction of the current duration.
    pub fn progress(&self) -> f64 {
        time::progress(self.remaining_seconds, self.initial_seconds)
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    pub fn is_running(&self) -> bool {
        self.status == CountdownStatus::Running
    }

    /// Durations may be edited whenever the countdown is not running.
    pub fn allow_edits(&self) -> bool {
        !self.is_running()
    }

    pub fn presets(&self) -> &PresetCatalog {
        &self.presets
    }

    pub fn active_preset(&self) -> Option<&PresetDuration> {
        self.active_preset.as_ref()
    }

    /// Run whose events are currently accepted.
    pub fn current_run(&self) -> Option<RunId> {
        self.current_run
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn sound(&self) -> &SoundService {
        &self.sound
    }
}

impl<D: CountdownDriver + std::fmt::Debug> std::fmt::Debug for CountdownViewModel<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownViewModel")
            .field("driver", &self.driver)
            .field("status", &self.status)
            .field("remaining_seconds", &self.remaining_seconds)
            .field("current_run", &self.current_run)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
