//! Countdown Timer Library
//!
//! This library provides the core functionality for the countdown timer.
//! It includes:
//! - Timer engine driving one cancellable one-second tick sequence
//! - Countdown view-model enforcing the Idle/Running/Paused/Completed states
//! - Time utilities for `HH:MM:SS` formatting, progress and finish estimates
//! - Type definitions for presets, configuration and snapshots
//! - Completion chime playback
//! - Terminal front-end (CLI parsing, display, UI loop)

pub mod cli;
pub mod engine;
pub mod sound;
pub mod time;
pub mod types;
pub mod viewmodel;

// Re-export commonly used types for convenience
pub use types::{
    ConfigError, CountdownConfig, CountdownSnapshot, CountdownStatus, PresetCatalog,
    PresetDuration,
};

// Re-export engine types
pub use engine::{
    CountdownDriver, DriverCall, EngineError, MockCountdownDriver, RunId, TimerEngine, TimerEvent,
};

// Re-export view-model types
pub use viewmodel::{CountdownViewModel, SubscriptionId};

// Re-export sound types
pub use sound::{
    try_create_player, CompletionTone, MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer,
    SoundService,
};
