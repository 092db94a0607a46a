//! Completion sound for the countdown.
//!
//! This module provides the audible notification played once per completed
//! run:
//!
//! - A synthesised chime through rodio
//! - The terminal bell when no audio device is available
//! - Graceful degradation: playback errors are logged, never propagated
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   SoundService   │ ← play_completion_tone()
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   SoundPlayer    │────▶│ RodioSoundPlayer │
//! │                  │     ├──────────────────┤
//! │                  │────▶│ MockSoundPlayer  │
//! └──────────────────┘     └──────────────────┘
//!          │ (error / no device)
//!          ▼
//!    terminal bell
//! ```

mod error;
mod player;
mod tone;

use std::sync::Arc;

use tracing::{debug, warn};

pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};
pub use tone::{ring_bell, CompletionTone};

/// Trait for sound playback implementations.
pub trait SoundPlayer {
    /// Plays a tone without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, tone: &CompletionTone) -> Result<(), SoundError>;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, tone: &CompletionTone) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, tone)
    }
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_calls: std::sync::Mutex<Vec<CompletionTone>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<CompletionTone> {
        self.play_calls.lock().unwrap().clone()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, tone: &CompletionTone) -> Result<(), SoundError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_calls.lock().unwrap().push(tone.clone());
        Ok(())
    }
}

// ============================================================================
// SoundService
// ============================================================================

/// The notification collaborator of the view-model.
pub struct SoundService {
    player: Option<Arc<dyn SoundPlayer>>,
    tone: CompletionTone,
    enabled: bool,
    played: std::cell::Cell<usize>,
}

impl SoundService {
    /// Opens the default audio device, falling back to the terminal bell
    /// when none exists.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        let player = if enabled {
            try_create_player().map(|p| p as Arc<dyn SoundPlayer>)
        } else {
            None
        };
        Self {
            player,
            tone: CompletionTone::default(),
            enabled,
            played: std::cell::Cell::new(0),
        }
    }

    /// Uses the given player.
    #[must_use]
    pub fn with_player(player: Arc<dyn SoundPlayer>) -> Self {
        Self {
            player: Some(player),
            tone: CompletionTone::default(),
            enabled: true,
            played: std::cell::Cell::new(0),
        }
    }

    /// A service that never makes a sound.
    #[must_use]
    pub fn silent() -> Self {
        Self::new(false)
    }

    /// Replaces the tone that is played.
    #[must_use]
    pub fn with_tone(mut self, tone: CompletionTone) -> Self {
        self.tone = tone;
        self
    }

    #[must_use]
    pub fn tone(&self) -> &CompletionTone {
        &self.tone
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of times the completion tone was requested.
    #[must_use]
    pub fn played_count(&self) -> usize {
        self.played.get()
    }

    /// Plays the completion tone. Never fails; problems are logged.
    pub fn play_completion_tone(&self) {
        self.played.set(self.played.get() + 1);

        if !self.enabled {
            debug!("Completion tone suppressed");
            return;
        }

        match &self.player {
            Some(player) => {
                if let Err(e) = player.play(&self.tone) {
                    warn!("{}, falling back to terminal bell", e);
                    ring_bell();
                }
            }
            None => ring_bell(),
        }
    }
}

impl std::fmt::Debug for SoundService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundService")
            .field("has_player", &self.player.is_some())
            .field("tone", &self.tone)
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_plays_through_player() {
        let mock = Arc::new(MockSoundPlayer::new());
        let service = SoundService::with_player(mock.clone());

        service.play_completion_tone();

        assert_eq!(mock.play_count(), 1);
        assert_eq!(mock.get_play_calls()[0], CompletionTone::default());
        assert_eq!(service.played_count(), 1);
    }

    #[test]
    fn test_service_custom_tone() {
        let mock = Arc::new(MockSoundPlayer::new());
        let service = SoundService::with_player(mock.clone()).with_tone(CompletionTone::Bell);

        service.play_completion_tone();

        assert_eq!(mock.get_play_calls(), vec![CompletionTone::Bell]);
    }

    #[test]
    fn test_service_survives_player_failure() {
        let mock = Arc::new(MockSoundPlayer::new());
        mock.set_should_fail(true);
        let service = SoundService::with_player(mock.clone());

        service.play_completion_tone();

        assert_eq!(mock.play_count(), 0);
        assert_eq!(service.played_count(), 1);
    }

    #[test]
    fn test_custom_player_only_implements_play() {
        struct Counting(std::sync::atomic::AtomicUsize);

        impl SoundPlayer for Counting {
            fn play(&self, _tone: &CompletionTone) -> Result<(), SoundError> {
                self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            }
        }

        let player = Arc::new(Counting(std::sync::atomic::AtomicUsize::new(0)));
        let service = SoundService::with_player(player.clone());

        service.play_completion_tone();
        service.play_completion_tone();

        assert_eq!(player.0.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn test_silent_service() {
        let service = SoundService::silent();
        assert!(!service.is_enabled());
        service.play_completion_tone();
        assert_eq!(service.played_count(), 1);
    }
}
