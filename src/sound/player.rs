//! Sound player implementation using rodio.
//!
//! `RodioSoundPlayer` synthesises the completion chime with rodio v0.20
//! sine sources, so no audio files are needed.

use std::sync::Arc;
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::tone::{ring_bell, CompletionTone};

const CHIME_VOLUME: f32 = 0.2;

/// A sound player that uses rodio for audio playback.
///
/// Playback is non-blocking; the chime continues after `play` returns.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
}

impl RodioSoundPlayer {
    /// Creates a new sound player.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Plays the tone without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if no output sink can be created.
    pub fn play(&self, tone: &CompletionTone) -> Result<(), SoundError> {
        match tone {
            CompletionTone::Chime {
                frequency_hz,
                beep_millis,
                repeats,
            } => self.play_chime(*frequency_hz, Duration::from_millis(*beep_millis), *repeats),
            CompletionTone::Bell => {
                ring_bell();
                Ok(())
            }
        }
    }

    fn play_chime(&self, frequency_hz: u32, beep: Duration, repeats: u32) -> Result<(), SoundError> {
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        for i in 0..repeats {
            let gap = if i == 0 { Duration::ZERO } else { beep };
            let source = SineWave::new(frequency_hz as f32)
                .take_duration(beep)
                .amplify(CHIME_VOLUME)
                .delay(gap);
            sink.append(source);
        }
        sink.detach();

        debug!("Chime started ({} Hz x{})", frequency_hz, repeats);
        Ok(())
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer").finish_non_exhaustive()
    }
}

/// Creates a sound player, returning None if audio is unavailable.
#[must_use]
pub fn try_create_player() -> Option<Arc<RodioSoundPlayer>> {
    match RodioSoundPlayer::new() {
        Ok(player) => Some(Arc::new(player)),
        Err(e) => {
            warn!("Audio not available, falling back to terminal bell: {}", e);
            None
        }
    }
}
