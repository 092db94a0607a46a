//! What the completion notification sounds like.

use std::io::Write;
use std::time::Duration;

/// The sound played when a countdown completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionTone {
    /// A synthesised sine chime played through the audio device.
    Chime {
        /// Pitch of each beep
        frequency_hz: u32,
        /// Length of each beep
        beep_millis: u64,
        /// Number of beeps
        repeats: u32,
    },
    /// The terminal bell (`BEL`).
    Bell,
}

impl Default for CompletionTone {
    fn default() -> Self {
        CompletionTone::Chime {
            frequency_hz: 880,
            beep_millis: 250,
            repeats: 3,
        }
    }
}

impl CompletionTone {
    /// Total playing time, including the gaps between beeps.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        match self {
            CompletionTone::Chime {
                beep_millis,
                repeats,
                ..
            } => {
                let beeps = u64::from(*repeats);
                // Each gap is as long as a beep.
                Duration::from_millis(beep_millis * (beeps * 2).saturating_sub(1))
            }
            CompletionTone::Bell => Duration::ZERO,
        }
    }
}

/// Rings the terminal bell on stdout.
pub fn ring_bell() {
    let mut stdout = std::io::stdout();
    // A failed bell has nowhere else to be reported.
    let _ = stdout.write_all(b"\x07");
    let _ = stdout.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_chime() {
        assert!(matches!(
            CompletionTone::default(),
            CompletionTone::Chime {
                frequency_hz: 880,
                ..
            }
        ));
    }

    #[test]
    fn test_total_duration() {
        let tone = CompletionTone::Chime {
            frequency_hz: 440,
            beep_millis: 100,
            repeats: 3,
        };
        assert_eq!(tone.total_duration(), Duration::from_millis(500));
        assert_eq!(CompletionTone::Bell.total_duration(), Duration::ZERO);
    }

    #[test]
    fn test_zero_repeats_is_silent() {
        let tone = CompletionTone::Chime {
            frequency_hz: 440,
            beep_millis: 100,
            repeats: 0,
        };
        assert_eq!(tone.total_duration(), Duration::ZERO);
    }
}
