//! Sound system error types.
//!
//! Sound is best-effort: callers log these and fall back to the terminal
//! bell instead of failing.

use thiserror::Error;

/// Errors that can occur while playing the completion tone.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("音频设备不可用: {0}")]
    DeviceNotAvailable(String),

    /// Failed to create the audio output sink.
    #[error("无法创建音频输出: {0}")]
    StreamError(String),

    /// Generic sound playback error.
    #[error("提示音播放失败: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SoundError::DeviceNotAvailable("no device".to_string());
        assert!(err.to_string().contains("no device"));
        assert!(err.to_string().contains("音频设备不可用"));

        let err = SoundError::StreamError("sink failed".to_string());
        assert!(err.to_string().contains("sink failed"));

        let err = SoundError::PlaybackError("unknown".to_string());
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn test_is_device_error() {
        assert!(SoundError::DeviceNotAvailable("x".into()).is_device_error());
        assert!(SoundError::StreamError("x".into()).is_device_error());
        assert!(!SoundError::PlaybackError("x".into()).is_device_error());
    }
}
