//! Timer engine error types.

use thiserror::Error;

/// Errors reported by the timer engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine was shut down and can no longer schedule runs.
    #[error("计时引擎已关闭")]
    ShutDown,

    /// The background scheduler could not be created.
    #[error("无法创建计时线程: {0}")]
    Runtime(#[from] std::io::Error),
}

impl EngineError {
    /// Returns true if the engine cannot be used again.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        matches!(self, Self::ShutDown)
    }
}
