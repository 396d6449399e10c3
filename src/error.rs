use std::collections::TryReserveError;

use thiserror::Error;

/// Setup-time failures. These surface once, from [`Engine::prepare`]; the
/// processing path itself never returns errors.
///
/// [`Engine::prepare`]: crate::Engine::prepare
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("sample rate {0} is not a positive finite value")]
    InvalidSampleRate(f32),

    #[error("maximum block size {got} outside supported range 1..={max}")]
    InvalidBlockSize { got: usize, max: usize },

    #[error("history length {0}s is not a positive finite value")]
    InvalidHistoryLength(f32),

    #[error("failed to allocate internal buffers")]
    Allocation(#[from] TryReserveError),
}
