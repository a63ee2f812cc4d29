#![cfg(feature = "std")]
//! Driving an external engine process over its stdin/stdout.

use std::time::Duration;

use thiserror::Error;

pub mod bridge;
pub mod lines;
pub mod process;
pub mod protocol;

pub use bridge::{EngineBridge, EngineState};
pub use lines::LineBuffer;
pub use protocol::{BestMove, EngineLine, UciCommand};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    /// The process exited or a pipe failed. Terminal for the session.
    #[error("engine unavailable: {reason}")]
    Terminated { reason: String },
    #[error("engine sent no bestmove within {after:?}")]
    Timeout { after: Duration },
    #[error("malformed engine response {line:?}")]
    MalformedResponse { line: String },
    #[error("search dispatched while another was in flight")]
    ConcurrentRequest,
}

impl EngineError {
    /// Whether the caller should treat the engine as unavailable and offer a
    /// retry or fallback.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            EngineError::Spawn { .. } | EngineError::Terminated { .. } | EngineError::Timeout { .. }
        )
    }
}

pub(crate) fn terminated(reason: impl Into<String>) -> EngineError {
    EngineError::Terminated {
        reason: reason.into(),
    }
}
