//! Request and result shapes handed to the outer (UI/HTTP) layer.

use alloc::string::{String, ToString};

use crate::core::{Coordinate, MoveError, MoveOutcome, RawCoordinate, Score};

/// A move proposed by a caller. Components are signed so that out-of-range
/// input reaches the validator and is rejected there.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveRequest {
    #[cfg_attr(feature = "std", serde(alias = "pieceID"))]
    pub piece_id: String,
    #[cfg_attr(feature = "std", serde(alias = "a"))]
    pub file: i32,
    #[cfg_attr(feature = "std", serde(alias = "b"))]
    pub rank: i32,
    #[cfg_attr(feature = "std", serde(alias = "c"))]
    pub layer: i32,
}

impl MoveRequest {
    pub fn new(piece_id: impl Into<String>, file: i32, rank: i32, layer: i32) -> Self {
        Self {
            piece_id: piece_id.into(),
            file,
            rank,
            layer,
        }
    }

    pub fn to(piece_id: impl Into<String>, destination: Coordinate) -> Self {
        let raw = RawCoordinate::from(destination);
        Self::new(piece_id, raw.a, raw.b, raw.c)
    }

    pub fn destination(&self) -> Result<Coordinate, MoveError> {
        Ok(Coordinate::checked(self.file, self.rank, self.layer)?)
    }
}

/// Outcome of a move attempt. Invalid moves carry the reason instead of
/// failing the call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveResult {
    pub valid: bool,
    pub reason: Option<String>,
    pub notation: Option<String>,
    pub captured: Option<String>,
    pub white_to_move: bool,
    pub score: Score,
    /// The mover removed the opponent's king.
    pub checkmate: bool,
}

impl MoveResult {
    pub fn from_outcome(outcome: &MoveOutcome) -> Self {
        MoveResult {
            valid: true,
            reason: None,
            notation: Some(outcome.record.notation.clone()),
            captured: outcome.record.captured.clone(),
            white_to_move: outcome.white_to_move,
            score: outcome.score,
            checkmate: outcome.checkmate,
        }
    }

    /// An invalid result; turn and score describe the unchanged board.
    pub fn rejected(error: &MoveError, white_to_move: bool, score: Score) -> Self {
        MoveResult {
            valid: false,
            reason: Some(error.to_string()),
            notation: None,
            captured: None,
            white_to_move,
            score,
            checkmate: false,
        }
    }
}

/// What the engine played and how it went.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineMoveResult {
    /// Canonical six-character notation of the engine's move.
    pub notation: String,
    pub piece_id: String,
    pub result: MoveResult,
    pub ponder: Option<String>,
    /// No further play is expected: the engine sent no ponder move or the
    /// move ended the game.
    pub game_ended: bool,
}
