//! Error types shared by the board, validator and notation codec.

use alloc::string::String;

use thiserror::Error;

use super::coord::{Color, Coordinate};
use super::piece::PieceKind;

/// A coordinate component fell outside the 8x8x3 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoordError {
    #[error("coordinate ({file}, {rank}, {layer}) is outside the board")]
    OutOfRange { file: i32, rank: i32, layer: i32 },
}

/// Errors raised by board mutation. These guard invariants the validator
/// already upholds, so seeing one means a bug upstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("no piece with id {0}")]
    UnknownPiece(String),
    #[error("piece id {0} is used twice")]
    DuplicateId(String),
    #[error("invariant violated: {occupant} already occupies {at}")]
    InvariantViolation { at: Coordinate, occupant: String },
    #[error("{0} has more than one king")]
    ExtraKing(Color),
}

/// Why a proposed move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no piece with id {0}")]
    NoSuchPiece(String),
    #[error("no piece on {0}")]
    EmptySquare(Coordinate),
    #[error("{id} belongs to {color}, who is not on move")]
    WrongTurn { id: String, color: Color },
    #[error(transparent)]
    OutOfRange(#[from] CoordError),
    #[error("destination is the piece's current square")]
    NoOpMove,
    #[error("{at} is occupied by own piece {occupant}")]
    OwnCapture { at: Coordinate, occupant: String },
    #[error("path is blocked at {at}")]
    BlockedPath { at: Coordinate },
    #[error("a {kind} cannot move from {from} to {to}")]
    IllegalShape {
        kind: PieceKind,
        from: Coordinate,
        to: Coordinate,
    },
    #[error("the game is over")]
    GameOver,
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// A square or move token could not be decoded. Never guessed around.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("token {token:?} has length {len}, expected {expected}")]
    WrongLength {
        token: String,
        len: usize,
        expected: &'static str,
    },
    #[error("bad file letter {0:?}")]
    BadFile(char),
    #[error("bad rank digit {0:?}")]
    BadRank(char),
    #[error("bad layer letter {0:?}")]
    BadLayer(char),
}
