//! Core game logic (no_std compatible)
//!
//! Board model, move validation and the notation codec. Only `alloc`,
//! `log` and `thiserror` are needed, so this part builds without `std`.

pub mod board;
pub mod common;
pub mod config;
pub mod coord;
pub mod notation;
pub mod piece;
pub mod validator;

// Re-export commonly used types
pub use board::{Board, MoveRecord, Score};
pub use common::{BoardError, CoordError, MoveError, NotationError};
pub use config::*;
pub use coord::{Color, Coordinate, Layer, RawCoordinate};
pub use notation::{decode_move, decode_square, encode_move, encode_square, normalize_move};
pub use piece::{Piece, PieceKind};
pub use validator::{
    apply_checked, apply_move, check_move, legal_destinations, legal_moves, path_between,
    CheckedMove, Delta, MoveContext, MoveOutcome,
};
