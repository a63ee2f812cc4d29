//! Square and move tokens used at the engine protocol boundary.
//!
//! A square is `<file a-h><rank 1-8><layer l|m|u>`, e.g. `e2m`. A move is
//! two squares concatenated (`e2me4m`). Engines configured for a flat board
//! send two-character squares (`e2e4`); those decode onto the middle layer.

use alloc::format;
use alloc::string::String;

use super::common::NotationError;
use super::coord::{Coordinate, Layer};

/// Layer assumed for legacy squares that carry no layer letter.
pub const LEGACY_LAYER: Layer = Layer::Middle;

pub fn encode_square(coord: Coordinate) -> String {
    format!("{}", coord)
}

pub fn encode_move(from: Coordinate, to: Coordinate) -> String {
    format!("{}{}", from, to)
}

/// Decode a three-character square, or a two-character legacy square onto
/// the middle layer.
pub fn decode_square(token: &str) -> Result<Coordinate, NotationError> {
    let mut chars = token.chars();
    let (file, rank, layer) = match (chars.next(), chars.next(), chars.next(), chars.next()) {
        (Some(f), Some(r), None, None) => (f, r, LEGACY_LAYER),
        (Some(f), Some(r), Some(l), None) => {
            (f, r, Layer::from_letter(l).ok_or(NotationError::BadLayer(l))?)
        }
        _ => {
            return Err(NotationError::WrongLength {
                token: token.into(),
                len: token.chars().count(),
                expected: "2 or 3",
            })
        }
    };
    if !('a'..='h').contains(&file) {
        return Err(NotationError::BadFile(file));
    }
    if !('1'..='8').contains(&rank) {
        return Err(NotationError::BadRank(rank));
    }
    let file_idx = file as i32 - 'a' as i32;
    let rank_idx = rank as i32 - '1' as i32;
    Coordinate::checked(file_idx, rank_idx, layer.index() as i32)
        .map_err(|_| NotationError::BadRank(rank))
}

/// Decode a move token: six characters (two layered squares) or four
/// characters (two legacy squares, both placed on the middle layer).
pub fn decode_move(token: &str) -> Result<(Coordinate, Coordinate), NotationError> {
    let width = match token.chars().count() {
        6 => 3,
        4 => 2,
        len => {
            return Err(NotationError::WrongLength {
                token: token.into(),
                len,
                expected: "4 or 6",
            })
        }
    };
    if !token.is_ascii() {
        let bad = token.chars().find(|c| !c.is_ascii()).unwrap_or('?');
        return Err(NotationError::BadFile(bad));
    }
    let (from, to) = token.split_at(width);
    Ok((decode_square(from)?, decode_square(to)?))
}

/// Canonical six-character form of a move token.
pub fn normalize_move(token: &str) -> Result<String, NotationError> {
    let (from, to) = decode_move(token)?;
    Ok(encode_move(from, to))
}
