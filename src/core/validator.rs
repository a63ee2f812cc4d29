//! Move legality and application.
//!
//! [`check_move`] is the pure legality oracle; [`apply_move`] checks and then
//! mutates the board. Geometry is decided by a per-kind rule table over the
//! move's deltas, with the rank delta mirrored so forward is positive for the
//! side to move.

use alloc::string::String;
use alloc::vec::Vec;

use super::board::{Board, MoveRecord, Score};
use super::common::MoveError;
use super::coord::{Color, Coordinate};
use super::notation::encode_move;
use super::piece::PieceKind;

/// Axis differences of a move. `db` is already mirrored for the mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    pub da: i8,
    pub db: i8,
    pub dc: i8,
}

impl Delta {
    pub fn between(color: Color, from: Coordinate, to: Coordinate) -> Self {
        Delta {
            da: to.file() as i8 - from.file() as i8,
            db: color.forward(from.rank(), to.rank()),
            dc: to.layer_index() as i8 - from.layer_index() as i8,
        }
    }

    /// Absolute deltas in ascending order.
    pub fn sorted_abs(&self) -> [u8; 3] {
        let mut arr = [
            self.da.unsigned_abs(),
            self.db.unsigned_abs(),
            self.dc.unsigned_abs(),
        ];
        arr.sort_unstable();
        arr
    }
}

/// Facts about the move that shape rules depend on besides the deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveContext {
    pub capture: bool,
    pub first_move: bool,
}

pub type ShapeRule = fn(&Delta, &MoveContext) -> bool;

fn pawn_shape(d: &Delta, ctx: &MoveContext) -> bool {
    let layer_ok = (-1..=1).contains(&d.dc);
    if ctx.capture {
        d.da.abs() == 1 && d.db.abs() == 1 && layer_ok
    } else if ctx.first_move {
        d.da == 0 && (d.db == 1 || d.db == 2) && layer_ok
    } else {
        d.da == 0 && d.db == 1 && layer_ok
    }
}

fn knight_shape(d: &Delta, _: &MoveContext) -> bool {
    d.sorted_abs() == [0, 1, 2]
}

fn bishop_shape(d: &Delta, _: &MoveContext) -> bool {
    let (a, b, c) = (d.da.abs(), d.db.abs(), d.dc.abs());
    if c == 0 {
        a == b
    } else {
        c == b && c == a
    }
}

fn rook_shape(d: &Delta, _: &MoveContext) -> bool {
    let arr = d.sorted_abs();
    arr[0] == 0 && arr[1] == 0
}

fn queen_shape(d: &Delta, _: &MoveContext) -> bool {
    let arr = d.sorted_abs();
    (arr[0] == 0 && arr[1] == 0)
        || (arr[0] == 0 && arr[1] == arr[2])
        || (arr[0] == arr[1] && arr[1] == arr[2])
}

// Castling is not part of the variant, first move or not.
fn king_shape(d: &Delta, _: &MoveContext) -> bool {
    d.sorted_abs()[2] <= 1
}

impl PieceKind {
    /// Geometry rule for this kind.
    pub fn shape_rule(self) -> ShapeRule {
        match self {
            PieceKind::Pawn => pawn_shape,
            PieceKind::Knight => knight_shape,
            PieceKind::Bishop => bishop_shape,
            PieceKind::Rook => rook_shape,
            PieceKind::Queen => queen_shape,
            PieceKind::King => king_shape,
        }
    }
}

/// A move that passed every check and can be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedMove {
    pub piece_id: String,
    pub kind: PieceKind,
    pub color: Color,
    pub from: Coordinate,
    pub to: Coordinate,
    pub capture: Option<String>,
}

/// Result of a successfully applied move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub record: MoveRecord,
    /// The mover removed the opponent's king.
    pub checkmate: bool,
    pub white_to_move: bool,
    pub score: Score,
}

/// Intermediate squares between `from` and `to`, exclusive of both ends.
///
/// Each axis steps independently toward its destination. When one axis has
/// fewer intermediate values than another it holds its source value for the
/// remaining steps.
pub fn path_between(from: Coordinate, to: Coordinate) -> Vec<Coordinate> {
    let steps = |a: u8, b: u8| -> Vec<i32> {
        let (a, b) = (a as i32, b as i32);
        if b > a {
            (a + 1..b).collect()
        } else {
            (b + 1..a).rev().collect()
        }
    };
    let files = steps(from.file(), to.file());
    let ranks = steps(from.rank(), to.rank());
    let layers = steps(from.layer_index(), to.layer_index());
    let len = files.len().max(ranks.len()).max(layers.len());

    (0..len)
        .filter_map(|i| {
            let file = files.get(i).copied().unwrap_or(from.file() as i32);
            let rank = ranks.get(i).copied().unwrap_or(from.rank() as i32);
            let layer = layers.get(i).copied().unwrap_or(from.layer_index() as i32);
            Coordinate::checked(file, rank, layer).ok()
        })
        .collect()
}

/// First occupied intermediate square, if any.
pub fn first_blocker(board: &Board, from: Coordinate, to: Coordinate) -> Option<Coordinate> {
    path_between(from, to)
        .into_iter()
        .find(|c| board.is_occupied(*c))
}

/// Decide whether `piece_id` may move to `destination` without touching the
/// board.
pub fn check_move(
    board: &Board,
    piece_id: &str,
    destination: Coordinate,
) -> Result<CheckedMove, MoveError> {
    if board.is_over() {
        return Err(MoveError::GameOver);
    }
    let piece = board
        .piece(piece_id)
        .ok_or_else(|| MoveError::NoSuchPiece(piece_id.into()))?;
    if piece.color != board.side_to_move() {
        return Err(MoveError::WrongTurn {
            id: piece.id.clone(),
            color: piece.color,
        });
    }
    if piece.coord == destination {
        return Err(MoveError::NoOpMove);
    }

    let target = board.piece_at(destination);
    if let Some(occupant) = target.filter(|t| t.color == piece.color) {
        return Err(MoveError::OwnCapture {
            at: destination,
            occupant: occupant.id.clone(),
        });
    }

    if piece.kind.slides() {
        if let Some(at) = first_blocker(board, piece.coord, destination) {
            return Err(MoveError::BlockedPath { at });
        }
    }

    let delta = Delta::between(piece.color, piece.coord, destination);
    let ctx = MoveContext {
        capture: target.is_some(),
        first_move: !piece.has_moved,
    };
    if !(piece.kind.shape_rule())(&delta, &ctx) {
        return Err(MoveError::IllegalShape {
            kind: piece.kind,
            from: piece.coord,
            to: destination,
        });
    }

    Ok(CheckedMove {
        piece_id: piece.id.clone(),
        kind: piece.kind,
        color: piece.color,
        from: piece.coord,
        to: destination,
        capture: target.map(|t| t.id.clone()),
    })
}

/// Check a move and, if legal, apply it: remove any captured piece, move the
/// piece, record the move and pass the turn.
pub fn apply_move(
    board: &mut Board,
    piece_id: &str,
    destination: Coordinate,
) -> Result<MoveOutcome, MoveError> {
    let checked = check_move(board, piece_id, destination)?;
    apply_checked(board, checked)
}

/// Apply a move previously returned by [`check_move`] on the same board.
pub fn apply_checked(board: &mut Board, checked: CheckedMove) -> Result<MoveOutcome, MoveError> {
    if let Some(captured) = &checked.capture {
        board.remove_piece(captured)?;
    }
    board.move_piece(&checked.piece_id, checked.to)?;

    let record = MoveRecord {
        notation: encode_move(checked.from, checked.to),
        piece_id: checked.piece_id,
        from: checked.from,
        to: checked.to,
        captured: checked.capture,
    };
    board.push_record(record.clone());
    board.toggle_turn();

    log::debug!(
        "{} {} -> {}{}",
        record.piece_id,
        record.from,
        record.to,
        record
            .captured
            .as_deref()
            .map(|c| alloc::format!(" captures {}", c))
            .unwrap_or_default()
    );

    Ok(MoveOutcome {
        checkmate: !board.has_king(checked.color.opponent()),
        white_to_move: board.white_to_move(),
        score: board.score(),
        record,
    })
}

/// Every square the piece may legally move to, in board order.
pub fn legal_destinations(board: &Board, piece_id: &str) -> Result<Vec<Coordinate>, MoveError> {
    if board.is_over() {
        return Err(MoveError::GameOver);
    }
    let piece = board
        .piece(piece_id)
        .ok_or_else(|| MoveError::NoSuchPiece(piece_id.into()))?;
    if piece.color != board.side_to_move() {
        return Err(MoveError::WrongTurn {
            id: piece.id.clone(),
            color: piece.color,
        });
    }
    Ok(Coordinate::all()
        .filter(|c| check_move(board, piece_id, *c).is_ok())
        .collect())
}

/// Every legal `(piece id, destination)` pair for the side to move.
pub fn legal_moves(board: &Board) -> Vec<(String, Coordinate)> {
    if board.is_over() {
        return Vec::new();
    }
    let mut moves = Vec::new();
    for piece in board.pieces_of(board.side_to_move()) {
        for coord in Coordinate::all() {
            if check_move(board, &piece.id, coord).is_ok() {
                moves.push((piece.id.clone(), coord));
            }
        }
    }
    moves
}
