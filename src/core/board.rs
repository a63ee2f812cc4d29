//! Authoritative game state: pieces of both sides, turn flag and history.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use super::common::BoardError;
use super::config::{BACK_RANK, BLACK_HOME, FILES, PIECES_PER_SIDE, WHITE_HOME};
use super::coord::{Color, Coordinate};
use super::piece::{Piece, PieceKind};

/// One applied move. Never changed once appended to the history.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveRecord {
    pub piece_id: String,
    pub from: Coordinate,
    pub to: Coordinate,
    pub captured: Option<String>,
    /// Protocol notation of the move, e.g. `a2la3l`.
    pub notation: String,
}

/// Material totals per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    pub white: u32,
    pub black: u32,
}

/// Deserialization goes through [`Board::from_pieces`], so a stored board
/// gets the same checks as a constructed one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(try_from = "StoredBoard"))]
pub struct Board {
    white: Vec<Piece>,
    black: Vec<Piece>,
    white_to_move: bool,
    history: Vec<MoveRecord>,
}

impl Board {
    /// Standard layered starting position, white to move.
    pub fn new() -> Self {
        Board {
            white: home_pieces(Color::White),
            black: home_pieces(Color::Black),
            white_to_move: true,
            history: Vec::new(),
        }
    }

    /// A board with no pieces, white to move.
    pub fn empty() -> Self {
        Board {
            white: Vec::new(),
            black: Vec::new(),
            white_to_move: true,
            history: Vec::new(),
        }
    }

    /// Build a board from an arbitrary set of pieces. Rejects duplicate ids,
    /// shared squares and a side with two kings.
    pub fn from_pieces<I>(pieces: I, white_to_move: bool) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = Piece>,
    {
        let mut board = Board::empty();
        board.white_to_move = white_to_move;
        for piece in pieces {
            if board.piece(&piece.id).is_some() {
                return Err(BoardError::DuplicateId(piece.id));
            }
            if let Some(occupant) = board.piece_at(piece.coord) {
                return Err(BoardError::InvariantViolation {
                    at: piece.coord,
                    occupant: occupant.id.clone(),
                });
            }
            if piece.kind == PieceKind::King && board.has_king(piece.color) {
                return Err(BoardError::ExtraKing(piece.color));
            }
            board.side_mut(piece.color).push(piece);
        }
        Ok(board)
    }

    pub fn white_to_move(&self) -> bool {
        self.white_to_move
    }

    pub fn side_to_move(&self) -> Color {
        if self.white_to_move {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Pieces of one side, in their starting order minus captures.
    pub fn pieces_of(&self, color: Color) -> &[Piece] {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn side_mut(&mut self, color: Color) -> &mut Vec<Piece> {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// All pieces, white first.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.white.iter().chain(self.black.iter())
    }

    pub fn piece(&self, id: &str) -> Option<&Piece> {
        self.pieces().find(|p| p.id == id)
    }

    pub fn piece_at(&self, coord: Coordinate) -> Option<&Piece> {
        self.pieces().find(|p| p.coord == coord)
    }

    pub fn is_occupied(&self, coord: Coordinate) -> bool {
        self.piece_at(coord).is_some()
    }

    /// Remove a piece from play, returning it.
    pub fn remove_piece(&mut self, id: &str) -> Result<Piece, BoardError> {
        for color in [Color::White, Color::Black] {
            let side = self.side_mut(color);
            if let Some(idx) = side.iter().position(|p| p.id == id) {
                return Ok(side.remove(idx));
            }
        }
        Err(BoardError::UnknownPiece(id.into()))
    }

    /// Relocate a piece and mark it as moved. The destination must be empty;
    /// captures are removed beforehand. Returns the previous coordinate.
    pub fn move_piece(&mut self, id: &str, to: Coordinate) -> Result<Coordinate, BoardError> {
        if let Some(occupant) = self.piece_at(to) {
            if occupant.id != id {
                return Err(BoardError::InvariantViolation {
                    at: to,
                    occupant: occupant.id.clone(),
                });
            }
        }
        let piece = self
            .white
            .iter_mut()
            .chain(self.black.iter_mut())
            .find(|p| p.id == id)
            .ok_or_else(|| BoardError::UnknownPiece(id.into()))?;
        let from = piece.coord;
        piece.coord = to;
        piece.has_moved = true;
        Ok(from)
    }

    pub(crate) fn toggle_turn(&mut self) {
        self.white_to_move = !self.white_to_move;
    }

    pub(crate) fn push_record(&mut self, record: MoveRecord) {
        self.history.push(record);
    }

    /// Applied moves, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Notation of every applied move, oldest first.
    pub fn notation_history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(|r| r.notation.as_str())
    }

    pub fn has_king(&self, color: Color) -> bool {
        self.pieces_of(color).iter().any(|p| p.kind == PieceKind::King)
    }

    /// The side whose opponent has lost its king, if any.
    pub fn winner(&self) -> Option<Color> {
        match (self.has_king(Color::White), self.has_king(Color::Black)) {
            (true, false) => Some(Color::White),
            (false, true) => Some(Color::Black),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Sum of material values for each side.
    pub fn score(&self) -> Score {
        let total = |pieces: &[Piece]| pieces.iter().map(|p| p.kind.value()).sum();
        Score {
            white: total(&self.white),
            black: total(&self.black),
        }
    }
}

/// Unchecked field layout of a serialized [`Board`].
#[cfg(feature = "std")]
#[derive(serde::Deserialize)]
struct StoredBoard {
    white: Vec<Piece>,
    black: Vec<Piece>,
    white_to_move: bool,
    history: Vec<MoveRecord>,
}

#[cfg(feature = "std")]
impl TryFrom<StoredBoard> for Board {
    type Error = BoardError;

    fn try_from(stored: StoredBoard) -> Result<Self, Self::Error> {
        let mut board =
            Board::from_pieces(stored.white.into_iter().chain(stored.black), stored.white_to_move)?;
        board.history = stored.history;
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn home_pieces(color: Color) -> Vec<Piece> {
    let (back, pawns, layer) = match color {
        Color::White => WHITE_HOME,
        Color::Black => BLACK_HOME,
    };
    let prefix = color.id_prefix();
    let mut pieces = Vec::with_capacity(PIECES_PER_SIDE);
    for (file, (suffix, kind)) in BACK_RANK.iter().enumerate() {
        if let Ok(coord) = Coordinate::new(file as u8, back, layer) {
            pieces.push(Piece::new(format!("{}{}", prefix, suffix), *kind, color, coord));
        }
    }
    for file in 0..FILES {
        if let Ok(coord) = Coordinate::new(file, pawns, layer) {
            pieces.push(Piece::new(
                format!("{}p{}", prefix, file + 1),
                PieceKind::Pawn,
                color,
                coord,
            ));
        }
    }
    pieces
}
