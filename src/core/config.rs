use super::piece::PieceKind;

pub const FILES: u8 = 8;
pub const RANKS: u8 = 8;
pub const LAYERS: u8 = 3;

/// Total number of addressable squares across all layers.
pub const NUM_SQUARES: usize = FILES as usize * RANKS as usize * LAYERS as usize;

pub const PIECES_PER_SIDE: usize = 16;

/// Back rank, file by file, with the id suffix each piece carries.
pub const BACK_RANK: [(&str, PieceKind); FILES as usize] = [
    ("kr", PieceKind::Rook),
    ("kk", PieceKind::Knight),
    ("kb", PieceKind::Bishop),
    ("k", PieceKind::King),
    ("q", PieceKind::Queen),
    ("qb", PieceKind::Bishop),
    ("qk", PieceKind::Knight),
    ("qr", PieceKind::Rook),
];

/// Starting (back rank, pawn rank, layer) for white.
pub const WHITE_HOME: (u8, u8, u8) = (0, 1, 0);
/// Starting (back rank, pawn rank, layer) for black.
pub const BLACK_HOME: (u8, u8, u8) = (7, 6, 2);
