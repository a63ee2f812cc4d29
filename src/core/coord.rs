//! Board coordinates, layers and side colors.

use core::fmt;

use super::common::CoordError;
use super::config::{FILES, LAYERS, RANKS};

/// Side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Prefix carried by the ids of this side's pieces.
    pub fn id_prefix(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// Rank difference as seen by this side, so forward is always positive.
    pub fn forward(self, from_rank: u8, to_rank: u8) -> i8 {
        let db = to_rank as i8 - from_rank as i8;
        match self {
            Color::White => db,
            Color::Black => -db,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// One of the three stacked boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Lower,
    Middle,
    Upper,
}

impl Layer {
    pub const ALL: [Layer; LAYERS as usize] = [Layer::Lower, Layer::Middle, Layer::Upper];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Layer> {
        Layer::ALL.get(index as usize).copied()
    }

    /// Letter used for this layer in square notation.
    pub fn letter(self) -> char {
        match self {
            Layer::Lower => 'l',
            Layer::Middle => 'm',
            Layer::Upper => 'u',
        }
    }

    pub fn from_letter(letter: char) -> Option<Layer> {
        match letter {
            'l' => Some(Layer::Lower),
            'm' => Some(Layer::Middle),
            'u' => Some(Layer::Upper),
            _ => None,
        }
    }
}

/// A square on the 8x8x3 board. Components are always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(try_from = "RawCoordinate", into = "RawCoordinate"))]
pub struct Coordinate {
    file: u8,
    rank: u8,
    layer: u8,
}

impl Coordinate {
    /// Build a coordinate, rejecting any component outside the board.
    pub fn new(file: u8, rank: u8, layer: u8) -> Result<Self, CoordError> {
        Self::checked(file as i32, rank as i32, layer as i32)
    }

    /// Build a coordinate from signed components, as received from callers.
    pub fn checked(file: i32, rank: i32, layer: i32) -> Result<Self, CoordError> {
        let in_range = |v: i32, max: u8| (0..max as i32).contains(&v);
        if in_range(file, FILES) && in_range(rank, RANKS) && in_range(layer, LAYERS) {
            Ok(Self {
                file: file as u8,
                rank: rank as u8,
                layer: layer as u8,
            })
        } else {
            Err(CoordError::OutOfRange { file, rank, layer })
        }
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn layer(&self) -> Layer {
        // Construction guarantees the index is valid.
        Layer::from_index(self.layer).unwrap_or(Layer::Middle)
    }

    pub fn layer_index(&self) -> u8 {
        self.layer
    }

    /// Every coordinate on the board, layer by layer, rank by rank.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..LAYERS).flat_map(|layer| {
            (0..RANKS).flat_map(move |rank| {
                (0..FILES).map(move |file| Coordinate { file, rank, layer })
            })
        })
    }
}

/// Square token form: file letter, rank digit, layer letter (`e2m`).
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file) as char;
        write!(f, "{}{}{}", file, self.rank + 1, self.layer().letter())
    }
}

/// Unchecked wire shape of a coordinate, matching the outer layer's
/// `{a, b, c}` objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct RawCoordinate {
    pub a: i32,
    pub b: i32,
    pub c: i32,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::checked(raw.a, raw.b, raw.c)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(coord: Coordinate) -> Self {
        RawCoordinate {
            a: coord.file as i32,
            b: coord.rank as i32,
            c: coord.layer as i32,
        }
    }
}
