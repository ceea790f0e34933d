//! Board representation for the chess session

pub mod fen;
pub mod position;


use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-exports
pub use position::BoardPosition;

/// Board size (8x8)
pub const BOARD_SIZE: usize = 8;
pub const TOTAL_SQUARES: usize = BOARD_SIZE * BOARD_SIZE; // 64

/// File letters in board order
pub const FILES: [char; BOARD_SIZE] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

/// The two players. White moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
}

impl Side {
    /// Get the other side
    #[inline]
    pub fn flip(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Single-letter code used in move records and storage
    pub fn code(self) -> char {
        match self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::White => "White",
            Side::Black => "Black",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error returned when a token is not one of the 64 square identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid square identifier: {0:?}")]
pub struct ParseSquareError(pub String);

/// A square on the board, addressed by file (a-h) and rank (1-8).
///
/// Internally both coordinates are zero-based, so `a1` is `(0, 0)` and
/// `h8` is `(7, 7)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    // Field order gives rank-major ordering: a1, b1, ..., h8
    rank: u8,
    file: u8,
}

impl Square {
    /// Create from zero-based file and rank, `None` when off the board
    #[inline]
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if (file as usize) < BOARD_SIZE && (rank as usize) < BOARD_SIZE {
            Some(Self { rank, file })
        } else {
            None
        }
    }

    #[inline]
    pub fn file(self) -> u8 {
        self.file
    }

    #[inline]
    pub fn rank(self) -> u8 {
        self.rank
    }

    #[inline]
    pub fn to_index(self) -> usize {
        self.rank as usize * BOARD_SIZE + self.file as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Option<Self> {
        if idx < TOTAL_SQUARES {
            Some(Self {
                rank: (idx / BOARD_SIZE) as u8,
                file: (idx % BOARD_SIZE) as u8,
            })
        } else {
            None
        }
    }

    /// Light squares are the ones where file + rank is odd (a1 is dark)
    #[inline]
    pub fn is_light(self) -> bool {
        (self.file + self.rank) % 2 == 1
    }

    /// All 64 squares, a1 first
    pub fn all() -> impl Iterator<Item = Square> {
        (0..TOTAL_SQUARES).filter_map(Square::from_index)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", FILES[self.file as usize], self.rank + 1)
    }
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ParseSquareError(s.to_string()));
        }
        match (bytes[0], bytes[1]) {
            (f @ b'a'..=b'h', r @ b'1'..=b'8') => Ok(Self {
                file: f - b'a',
                rank: r - b'1',
            }),
            _ => Err(ParseSquareError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Square {
    type Error = ParseSquareError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_string()
    }
}

/// Error returned for a character that is not a piece code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid piece code: {0:?}")]
pub struct ParsePieceError(pub String);

/// A piece code: one of `PNBRQK` for White or `pnbrqk` for Black.
///
/// The letter case carries the owning side, so the code itself is all the
/// state a piece has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Piece(char);

impl Piece {
    pub fn from_char(c: char) -> Result<Self, ParsePieceError> {
        match c {
            'P' | 'N' | 'B' | 'R' | 'Q' | 'K' | 'p' | 'n' | 'b' | 'r' | 'q' | 'k' => Ok(Piece(c)),
            _ => Err(ParsePieceError(c.to_string())),
        }
    }

    #[inline]
    pub fn code(self) -> char {
        self.0
    }

    /// Owning side, decided by letter case alone
    #[inline]
    pub fn side(self) -> Side {
        if self.0 == self.0.to_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Piece::from_char(c),
            _ => Err(ParsePieceError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Piece {
    type Error = ParsePieceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Piece> for String {
    fn from(piece: Piece) -> Self {
        piece.0.to_string()
    }
}

/// Side owning the piece on a square, `None` for an empty square.
#[inline]
pub fn owner(piece: Option<Piece>) -> Option<Side> {
    piece.map(Piece::side)
}
