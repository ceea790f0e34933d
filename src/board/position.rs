//! Board position: which piece stands on which square

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Piece, Square};

/// Mapping from square to piece.
///
/// An empty square has no entry at all; there is no "empty" piece value.
/// Moves never edit a position in place, they build the next one with
/// [`BoardPosition::with_move`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardPosition {
    pieces: BTreeMap<Square, Piece>,
}

/// Result of moving a piece on a position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub position: BoardPosition,
    pub piece: Piece,
    pub captured: Option<Piece>,
}

impl BoardPosition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the piece at a square
    #[inline]
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.pieces.get(&square).copied()
    }

    #[inline]
    pub fn is_empty_at(&self, square: Square) -> bool {
        !self.pieces.contains_key(&square)
    }

    /// Number of occupied squares
    #[inline]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Occupied squares in a1..h8 order
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces.iter().map(|(sq, p)| (*sq, *p))
    }

    /// Builder-style placement, used when assembling a position from a feed
    pub fn with_piece(mut self, square: Square, piece: Piece) -> Self {
        self.pieces.insert(square, piece);
        self
    }

    /// Build the position that follows moving the piece on `from` to `to`.
    ///
    /// Whatever stood on `to` is replaced. Returns `None` when `from` is
    /// empty. `self` is left untouched.
    pub fn with_move(&self, from: Square, to: Square) -> Option<AppliedMove> {
        let piece = self.get(from)?;
        let mut pieces = self.pieces.clone();
        pieces.remove(&from);
        let captured = pieces.insert(to, piece);
        Some(AppliedMove {
            position: BoardPosition { pieces },
            piece,
            captured,
        })
    }
}

impl FromIterator<(Square, Piece)> for BoardPosition {
    fn from_iter<I: IntoIterator<Item = (Square, Piece)>>(iter: I) -> Self {
        Self {
            pieces: iter.into_iter().collect(),
        }
    }
}
