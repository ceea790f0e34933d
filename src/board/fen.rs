//! FEN piece-placement conversion
//!
//! Only the placement field is read: ranks from 8 down to 1 separated by
//! `/`, digits for runs of empty squares, piece letters for occupied ones.
//! Anything after the first space (side to move, castling, ...) is ignored.

use thiserror::Error;

use super::{BoardPosition, Piece, Square, BOARD_SIZE};

/// Placement of the standard opening position
pub const STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected 8 ranks, found {0}")]
    RankCount(usize),

    #[error("rank {rank} describes {files} files")]
    RankWidth { rank: usize, files: usize },

    #[error("invalid character {0:?} in placement")]
    InvalidChar(char),
}

/// Parse a FEN placement (or a full FEN record) into a board position.
pub fn parse_placement(fen: &str) -> Result<BoardPosition, FenError> {
    let placement = fen.split_whitespace().next().unwrap_or("");
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != BOARD_SIZE {
        return Err(FenError::RankCount(rows.len()));
    }

    let mut position = BoardPosition::new();
    for (row_idx, row) in rows.iter().enumerate() {
        let rank = BOARD_SIZE - 1 - row_idx; // first row is rank 8
        let mut file = 0usize;

        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                if skip == 0 {
                    return Err(FenError::InvalidChar(c));
                }
                file += skip as usize;
            } else {
                let piece = Piece::from_char(c).map_err(|_| FenError::InvalidChar(c))?;
                let square = Square::new(file as u8, rank as u8).ok_or(FenError::RankWidth {
                    rank: rank + 1,
                    files: file + 1,
                })?;
                position = position.with_piece(square, piece);
                file += 1;
            }

            if file > BOARD_SIZE {
                return Err(FenError::RankWidth { rank: rank + 1, files: file });
            }
        }

        if file != BOARD_SIZE {
            return Err(FenError::RankWidth { rank: rank + 1, files: file });
        }
    }

    Ok(position)
}

/// Format a board position as a FEN placement
pub fn to_placement(position: &BoardPosition) -> String {
    let mut out = String::with_capacity(72);

    for rank in (0..BOARD_SIZE as u8).rev() {
        let mut empty = 0;
        for file in 0..BOARD_SIZE as u8 {
            match Square::new(file, rank).and_then(|sq| position.get(sq)) {
                Some(piece) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    out.push(piece.code());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out
}
