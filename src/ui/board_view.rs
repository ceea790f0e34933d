//! Board rendering for the chess GUI

use crate::board::{BoardPosition, Piece, Side, Square, BOARD_SIZE, FILES};
use egui::{CornerRadius, Painter, Pos2, Rect, Sense, Vec2};

use super::theme::*;

/// Board view handles rendering and input for the game board
pub struct BoardView {
    /// Cached square size for coordinate calculations
    square_size: f32,
    /// Area covered by the 64 squares
    grid_rect: Rect,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            square_size: 60.0,
            grid_rect: Rect::NOTHING,
        }
    }
}

/// Unicode glyph for a piece code
pub fn piece_glyph(piece: Piece) -> &'static str {
    match piece.code() {
        'P' => "♙",
        'N' => "♘",
        'B' => "♗",
        'R' => "♖",
        'Q' => "♕",
        'K' => "♔",
        'p' => "♟",
        'n' => "♞",
        'b' => "♝",
        'r' => "♜",
        'q' => "♛",
        'k' => "♚",
        _ => "",
    }
}

impl BoardView {
    /// Render the board and return the clicked square if any
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        board: &BoardPosition,
        selection: Option<Square>,
        last_move: Option<(Square, Square)>,
        show_square_ids: bool,
    ) -> Option<Square> {
        let available_size = ui.available_size();

        // Square board that fits the panel, labels in the margin
        let board_size = (available_size.x.min(available_size.y) - 20.0).max(8.0 * 24.0);
        self.square_size = (board_size - 2.0 * BOARD_MARGIN) / BOARD_SIZE as f32;

        let (response, painter) =
            ui.allocate_painter(Vec2::new(board_size, board_size), Sense::click());

        self.grid_rect = Rect::from_min_size(
            response.rect.min + Vec2::splat(BOARD_MARGIN),
            Vec2::splat(self.square_size * BOARD_SIZE as f32),
        );

        self.draw_squares(&painter, selection, last_move);
        self.draw_coordinates(&painter);
        if show_square_ids {
            self.draw_square_ids(&painter);
        }
        self.draw_pieces(&painter, board);

        let hovered = response.hover_pos().and_then(|p| self.screen_to_square(p));
        if let Some(square) = hovered {
            painter.rect_filled(self.square_rect(square), CornerRadius::ZERO, hover_overlay());
        }

        if response.clicked() {
            response
                .interact_pointer_pos()
                .and_then(|p| self.screen_to_square(p))
        } else {
            None
        }
    }

    fn draw_squares(
        &self,
        painter: &Painter,
        selection: Option<Square>,
        last_move: Option<(Square, Square)>,
    ) {
        for square in Square::all() {
            let color = if selection == Some(square) {
                SELECTED_SQUARE
            } else if last_move.is_some_and(|(from, to)| square == from || square == to) {
                LAST_MOVE_SQUARE
            } else if square.is_light() {
                LIGHT_SQUARE
            } else {
                DARK_SQUARE
            };
            painter.rect_filled(self.square_rect(square), CornerRadius::ZERO, color);
        }
    }

    /// Draw file letters below and rank digits to the left
    fn draw_coordinates(&self, painter: &Painter) {
        let font = egui::FontId::proportional(13.0);

        for (i, file) in FILES.iter().enumerate() {
            let x = self.grid_rect.min.x + (i as f32 + 0.5) * self.square_size;
            let pos = Pos2::new(x, self.grid_rect.max.y + BOARD_MARGIN / 2.0);
            painter.text(pos, egui::Align2::CENTER_CENTER, file, font.clone(), BOARD_LABEL);
        }

        for rank in 0..BOARD_SIZE {
            // Rank 8 on top
            let y = self.grid_rect.max.y - (rank as f32 + 0.5) * self.square_size;
            let pos = Pos2::new(self.grid_rect.min.x - BOARD_MARGIN / 2.0, y);
            painter.text(
                pos,
                egui::Align2::CENTER_CENTER,
                (rank + 1).to_string(),
                font.clone(),
                BOARD_LABEL,
            );
        }
    }

    fn draw_square_ids(&self, painter: &Painter) {
        let font = egui::FontId::monospace(self.square_size * 0.16);
        for square in Square::all() {
            let rect = self.square_rect(square);
            painter.text(
                rect.left_top() + Vec2::new(3.0, 2.0),
                egui::Align2::LEFT_TOP,
                square.to_string(),
                font.clone(),
                SQUARE_ID,
            );
        }
    }

    fn draw_pieces(&self, painter: &Painter, board: &BoardPosition) {
        let font = egui::FontId::proportional(self.square_size * PIECE_SIZE_RATIO);

        for (square, piece) in board.iter() {
            let color = match piece.side() {
                Side::White => WHITE_PIECE,
                Side::Black => BLACK_PIECE,
            };
            let center = self.square_rect(square).center();

            // Dark outline keeps white glyphs readable on light squares
            if piece.side() == Side::White {
                painter.text(
                    center + Vec2::new(1.0, 1.0),
                    egui::Align2::CENTER_CENTER,
                    piece_glyph(piece),
                    font.clone(),
                    BLACK_PIECE,
                );
            }
            painter.text(
                center,
                egui::Align2::CENTER_CENTER,
                piece_glyph(piece),
                font.clone(),
                color,
            );
        }
    }

    /// Screen rectangle of a square (White at the bottom)
    fn square_rect(&self, square: Square) -> Rect {
        let min = Pos2::new(
            self.grid_rect.min.x + square.file() as f32 * self.square_size,
            self.grid_rect.max.y - (square.rank() as f32 + 1.0) * self.square_size,
        );
        Rect::from_min_size(min, Vec2::splat(self.square_size))
    }

    /// Convert screen position to square
    fn screen_to_square(&self, pos: Pos2) -> Option<Square> {
        if !self.grid_rect.contains(pos) || self.square_size <= 0.0 {
            return None;
        }
        let file = ((pos.x - self.grid_rect.min.x) / self.square_size).floor();
        let rank = ((self.grid_rect.max.y - pos.y) / self.square_size).floor();
        if file < 0.0 || rank < 0.0 {
            return None;
        }
        Square::new(file as u8, rank as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> BoardView {
        BoardView {
            square_size: 10.0,
            grid_rect: Rect::from_min_size(Pos2::ZERO, Vec2::splat(80.0)),
        }
    }

    #[test]
    fn test_screen_to_square() {
        let view = view();
        assert_eq!(view.screen_to_square(Pos2::new(1.0, 79.0)), "a1".parse().ok());
        assert_eq!(view.screen_to_square(Pos2::new(79.0, 1.0)), "h8".parse().ok());
        assert_eq!(view.screen_to_square(Pos2::new(45.0, 45.0)), "e4".parse().ok());
        assert_eq!(view.screen_to_square(Pos2::new(-1.0, 5.0)), None);
        assert_eq!(view.screen_to_square(Pos2::new(5.0, 81.0)), None);
    }

    #[test]
    fn test_square_rect_round_trip() {
        let view = view();
        for square in Square::all() {
            let center = view.square_rect(square).center();
            assert_eq!(view.screen_to_square(center), Some(square));
        }
    }

    #[test]
    fn test_piece_glyphs() {
        assert_eq!(piece_glyph(Piece::from_char('K').unwrap()), "♔");
        assert_eq!(piece_glyph(Piece::from_char('p').unwrap()), "♟");
    }
}
