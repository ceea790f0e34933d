//! Theme constants for the chess GUI

use egui::Color32;

// Board colors - classic green/cream
pub const LIGHT_SQUARE: Color32 = Color32::from_rgb(238, 238, 210);
pub const DARK_SQUARE: Color32 = Color32::from_rgb(118, 150, 86);
pub const SELECTED_SQUARE: Color32 = Color32::from_rgb(246, 246, 105);
pub const LAST_MOVE_SQUARE: Color32 = Color32::from_rgb(186, 202, 68);
pub const BOARD_LABEL: Color32 = Color32::from_rgb(160, 165, 175);
pub const SQUARE_ID: Color32 = Color32::from_rgb(90, 90, 90);

// Piece colors
pub const WHITE_PIECE: Color32 = Color32::from_rgb(250, 250, 252);
pub const BLACK_PIECE: Color32 = Color32::from_rgb(25, 25, 30);

pub fn hover_overlay() -> Color32 {
    Color32::from_rgba_unmultiplied(255, 255, 255, 40)
}

// Panel colors - dark modern theme
pub const PANEL_BG: Color32 = Color32::from_rgb(25, 27, 31);
pub const CARD_BG: Color32 = Color32::from_rgb(35, 38, 43);
pub const CARD_ACTIVE_BG: Color32 = Color32::from_rgb(48, 56, 44);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 165, 175);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 125, 135);
pub const WIN_HIGHLIGHT: Color32 = Color32::from_rgb(50, 220, 50);

// Clock colors
pub const TIMER_NORMAL: Color32 = Color32::from_rgb(80, 200, 120);
pub const TIMER_WARNING: Color32 = Color32::from_rgb(255, 180, 50);
pub const TIMER_CRITICAL: Color32 = Color32::from_rgb(255, 70, 70);

// Sizes
pub const BOARD_MARGIN: f32 = 28.0;
pub const PIECE_SIZE_RATIO: f32 = 0.8;
