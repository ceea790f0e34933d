//! GUI module for the chess session
//!
//! A native egui/eframe shell around [`GameSession`](crate::GameSession):
//! it turns pointer clicks into squares, wakes up for clock ticks and draws
//! the state. No game logic lives here.

mod app;
mod board_view;
mod theme;

pub use app::ChessApp;
pub use board_view::piece_glyph;
