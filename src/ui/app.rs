//! Main application for the chess GUI

use std::time::Instant;

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, ScrollArea, SidePanel, TopBottomPanel};

use super::board_view::BoardView;
use super::theme::*;
use crate::clock::{format_clock, is_low_time};
use crate::session::{GameOutcome, GameSession, IgnoreReason, Transition};
use crate::storage::{FileStore, SessionRepository};
use crate::{SessionConfig, Side};

/// Main chess application
pub struct ChessApp {
    session: GameSession<FileStore>,
    board_view: BoardView,
    show_square_ids: bool,
    message: Option<String>,
}

impl ChessApp {
    /// Resume the saved game from the configured storage directory
    pub fn new(_cc: &eframe::CreationContext<'_>, config: SessionConfig) -> Self {
        let store = FileStore::new(config.storage_dir.clone());
        tracing::info!(dir = %store.dir().display(), "using session storage");
        let repository = SessionRepository::new(store);
        let show_square_ids = config.show_square_ids;
        Self {
            session: GameSession::load_or_create(config, repository),
            board_view: BoardView::default(),
            show_square_ids,
            message: None,
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    if ui.button("New Game").clicked() {
                        self.new_game();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_square_ids, "Square IDs (I)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let id = self.session.state().session_id().to_string();
                    let short: String = id.chars().take(8).collect();
                    ui.label(RichText::new(format!("Session {short}")).color(TEXT_MUTED));
                });
            });
        });
    }

    /// Render the side panel with clocks, status and history
    fn render_side_panel(&mut self, ctx: &Context) {
        SidePanel::right("info_panel")
            .min_width(240.0)
            .max_width(280.0)
            .frame(Frame::new().fill(PANEL_BG).inner_margin(8.0))
            .show(ctx, |ui| {
                ui.add_space(12.0);

                // Black's clock on top, mirroring the board
                self.render_clock_card(ui, Side::Black);
                ui.add_space(10.0);
                self.render_turn_card(ui);
                ui.add_space(10.0);
                self.render_clock_card(ui, Side::White);
                ui.add_space(10.0);

                if let Some(outcome) = self.session.state().outcome() {
                    self.render_game_over_card(ui, outcome);
                    ui.add_space(10.0);
                }

                if let Some(msg) = &self.message {
                    Self::render_message_card(ui, msg);
                    ui.add_space(10.0);
                }

                self.render_history_card(ui);
            });
    }

    /// Helper to create a card frame
    fn card_frame() -> Frame {
        Frame::new()
            .fill(CARD_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn render_clock_card(&self, ui: &mut egui::Ui, side: Side) {
        let state = self.session.state();
        let clock = state.clock(side);
        let running = state.is_clock_active(side) && !self.session.is_frozen();
        let remaining = clock.remaining_ms();

        let color = if remaining == 0 {
            TIMER_CRITICAL
        } else if is_low_time(remaining) {
            TIMER_WARNING
        } else if running {
            TIMER_NORMAL
        } else {
            TEXT_PRIMARY
        };

        let frame = if running {
            Self::card_frame().fill(CARD_ACTIVE_BG)
        } else {
            Self::card_frame()
        };

        frame.show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(side.name().to_uppercase()).size(10.0).color(TEXT_MUTED));
            ui.label(RichText::new(format_clock(remaining)).size(32.0).strong().color(color));
        });
    }

    fn render_turn_card(&self, ui: &mut egui::Ui) {
        let state = self.session.state();
        Self::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            let side = state.active_side();
            ui.label(
                RichText::new(format!("{} to move", side.name()))
                    .size(16.0)
                    .strong()
                    .color(TEXT_PRIMARY),
            );
            let detail = match state.selection() {
                Some(square) => format!("Selected {square}"),
                None => "Select a piece".to_string(),
            };
            ui.label(RichText::new(detail).size(11.0).color(TEXT_SECONDARY));
        });
    }

    fn render_game_over_card(&mut self, ui: &mut egui::Ui, outcome: GameOutcome) {
        let GameOutcome::TimeForfeit { loser } = outcome;

        Frame::new()
            .fill(egui::Color32::from_rgb(45, 80, 55))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("GAME OVER").size(12.0).color(egui::Color32::from_rgb(180, 255, 180)));
                    ui.add_space(6.0);
                    ui.label(
                        RichText::new(format!("{} WINS", outcome.winner().name().to_uppercase()))
                            .size(18.0)
                            .strong()
                            .color(WIN_HIGHLIGHT),
                    );
                    ui.label(
                        RichText::new(format!("{} ran out of time", loser.name()))
                            .size(11.0)
                            .color(TEXT_SECONDARY),
                    );
                    ui.add_space(8.0);
                    if ui.button("New Game").clicked() {
                        self.new_game();
                    }
                });
            });
    }

    fn render_message_card(ui: &mut egui::Ui, msg: &str) {
        Frame::new()
            .fill(egui::Color32::from_rgb(80, 60, 30))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(msg).size(11.0).color(TEXT_PRIMARY));
            });
    }

    fn render_history_card(&self, ui: &mut egui::Ui) {
        let history = self.session.state().move_history();
        Self::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(format!("MOVES ({})", history.len())).size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            ScrollArea::vertical().stick_to_bottom(true).show(ui, |ui| {
                for (n, pair) in history.chunks(2).enumerate() {
                    let white = pair[0].to_string();
                    let black = pair.get(1).map(|m| m.to_string()).unwrap_or_default();
                    ui.label(
                        RichText::new(format!("{:>3}. {:<8} {}", n + 1, white, black))
                            .monospace()
                            .color(TEXT_SECONDARY),
                    );
                }
            });
        });
    }

    /// Render the main board
    fn render_board(&mut self, ctx: &Context) {
        CentralPanel::default().show(ctx, |ui| {
            let state = self.session.state();
            let last_move = state.move_history().last().map(|m| (m.from, m.to));

            let clicked = self.board_view.show(
                ui,
                state.board(),
                state.selection(),
                last_move,
                self.show_square_ids,
            );

            if let Some(square) = clicked {
                let transition = self.session.click_square(square);
                self.message = match transition {
                    Transition::Ignored(IgnoreReason::OpponentPiece) => {
                        Some(format!("It is {}'s turn", self.session.state().active_side().name()))
                    }
                    Transition::Ignored(IgnoreReason::GameOver) => Some("The game is over".to_string()),
                    _ => None,
                };
            }
        });
    }

    fn new_game(&mut self) {
        self.session.reset();
        self.message = None;
    }

    /// Handle keyboard shortcuts
    fn handle_input(&mut self, ctx: &Context) {
        let (toggle_ids, new_game) = ctx.input(|i| (i.key_pressed(egui::Key::I), i.key_pressed(egui::Key::N)));
        if toggle_ids {
            self.show_square_ids = !self.show_square_ids;
        }
        if new_game {
            self.new_game();
        }
    }
}

impl eframe::App for ChessApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        // Apply clock ticks that fell due since the last frame
        let now = Instant::now();
        if let Some(time_up) = self.session.advance_clock(now) {
            self.message = Some(format!("{} flagged", time_up.side.name()));
        }

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx);
        self.render_board(ctx);

        // Wake up for the next tick while a clock is running
        if let Some(due) = self.session.next_tick_due() {
            ctx.request_repaint_after(due.saturating_duration_since(Instant::now()));
        }
    }
}
