//! Chess session GUI
//!
//! A two-player, single-device chess board with per-side clocks.

use chess_session::ui::ChessApp;
use chess_session::SessionConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chess_session=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SessionConfig::from_env()?;
    tracing::info!(storage_dir = %config.storage_dir.display(), "configuration loaded");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([720.0, 560.0])
            .with_title("Chess Session"),
        ..Default::default()
    };

    eframe::run_native(
        "Chess Session",
        options,
        Box::new(|cc| Ok(Box::new(ChessApp::new(cc, config)))),
    )?;
    Ok(())
}
