//! Two-player chess session manager
//!
//! Tracks a single game played on one device: the board, which square is
//! selected, whose turn it is, a countdown clock per side and the move
//! history. The session survives restarts through a key-value store.
//!
//! # Architecture
//!
//! - [`board`]: Squares, pieces, sides, board positions and FEN placement
//! - [`clock`]: Countdown clocks and the recurring tick schedule
//! - [`session`]: Session snapshot, move-input state machine and the
//!   [`GameSession`] orchestrator
//! - [`storage`]: Key-value stores and the best-effort session repository
//! - [`config`]: Session configuration
//! - [`ui`]: egui desktop shell
//!
//! # Quick Start
//!
//! ```
//! use chess_session::{GameSession, MemoryStore, SessionConfig, SessionRepository, Side};
//!
//! let repository = SessionRepository::new(MemoryStore::new());
//! let mut session = GameSession::load_or_create(SessionConfig::default(), repository);
//!
//! // Pick up the e2 pawn, then drop it on e4
//! session.click("e2");
//! let transition = session.click("e4");
//!
//! assert!(transition.is_move());
//! assert_eq!(session.state().active_side(), Side::Black);
//! assert_eq!(session.state().move_history().len(), 1);
//! ```
//!
//! # Move input
//!
//! Clicks drive a two-state machine. With nothing selected, a click on a
//! piece of the side to move selects it. With a square selected, clicking
//! it again cancels, clicking another own piece moves the selection, and
//! any other square receives the piece. Piece movement patterns are not
//! checked.

pub mod board;
pub mod clock;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;
pub mod ui;

// Re-export commonly used types for convenience
pub use board::{BoardPosition, Piece, Side, Square, BOARD_SIZE};
pub use clock::{CountdownClock, TimeUp};
pub use config::SessionConfig;
pub use session::{GameOutcome, GameSession, MoveRecord, SessionState, Transition};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SessionRepository};
