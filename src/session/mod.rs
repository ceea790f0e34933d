//! Session state: the full snapshot of one game in progress
//!
//! A [`SessionState`] is replaced wholesale on every change. Transition
//! functions take `&self` and hand back the next snapshot; nothing edits a
//! snapshot that someone else may be holding.

pub mod game;
pub mod input;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::{BoardPosition, Piece, Side, Square};
use crate::clock::{CountdownClock, TimeUp};
use crate::config::SessionConfig;

pub use game::GameSession;
pub use input::{handle_click, IgnoreReason, Transition};

/// Identifier of one session, regenerated on every reset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new random id (UUID v4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One executed move, in the order it was played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    /// Side that made the move
    pub turn: Side,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured: Option<Piece>,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.captured.is_some() { 'x' } else { '-' };
        write!(f, "{}{}{}{}", self.piece, self.from, sep, self.to)
    }
}

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GameOutcome {
    /// A side's clock reached zero
    TimeForfeit { loser: Side },
}

impl GameOutcome {
    pub fn winner(self) -> Side {
        match self {
            GameOutcome::TimeForfeit { loser } => loser.flip(),
        }
    }
}

/// Snapshot of one game
///
/// Serialized directly in camelCase; deserialized through `StoredSession`,
/// which carries the same field names and validates the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredSession")]
pub struct SessionState {
    session_id: SessionId,
    board_position: BoardPosition,
    selection: Option<Square>,
    active_side: Side,
    white_clock: CountdownClock,
    black_clock: CountdownClock,
    move_history: Vec<MoveRecord>,
    outcome: Option<GameOutcome>,
}

impl SessionState {
    /// New game from the configured start position and clock
    pub fn fresh(config: &SessionConfig) -> Self {
        Self::from_position(config.start_position.clone(), config.starting_time_ms)
    }

    /// New game from an arbitrary position, White to move
    pub fn from_position(board: BoardPosition, starting_ms: u64) -> Self {
        Self {
            session_id: SessionId::generate(),
            board_position: board,
            selection: None,
            active_side: Side::White,
            white_clock: CountdownClock::new(Side::White, starting_ms),
            black_clock: CountdownClock::new(Side::Black, starting_ms),
            move_history: Vec::new(),
            outcome: None,
        }
    }

    #[inline]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[inline]
    pub fn board(&self) -> &BoardPosition {
        &self.board_position
    }

    #[inline]
    pub fn selection(&self) -> Option<Square> {
        self.selection
    }

    #[inline]
    pub fn active_side(&self) -> Side {
        self.active_side
    }

    pub fn clock(&self, side: Side) -> &CountdownClock {
        match side {
            Side::White => &self.white_clock,
            Side::Black => &self.black_clock,
        }
    }

    fn clock_mut(&mut self, side: Side) -> &mut CountdownClock {
        match side {
            Side::White => &mut self.white_clock,
            Side::Black => &mut self.black_clock,
        }
    }

    /// Whether `side`'s clock is the one running
    #[inline]
    pub fn is_clock_active(&self, side: Side) -> bool {
        self.clock(side).is_active(self.active_side)
    }

    #[inline]
    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    #[inline]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Advance the running clock by one interval.
    ///
    /// Only the side to move loses time. When its clock reaches zero the
    /// game is recorded as lost on time (unless it was already decided) and
    /// the expiry signal is returned.
    pub fn tick(&self, interval_ms: u64) -> (Self, Option<TimeUp>) {
        let mut next = self.clone();
        let active = next.active_side;
        let time_up = next.clock_mut(active).on_tick(active, interval_ms);

        if let Some(signal) = time_up {
            if next.outcome.is_none() {
                next.outcome = Some(GameOutcome::TimeForfeit { loser: signal.side });
            }
        }
        (next, time_up)
    }

    /// Overwrite both clocks with authoritative values.
    ///
    /// A clock pushed to zero before it had flagged emits its expiry signal
    /// here, and the first such signal decides the game like a tick would.
    /// When both reach zero together the side to move is the loser.
    pub fn resync_clocks(&self, white_ms: u64, black_ms: u64) -> (Self, Vec<TimeUp>) {
        let mut next = self.clone();
        let active = next.active_side;
        let remaining = |side: Side| match side {
            Side::White => white_ms,
            Side::Black => black_ms,
        };

        let signals: Vec<TimeUp> = [active, active.flip()]
            .into_iter()
            .filter_map(|side| next.clock_mut(side).resync(remaining(side)))
            .collect();

        if let Some(first) = signals.first() {
            if next.outcome.is_none() {
                next.outcome = Some(GameOutcome::TimeForfeit { loser: first.side });
            }
        }
        (next, signals)
    }

    pub(crate) fn with_selection(&self, selection: Option<Square>) -> Self {
        Self {
            selection,
            ..self.clone()
        }
    }

    /// Install the board after a move: turn passes, record appended, selection cleared
    pub(crate) fn after_move(&self, board: BoardPosition, record: MoveRecord) -> Self {
        let mut move_history = Vec::with_capacity(self.move_history.len() + 1);
        move_history.extend_from_slice(&self.move_history);
        move_history.push(record);

        Self {
            session_id: self.session_id.clone(),
            board_position: board,
            selection: None,
            active_side: self.active_side.flip(),
            white_clock: self.white_clock,
            black_clock: self.black_clock,
            move_history,
            outcome: self.outcome,
        }
    }
}

/// Wire shape of a persisted session, checked before it becomes a state
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    session_id: SessionId,
    board_position: BoardPosition,
    #[serde(default)]
    selection: Option<Square>,
    active_side: Side,
    white_clock: CountdownClock,
    black_clock: CountdownClock,
    #[serde(default)]
    move_history: Vec<MoveRecord>,
    #[serde(default)]
    outcome: Option<GameOutcome>,
}

impl TryFrom<StoredSession> for SessionState {
    type Error = String;

    fn try_from(stored: StoredSession) -> Result<Self, Self::Error> {
        if stored.session_id.is_blank() {
            return Err("session id is empty".to_string());
        }

        Ok(Self {
            session_id: stored.session_id,
            board_position: stored.board_position,
            selection: stored.selection,
            active_side: stored.active_side,
            white_clock: stored.white_clock.with_side(Side::White),
            black_clock: stored.black_clock.with_side(Side::Black),
            move_history: stored.move_history,
            outcome: stored.outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::parse_placement;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_fresh_state() {
        let config = SessionConfig::default();
        let state = SessionState::fresh(&config);

        assert_eq!(state.active_side(), Side::White);
        assert_eq!(state.selection(), None);
        assert!(state.move_history().is_empty());
        assert_eq!(state.board(), &config.start_position);
        assert_eq!(state.clock(Side::White).remaining_ms(), 180_000);
        assert_eq!(state.clock(Side::Black).remaining_ms(), 180_000);
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_session_ids_differ() {
        let config = SessionConfig::default();
        let a = SessionState::fresh(&config);
        let b = SessionState::fresh(&config);
        assert_ne!(a.session_id(), b.session_id());
    }

    #[test]
    fn test_only_active_clock_runs() {
        let state = SessionState::from_position(BoardPosition::new(), 10_000);
        assert!(state.is_clock_active(Side::White));
        assert!(!state.is_clock_active(Side::Black));

        let (next, signal) = state.tick(1_000);
        assert_eq!(signal, None);
        assert_eq!(next.clock(Side::White).remaining_ms(), 9_000);
        assert_eq!(next.clock(Side::Black).remaining_ms(), 10_000);
        // Previous snapshot is untouched
        assert_eq!(state.clock(Side::White).remaining_ms(), 10_000);
    }

    #[test]
    fn test_tick_to_zero_ends_game() {
        let state = SessionState::from_position(BoardPosition::new(), 1_000);
        let (next, signal) = state.tick(1_000);

        assert_eq!(signal, Some(TimeUp { side: Side::White }));
        assert_eq!(next.outcome(), Some(GameOutcome::TimeForfeit { loser: Side::White }));
        assert_eq!(next.outcome().map(GameOutcome::winner), Some(Side::Black));

        let (after, signal) = next.tick(1_000);
        assert_eq!(signal, None);
        assert_eq!(after, next);
    }

    #[test]
    fn test_resync_to_zero_ends_game() {
        let state = SessionState::from_position(BoardPosition::new(), 10_000);
        let (next, signals) = state.resync_clocks(0, 5_000);

        assert_eq!(signals, vec![TimeUp { side: Side::White }]);
        assert_eq!(next.clock(Side::White).remaining_ms(), 0);
        assert_eq!(next.clock(Side::Black).remaining_ms(), 5_000);
        assert_eq!(next.outcome(), Some(GameOutcome::TimeForfeit { loser: Side::White }));

        // Already flagged: neither a tick nor another resync signals again
        let (after_tick, signal) = next.tick(1_000);
        assert_eq!(signal, None);
        assert_eq!(after_tick, next);
        let (_, signals) = next.resync_clocks(0, 5_000);
        assert!(signals.is_empty());
    }

    #[test]
    fn test_resync_both_to_zero() {
        let state = SessionState::from_position(BoardPosition::new(), 10_000);
        let (next, signals) = state.resync_clocks(0, 0);

        assert_eq!(
            signals,
            vec![TimeUp { side: Side::White }, TimeUp { side: Side::Black }]
        );
        assert_eq!(next.outcome(), Some(GameOutcome::TimeForfeit { loser: Side::White }));
    }

    #[test]
    fn test_resync_positive_keeps_playing() {
        let state = SessionState::from_position(BoardPosition::new(), 10_000);
        let (next, signals) = state.resync_clocks(4_000, 7_000);

        assert!(signals.is_empty());
        assert!(!next.is_game_over());
        assert_eq!(next.clock(Side::White).remaining_ms(), 4_000);
        assert_eq!(next.clock(Side::Black).remaining_ms(), 7_000);
        assert_eq!(state.clock(Side::White).remaining_ms(), 10_000);
    }

    #[test]
    fn test_json_round_trip() {
        let board = parse_placement("4k3/8/8/8/8/8/8/R3K3").unwrap();
        let state = SessionState::from_position(board, 5_000);
        let state = state.with_selection(Some(sq("a1")));
        let (state, _) = state.tick(1_000);

        let json = serde_json::to_string(&state).unwrap();
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
        assert_eq!(back.clock(Side::Black).side(), Side::Black);
    }

    #[test]
    fn test_json_shape() {
        let board = BoardPosition::new().with_piece(sq("e2"), Piece::from_char('P').unwrap());
        let state = SessionState::from_position(board, 180_000);
        let value = serde_json::to_value(&state).unwrap();

        assert_eq!(value["boardPosition"], serde_json::json!({"e2": "P"}));
        assert_eq!(value["activeSide"], "w");
        assert_eq!(value["selection"], serde_json::Value::Null);
        assert_eq!(value["whiteClock"]["remainingMs"], 180_000);
        assert!(value["sessionId"].is_string());
        assert!(value["moveHistory"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_blank_session_id() {
        let json = r#"{
            "sessionId": "",
            "boardPosition": {},
            "activeSide": "w",
            "whiteClock": {"remainingMs": 1000},
            "blackClock": {"remainingMs": 1000}
        }"#;
        assert!(serde_json::from_str::<SessionState>(json).is_err());

        let missing = r#"{"boardPosition": {}, "activeSide": "w"}"#;
        assert!(serde_json::from_str::<SessionState>(missing).is_err());
    }

    #[test]
    fn test_move_record_json() {
        let record = MoveRecord {
            from: sq("e2"),
            to: sq("e4"),
            piece: Piece::from_char('P').unwrap(),
            turn: Side::White,
            captured: None,
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"from":"e2","to":"e4","piece":"P","turn":"w"}"#
        );
        assert_eq!(record.to_string(), "Pe2-e4");
    }
}
