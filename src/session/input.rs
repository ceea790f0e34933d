//! Move-input state machine
//!
//! Two states, keyed by the selection:
//!
//! - **No selection**: clicking a piece of the side to move selects it;
//!   clicking an empty square or an opponent piece does nothing.
//! - **Square `S` selected**: clicking `S` again cancels; clicking another
//!   piece of the same side moves the selection there; any other square
//!   (empty, or holding an opponent piece) receives the selected piece,
//!   the turn passes and the move is recorded.
//!
//! Only ownership, turn and same-side capture are checked. Piece movement
//! patterns are not validated.

use crate::board::{owner, Square};

use super::{MoveRecord, SessionState};

/// Why a click left the state unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Nothing selected and nothing on the square
    EmptySquare,
    /// Nothing selected and the piece belongs to the side not on move
    OpponentPiece,
    /// The click did not name one of the 64 squares
    InvalidSquare,
    /// The game has ended and moves are frozen
    GameOver,
}

/// Outcome of one click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Ignored(IgnoreReason),
    Selected(Square),
    Deselected(Square),
    /// Same-side "capture" reinterpreted as picking the other piece
    Reselected { from: Square, to: Square },
    Moved(MoveRecord),
}

impl Transition {
    /// False only when the state is exactly as before
    #[inline]
    pub fn changes_state(&self) -> bool {
        !matches!(self, Transition::Ignored(_))
    }

    #[inline]
    pub fn is_move(&self) -> bool {
        matches!(self, Transition::Moved(_))
    }
}

/// Apply a click on `square` to `state`.
///
/// Total over all squares: every click yields a next state (equal to the
/// input for [`Transition::Ignored`]) and a description of what happened.
pub fn handle_click(state: &SessionState, square: Square) -> (SessionState, Transition) {
    let Some(selected) = state.selection() else {
        return select(state, square);
    };

    let board = state.board();
    let mover = match board.get(selected) {
        Some(piece) if piece.side() == state.active_side() => piece,
        _ => {
            // Selection no longer holds a piece of the side to move
            tracing::debug!(%selected, "dropping stale selection");
            let cleared = state.with_selection(None);
            return match select(&cleared, square) {
                (_, Transition::Ignored(_)) => (cleared, Transition::Deselected(selected)),
                next => next,
            };
        }
    };

    if square == selected {
        return (state.with_selection(None), Transition::Deselected(selected));
    }

    if owner(board.get(square)) == Some(mover.side()) {
        return (
            state.with_selection(Some(square)),
            Transition::Reselected {
                from: selected,
                to: square,
            },
        );
    }

    match board.with_move(selected, square) {
        Some(applied) => {
            let record = MoveRecord {
                from: selected,
                to: square,
                piece: applied.piece,
                turn: state.active_side(),
                captured: applied.captured,
            };
            tracing::debug!(%record, "move applied");
            (state.after_move(applied.position, record), Transition::Moved(record))
        }
        // Unreachable: mover was read from `selected` above
        None => (state.with_selection(None), Transition::Deselected(selected)),
    }
}

/// State A: nothing selected
fn select(state: &SessionState, square: Square) -> (SessionState, Transition) {
    match owner(state.board().get(square)) {
        None => (state.clone(), Transition::Ignored(IgnoreReason::EmptySquare)),
        Some(side) if side != state.active_side() => {
            (state.clone(), Transition::Ignored(IgnoreReason::OpponentPiece))
        }
        Some(_) => (state.with_selection(Some(square)), Transition::Selected(square)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::parse_placement;
    use crate::board::{BoardPosition, Piece, Side};
    use crate::config::SessionConfig;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn piece(c: char) -> Piece {
        Piece::from_char(c).unwrap()
    }

    fn start() -> SessionState {
        SessionState::fresh(&SessionConfig::default())
    }

    fn click(state: &SessionState, s: &str) -> (SessionState, Transition) {
        handle_click(state, sq(s))
    }

    #[test]
    fn test_pawn_e2_e4() {
        let state = start();
        let (state, t) = click(&state, "e2");
        assert_eq!(t, Transition::Selected(sq("e2")));
        assert_eq!(state.selection(), Some(sq("e2")));

        let (state, t) = click(&state, "e4");
        let expected = MoveRecord {
            from: sq("e2"),
            to: sq("e4"),
            piece: piece('P'),
            turn: Side::White,
            captured: None,
        };
        assert_eq!(t, Transition::Moved(expected));
        assert!(state.board().is_empty_at(sq("e2")));
        assert_eq!(state.board().get(sq("e4")), Some(piece('P')));
        assert_eq!(state.active_side(), Side::Black);
        assert_eq!(state.move_history(), &[expected]);
        assert_eq!(state.selection(), None);
    }

    #[test]
    fn test_opponent_piece_not_selectable() {
        let state = start();
        let (next, t) = click(&state, "e7");
        assert_eq!(t, Transition::Ignored(IgnoreReason::OpponentPiece));
        assert_eq!(next, state);
        assert_eq!(next.selection(), None);
    }

    #[test]
    fn test_empty_square_without_selection() {
        let state = start();
        let (next, t) = click(&state, "e4");
        assert_eq!(t, Transition::Ignored(IgnoreReason::EmptySquare));
        assert_eq!(next, state);
    }

    #[test]
    fn test_click_selected_square_cancels() {
        let state = start();
        let (selected, _) = click(&state, "e2");
        let (next, t) = click(&selected, "e2");

        assert_eq!(t, Transition::Deselected(sq("e2")));
        assert_eq!(next.selection(), None);
        assert_eq!(next.board(), state.board());
        assert_eq!(next.active_side(), Side::White);
        assert!(next.move_history().is_empty());
    }

    #[test]
    fn test_same_side_target_reselects() {
        let state = start();
        let (selected, _) = click(&state, "a1");
        let (next, t) = click(&selected, "b1");

        assert_eq!(
            t,
            Transition::Reselected {
                from: sq("a1"),
                to: sq("b1")
            }
        );
        assert_eq!(next.selection(), Some(sq("b1")));
        assert_eq!(next.board(), state.board());
        assert_eq!(next.active_side(), Side::White);
        assert!(next.move_history().is_empty());
    }

    #[test]
    fn test_capture_removes_one_piece() {
        let board = parse_placement("4k3/8/8/3p4/4P3/8/8/4K3").unwrap();
        let state = SessionState::from_position(board, 60_000);
        let before = state.board().piece_count();

        let (state, _) = click(&state, "e4");
        let (state, t) = click(&state, "d5");

        match t {
            Transition::Moved(record) => assert_eq!(record.captured, Some(piece('p'))),
            other => panic!("expected a move, got {other:?}"),
        }
        assert_eq!(state.board().piece_count(), before - 1);
        assert_eq!(state.board().get(sq("d5")), Some(piece('P')));
        assert_eq!(state.active_side(), Side::Black);
    }

    #[test]
    fn test_no_shape_check() {
        // A knight may land anywhere that is not its own side's piece
        let state = start();
        let (state, _) = click(&state, "g1");
        let (state, t) = click(&state, "g5");
        assert!(t.is_move());
        assert_eq!(state.board().get(sq("g5")), Some(piece('N')));
    }

    #[test]
    fn test_turns_alternate() {
        let mut state = start();
        for (from, to, side) in [
            ("e2", "e4", Side::White),
            ("e7", "e5", Side::Black),
            ("g1", "f3", Side::White),
            ("b8", "c6", Side::Black),
        ] {
            assert_eq!(state.active_side(), side);
            let (selected, _) = click(&state, from);
            let (next, t) = click(&selected, to);
            assert!(t.is_move());
            assert_eq!(next.active_side(), side.flip());
            state = next;
        }

        let turns: Vec<Side> = state.move_history().iter().map(|m| m.turn).collect();
        assert_eq!(turns, vec![Side::White, Side::Black, Side::White, Side::Black]);
    }

    #[test]
    fn test_flip_only_on_move() {
        // Arbitrary click sequence, including rejected and redirected clicks
        let clicks = [
            "e7", "a3", "e2", "e2", "a1", "b1", "h8", "e2", "d2", "d2", "d4", "e7", "e7",
            "e6", "d7", "d4", "c1", "c1", "b2", "b2", "h3",
        ];
        let mut state = start();
        for token in clicks {
            let before = state.active_side();
            let count_before = state.board().piece_count();
            let (next, t) = click(&state, token);

            if t.is_move() {
                assert_eq!(next.active_side(), before.flip());
                assert!(next.board().piece_count() <= count_before);
            } else {
                assert_eq!(next.active_side(), before);
                assert_eq!(next.board(), state.board());
                assert_eq!(next.move_history(), state.move_history());
            }

            if let Some(selected) = next.selection() {
                let held = next.board().get(selected).map(|p| p.side());
                assert_eq!(held, Some(next.active_side()));
            }
            state = next;
        }
        assert!(!state.move_history().is_empty());
    }

    #[test]
    fn test_stale_selection_is_dropped() {
        let board = BoardPosition::new()
            .with_piece(sq("e2"), piece('P'))
            .with_piece(sq("e7"), piece('p'));
        let state = SessionState::from_position(board, 60_000).with_selection(Some(sq("d4")));

        // Clicking an own piece replaces the stale selection
        let (next, t) = click(&state, "e2");
        assert_eq!(t, Transition::Selected(sq("e2")));
        assert_eq!(next.selection(), Some(sq("e2")));

        // Clicking anything else only clears it
        let (next, t) = click(&state, "e7");
        assert_eq!(t, Transition::Deselected(sq("d4")));
        assert_eq!(next.selection(), None);
        assert_eq!(next.board(), state.board());
    }

    #[test]
    fn test_previous_snapshot_untouched_by_move() {
        let state = start();
        let (selected, _) = click(&state, "e2");
        let (_moved, _) = click(&selected, "e4");

        assert_eq!(selected.board().get(sq("e2")), Some(piece('P')));
        assert!(selected.board().is_empty_at(sq("e4")));
        assert!(selected.move_history().is_empty());
    }
}
