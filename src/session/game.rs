//! Session orchestration
//!
//! [`GameSession`] is the single owner of the live [`SessionState`]. It is
//! the boundary the shell talks to: clicks come in as raw tokens, clock
//! ticks come in as instants, and every change is written through the
//! session repository before the call returns.

use std::time::Instant;

use crate::board::{Side, Square};
use crate::clock::{TickSchedule, TimeUp};
use crate::config::SessionConfig;
use crate::storage::{KeyValueStore, SessionRepository};

use super::input::{handle_click, IgnoreReason, Transition};
use super::SessionState;

/// Live game session bound to a storage backend
pub struct GameSession<K: KeyValueStore> {
    state: SessionState,
    config: SessionConfig,
    repository: SessionRepository<K>,
    schedule: TickSchedule,
}

impl<K: KeyValueStore> GameSession<K> {
    /// Resume the saved session, or start a fresh one if there is none.
    ///
    /// Storage is not cleared when nothing usable was found; the fresh
    /// session simply overwrites it on the first save.
    pub fn load_or_create(config: SessionConfig, repository: SessionRepository<K>) -> Self {
        Self::load_or_create_at(config, repository, Instant::now())
    }

    pub fn load_or_create_at(
        config: SessionConfig,
        repository: SessionRepository<K>,
        now: Instant,
    ) -> Self {
        let state = match repository.load() {
            Some(state) => {
                tracing::info!(
                    session_id = %state.session_id(),
                    moves = state.move_history().len(),
                    "resumed saved session"
                );
                state
            }
            None => {
                let state = SessionState::fresh(&config);
                tracing::info!(session_id = %state.session_id(), "started new session");
                state
            }
        };

        let mut session = Self {
            schedule: TickSchedule::new(config.tick_interval_ms),
            state,
            config,
            repository,
        };
        session.commit(session.state.clone(), now);
        session
    }

    #[inline]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[inline]
    pub fn repository(&self) -> &SessionRepository<K> {
        &self.repository
    }

    #[inline]
    pub fn repository_mut(&mut self) -> &mut SessionRepository<K> {
        &mut self.repository
    }

    /// Deadline of the next clock tick, if a clock is running
    #[inline]
    pub fn next_tick_due(&self) -> Option<Instant> {
        self.schedule.next_due()
    }

    /// Side whose tick is currently scheduled
    #[inline]
    pub fn ticking_side(&self) -> Option<Side> {
        self.schedule.armed_side()
    }

    /// Moves are frozen once the game is over, if so configured
    pub fn is_frozen(&self) -> bool {
        self.config.freeze_on_time_up && self.state.is_game_over()
    }

    /// Handle a click on a square given as its identifier token.
    ///
    /// Tokens that are not one of the 64 squares are ignored.
    pub fn click(&mut self, token: &str) -> Transition {
        self.click_at(token, Instant::now())
    }

    pub fn click_at(&mut self, token: &str, now: Instant) -> Transition {
        match token.parse::<Square>() {
            Ok(square) => self.click_square_at(square, now),
            Err(e) => {
                tracing::debug!(error = %e, "click ignored");
                Transition::Ignored(IgnoreReason::InvalidSquare)
            }
        }
    }

    pub fn click_square(&mut self, square: Square) -> Transition {
        self.click_square_at(square, Instant::now())
    }

    pub fn click_square_at(&mut self, square: Square, now: Instant) -> Transition {
        if self.is_frozen() {
            tracing::debug!(%square, "click ignored, game is over");
            return Transition::Ignored(IgnoreReason::GameOver);
        }

        let (next, transition) = handle_click(&self.state, square);
        tracing::debug!(%square, ?transition, "click");

        if transition.changes_state() {
            self.commit(next, now);
        }
        transition
    }

    /// Apply every clock tick that has fallen due by `now`.
    ///
    /// Returns the expiry signal if a clock ran out during this call.
    pub fn advance_clock(&mut self, now: Instant) -> Option<TimeUp> {
        let mut expired = None;

        while let Some(side) = self.schedule.poll(now) {
            if side != self.state.active_side() {
                // Armed for a side that is no longer to move
                tracing::debug!(%side, "discarding stale clock tick");
                let frozen = self.is_frozen();
                self.schedule.cancel();
                self.schedule.sync(&self.state, now, frozen);
                continue;
            }

            let (next, time_up) = self.state.tick(self.config.tick_interval_ms);
            self.commit(next, now);

            if let Some(signal) = time_up {
                tracing::info!(side = %signal.side, "time expired");
                expired = Some(signal);
            }
        }

        expired
    }

    /// Overwrite both clocks with authoritative values.
    ///
    /// Returns the expiry signals of clocks that were set to zero before
    /// they had flagged. The tick schedule follows the new values.
    pub fn resync_clocks(&mut self, white_ms: u64, black_ms: u64) -> Vec<TimeUp> {
        self.resync_clocks_at(white_ms, black_ms, Instant::now())
    }

    pub fn resync_clocks_at(&mut self, white_ms: u64, black_ms: u64, now: Instant) -> Vec<TimeUp> {
        let (next, signals) = self.state.resync_clocks(white_ms, black_ms);
        tracing::info!(white_ms, black_ms, "clocks resynced");
        for signal in &signals {
            tracing::info!(side = %signal.side, "time expired");
        }
        self.commit(next, now);
        signals
    }

    /// Throw the current game away and start a new one
    pub fn reset(&mut self) {
        self.reset_at(Instant::now());
    }

    pub fn reset_at(&mut self, now: Instant) {
        // No tick of the old session may land on the new one
        self.schedule.cancel();
        self.repository.clear();

        let previous = self.state.session_id().clone();
        let fresh = SessionState::fresh(&self.config);
        tracing::info!(previous = %previous, session_id = %fresh.session_id(), "session reset");
        self.commit(fresh, now);
    }

    /// Reserved for authoritative updates from a remote peer.
    ///
    /// Remote play is not supported yet, so the update is logged and
    /// dropped and the local state stays as it is.
    pub fn apply_remote_update(&mut self, state: SessionState) {
        tracing::warn!(
            remote_session = %state.session_id(),
            local_session = %self.state.session_id(),
            "remote update ignored, remote play is not supported"
        );
    }

    /// Install a new snapshot, re-derive the tick schedule and persist it
    fn commit(&mut self, next: SessionState, now: Instant) {
        self.state = next;
        let frozen = self.is_frozen();
        self.schedule.sync(&self.state, now, frozen);
        self.repository.save(&self.state);
    }
}
