//! Session persistence
//!
//! [`KeyValueStore`] is the raw string storage the session is written to.
//! [`SessionRepository`] sits on top of it, encodes the session as JSON
//! under one fixed key and absorbs every storage failure: a failed load
//! reads as "no saved session" and a failed save or clear is logged and
//! dropped. Game state never sees a storage error.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::{StorageError, StorageResult};
use crate::session::SessionState;

/// Key under which the live session is stored
pub const STORAGE_KEY: &str = "chess_game_state";

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

/// Best-effort load/save/clear of the session snapshot
#[derive(Debug)]
pub struct SessionRepository<K> {
    store: K,
}

impl<K: KeyValueStore> SessionRepository<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut K {
        &mut self.store
    }

    /// Saved session, or `None` when absent, unreadable or malformed
    pub fn load(&self) -> Option<SessionState> {
        let payload = match self.store.get(STORAGE_KEY) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read saved session");
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(error = %e, "saved session is malformed, ignoring it");
                None
            }
        }
    }

    /// Write the session; failures are logged and dropped
    pub fn save(&mut self, state: &SessionState) {
        let result = serde_json::to_string(state)
            .map_err(StorageError::from)
            .and_then(|payload| self.store.set(STORAGE_KEY, &payload));

        if let Err(e) = result {
            tracing::warn!(error = %e, session_id = %state.session_id(), "failed to save session");
        }
    }

    /// Remove the saved session; failures are logged and dropped
    pub fn clear(&mut self) {
        match self.store.remove(STORAGE_KEY) {
            Ok(()) => tracing::info!("saved session cleared"),
            Err(e) => tracing::warn!(error = %e, "failed to clear saved session"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::session::handle_click;

    fn played_state() -> SessionState {
        let state = SessionState::fresh(&SessionConfig::default());
        let (state, _) = handle_click(&state, "e2".parse().unwrap());
        let (state, _) = handle_click(&state, "e4".parse().unwrap());
        let (state, _) = handle_click(&state, "g8".parse().unwrap());
        let (state, _) = state.tick(1_000);
        state
    }

    #[test]
    fn test_round_trip() {
        let mut repo = SessionRepository::new(MemoryStore::new());
        assert!(repo.load().is_none());

        let state = played_state();
        repo.save(&state);
        let loaded = repo.load().unwrap();
        assert_eq!(loaded, state);

        // save(load()) leaves the stored payload as it was
        let before = repo.store().get(STORAGE_KEY).unwrap();
        repo.save(&loaded);
        assert_eq!(repo.store().get(STORAGE_KEY).unwrap(), before);
    }

    #[test]
    fn test_clear() {
        let mut repo = SessionRepository::new(MemoryStore::new());
        repo.save(&played_state());
        repo.clear();
        assert!(repo.load().is_none());
        // Clearing twice is harmless
        repo.clear();
    }

    #[test]
    fn test_corrupted_payload_loads_as_absent() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();
        let repo = SessionRepository::new(store);
        assert!(repo.load().is_none());

        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"{"sessionId": 42}"#).unwrap();
        assert!(SessionRepository::new(store).load().is_none());
    }

    #[test]
    fn test_failures_are_swallowed() {
        let mut repo = SessionRepository::new(MemoryStore::new());
        let state = played_state();
        repo.save(&state);

        repo.store_mut().set_failing(true);
        let newer = state.tick(1_000).0;
        repo.save(&newer);
        assert!(repo.load().is_none());
        repo.clear();

        repo.store_mut().set_failing(false);
        // The failed save and clear left the earlier payload in place
        assert_eq!(repo.load(), Some(state));
    }
}
