//! Session registry: owns the table of live sessions and enforces the
//! one-session-per-arena rule.
//!
//! The registry never touches game state. It hands out [`SessionHandle`]s
//! and lets the actors run themselves; a session whose actor task has
//! exited shows up here as a closed channel and gets reaped.

use std::collections::HashMap;
use std::sync::Arc;

use nocturne_protocol::{ArenaId, Phase, SessionId};
use tokio::sync::Mutex;

use crate::session::{SessionHandle, spawn_session};
use crate::{GameStore, Notifier, SessionConfig, SessionError};

#[derive(Default)]
struct RegistryTable {
    by_session: HashMap<SessionId, SessionHandle>,
    by_arena: HashMap<ArenaId, SessionId>,
    next_session: u64,
}

/// Creates, looks up, and reaps session actors.
pub struct SessionRegistry<N: Notifier, S: GameStore> {
    config: SessionConfig,
    notifier: Arc<N>,
    store: Arc<S>,
    table: Mutex<RegistryTable>,
}

impl<N: Notifier, S: GameStore> SessionRegistry<N, S> {
    pub fn new(config: SessionConfig, notifier: Arc<N>, store: Arc<S>) -> Self {
        Self {
            config,
            notifier,
            store,
            table: Mutex::new(RegistryTable::default()),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Spawns a session actor bound to `arena`. Fails while the arena
    /// already hosts a session whose actor is still running.
    pub async fn create_session(&self, arena: ArenaId) -> Result<SessionHandle, SessionError> {
        let mut table = self.table.lock().await;

        if let Some(existing) = table.by_arena.get(&arena).copied() {
            // An ended session lingering for final snapshot reads does
            // not hold the arena.
            if let Some(handle) = table.by_session.get(&existing) {
                let live = !handle.is_closed()
                    && matches!(handle.info().await, Ok(info) if info.phase != Phase::Ended);
                if live {
                    return Err(SessionError::ArenaOccupied(arena));
                }
            }
            table.by_arena.remove(&arena);
            table.by_session.remove(&existing);
        }

        table.next_session += 1;
        let session_id = SessionId(table.next_session);

        let handle = spawn_session(
            session_id,
            arena,
            self.config.clone(),
            Arc::clone(&self.notifier),
            Arc::clone(&self.store),
        );
        self.store.session_created(session_id, arena);

        table.by_session.insert(session_id, handle.clone());
        table.by_arena.insert(arena, session_id);
        tracing::info!(%session_id, arena_id = %arena, "session registered");
        Ok(handle)
    }

    pub async fn get(&self, session: SessionId) -> Result<SessionHandle, SessionError> {
        self.table
            .lock()
            .await
            .by_session
            .get(&session)
            .cloned()
            .ok_or(SessionError::NotFound(session))
    }

    pub async fn get_by_arena(&self, arena: ArenaId) -> Result<SessionHandle, SessionError> {
        let table = self.table.lock().await;
        let session = *table
            .by_arena
            .get(&arena)
            .ok_or(SessionError::ArenaVacant(arena))?;
        table
            .by_session
            .get(&session)
            .cloned()
            .ok_or(SessionError::NotFound(session))
    }

    /// Handles for every registered session, live or not. Sweep callers
    /// probe each one and reap afterwards.
    pub async fn handles(&self) -> Vec<SessionHandle> {
        self.table.lock().await.by_session.values().cloned().collect()
    }

    /// Drops table entries whose actor task has exited. Returns how many
    /// were removed.
    pub async fn reap_finished(&self) -> usize {
        let mut table = self.table.lock().await;
        let dead: Vec<SessionId> = table
            .by_session
            .iter()
            .filter(|(_, handle)| handle.is_closed())
            .map(|(id, _)| *id)
            .collect();
        for session in &dead {
            table.by_session.remove(session);
        }
        let RegistryTable { by_session, by_arena, .. } = &mut *table;
        by_arena.retain(|_, session| by_session.contains_key(session));
        if !dead.is_empty() {
            tracing::debug!(reaped = dead.len(), "finished sessions reaped");
        }
        dead.len()
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.by_session.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.table.lock().await.by_session.is_empty()
    }
}
