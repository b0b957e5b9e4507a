//! `Engine` builder and operation surface.
//!
//! This is the entry point for embedding Nocturne. It ties together the
//! layers: rules → session actors → registry → watchdog, behind the two
//! collaborator seams ([`Notifier`] for outbound messaging, [`GameStore`]
//! for persistence) that the host application supplies.

use std::sync::Arc;

use nocturne_protocol::{ArenaId, NightAction, PlayerId, SessionId, SessionSnapshot};
use nocturne_session::{
    GameStore, Notifier, SessionConfig, SessionHandle, SessionRegistry, spawn_watchdog,
};
use tokio::task::JoinHandle;

use crate::NocturneError;

/// Builder for configuring and starting an engine.
///
/// # Example
///
/// ```rust,ignore
/// use nocturne::prelude::*;
///
/// let (notifier, mut events) = ChannelNotifier::new();
/// let engine = Engine::builder()
///     .session_config(SessionConfig::default())
///     .build(Arc::new(notifier), Arc::new(MemoryStore::default()));
/// ```
pub struct EngineBuilder {
    config: SessionConfig,
    watchdog: bool,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            watchdog: true,
        }
    }

    /// Sets player limits and window durations.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Skips spawning the idle watchdog. Embedders that drive their own
    /// sweeps (or tests that want full control) use this.
    pub fn without_watchdog(mut self) -> Self {
        self.watchdog = false;
        self
    }

    /// Builds the engine. Must be called from within a Tokio runtime;
    /// the watchdog task (if enabled) is spawned here.
    pub fn build<N: Notifier, S: GameStore>(
        self,
        notifier: Arc<N>,
        store: Arc<S>,
    ) -> Engine<N, S> {
        let registry = Arc::new(SessionRegistry::new(self.config, notifier, store));
        let watchdog = self
            .watchdog
            .then(|| spawn_watchdog(Arc::clone(&registry)));
        tracing::info!(watchdog = watchdog.is_some(), "engine built");
        Engine { registry, watchdog }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded engine: a session registry plus its background sweep.
///
/// All game operations address a session by id; `arena_session` maps an
/// arena back to its live session for dispatchers that only know the
/// arena.
pub struct Engine<N: Notifier, S: GameStore> {
    registry: Arc<SessionRegistry<N, S>>,
    watchdog: Option<JoinHandle<()>>,
}

impl<N: Notifier, S: GameStore> Engine<N, S> {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Spawns a new session bound to `arena` and returns its id.
    pub async fn create_session(&self, arena: ArenaId) -> Result<SessionId, NocturneError> {
        let handle = self.registry.create_session(arena).await?;
        Ok(handle.session_id())
    }

    pub async fn join(
        &self,
        session: SessionId,
        player: PlayerId,
        name: impl Into<String>,
    ) -> Result<(), NocturneError> {
        Ok(self.session(session).await?.join(player, name).await?)
    }

    pub async fn leave(
        &self,
        session: SessionId,
        player: PlayerId,
    ) -> Result<(), NocturneError> {
        Ok(self.session(session).await?.leave(player).await?)
    }

    /// Deals roles and opens the first Night. Host only.
    pub async fn start_game(
        &self,
        session: SessionId,
        requester: PlayerId,
    ) -> Result<(), NocturneError> {
        Ok(self.session(session).await?.start(requester).await?)
    }

    pub async fn submit_night_action(
        &self,
        session: SessionId,
        player: PlayerId,
        action: NightAction,
    ) -> Result<(), NocturneError> {
        Ok(self
            .session(session)
            .await?
            .submit_night_action(player, action)
            .await?)
    }

    pub async fn submit_vote(
        &self,
        session: SessionId,
        voter: PlayerId,
        target: PlayerId,
    ) -> Result<(), NocturneError> {
        Ok(self.session(session).await?.submit_vote(voter, target).await?)
    }

    /// Ends the session immediately. Host only.
    pub async fn terminate(
        &self,
        session: SessionId,
        requester: PlayerId,
    ) -> Result<(), NocturneError> {
        Ok(self.session(session).await?.terminate(requester).await?)
    }

    /// Read-only view for rendering; roles stay hidden until the end.
    pub async fn session_state(
        &self,
        session: SessionId,
    ) -> Result<SessionSnapshot, NocturneError> {
        Ok(self.session(session).await?.snapshot().await?)
    }

    /// The live session bound to `arena`, if any.
    pub async fn arena_session(&self, arena: ArenaId) -> Result<SessionId, NocturneError> {
        Ok(self.registry.get_by_arena(arena).await?.session_id())
    }

    /// Direct registry access for sweeps and diagnostics.
    pub fn registry(&self) -> &Arc<SessionRegistry<N, S>> {
        &self.registry
    }

    async fn session(&self, session: SessionId) -> Result<SessionHandle, NocturneError> {
        Ok(self.registry.get(session).await?)
    }
}

impl<N: Notifier, S: GameStore> Drop for Engine<N, S> {
    fn drop(&mut self) {
        if let Some(watchdog) = &self.watchdog {
            watchdog.abort();
        }
    }
}
