//! Ready-made collaborators for embedders that don't bring their own.
//!
//! [`ChannelNotifier`] forwards events into a Tokio channel so a
//! dispatcher task can fan them out to connections. [`MemoryStore`]
//! keeps outcomes and a win leaderboard in memory. The null variants
//! drop everything; useful for tests and fire-and-forget deployments.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use nocturne_protocol::{ArenaId, Audience, GameEvent, Phase, PlayerId, Role, SessionId};
use nocturne_session::{GameOutcome, GameStore, Notifier};
use tokio::sync::mpsc;

/// An outbound event with its routing envelope.
#[derive(Debug, Clone)]
pub struct OutboundEvent {
    pub arena: ArenaId,
    pub audience: Audience,
    pub event: GameEvent,
}

/// Forwards every delivered event into an unbounded channel.
///
/// Unbounded because `deliver` must never block a session actor; a
/// dispatcher that falls behind buffers here rather than stalling games.
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<OutboundEvent>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn deliver(&self, arena: ArenaId, audience: Audience, event: GameEvent) {
        // A dropped receiver means the dispatcher is gone; games keep
        // running regardless.
        let _ = self.sender.send(OutboundEvent {
            arena,
            audience,
            event,
        });
    }
}

/// Drops every event.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn deliver(&self, _arena: ArenaId, _audience: Audience, _event: GameEvent) {}
}

#[derive(Default)]
struct MemoryStoreInner {
    outcomes: HashMap<SessionId, GameOutcome>,
    wins: HashMap<PlayerId, u32>,
}

/// An in-memory [`GameStore`]: final outcomes per session plus a win
/// leaderboard accumulated across games.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded outcome of a finished session.
    pub fn outcome(&self, session: SessionId) -> Option<GameOutcome> {
        self.locked().outcomes.get(&session).cloned()
    }

    /// Players ranked by games won, most wins first, ties by id.
    pub fn leaderboard(&self) -> Vec<(PlayerId, u32)> {
        let mut board: Vec<(PlayerId, u32)> =
            self.locked().wins.iter().map(|(p, w)| (*p, *w)).collect();
        board.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        board
    }

    fn locked(&self) -> MutexGuard<'_, MemoryStoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GameStore for MemoryStore {
    fn session_created(&self, _session: SessionId, _arena: ArenaId) {}

    fn roles_assigned(&self, _session: SessionId, _assignment: &[(PlayerId, Role)]) {}

    fn phase_changed(&self, _session: SessionId, _phase: Phase, _round: u32) {}

    fn player_killed(&self, _session: SessionId, _round: u32, _player: PlayerId) {}

    fn vote_recorded(
        &self,
        _session: SessionId,
        _round: u32,
        _voter: PlayerId,
        _target: PlayerId,
    ) {
    }

    fn game_ended(&self, session: SessionId, outcome: &GameOutcome) {
        let mut inner = self.locked();
        for standing in outcome.standings.iter().filter(|s| s.won) {
            *inner.wins.entry(standing.player).or_insert(0) += 1;
        }
        inner.outcomes.insert(session, outcome.clone());
    }
}

/// Records nothing.
#[derive(Debug, Default)]
pub struct NullStore;

impl GameStore for NullStore {
    fn session_created(&self, _session: SessionId, _arena: ArenaId) {}
    fn roles_assigned(&self, _session: SessionId, _assignment: &[(PlayerId, Role)]) {}
    fn phase_changed(&self, _session: SessionId, _phase: Phase, _round: u32) {}
    fn player_killed(&self, _session: SessionId, _round: u32, _player: PlayerId) {}
    fn vote_recorded(
        &self,
        _session: SessionId,
        _round: u32,
        _voter: PlayerId,
        _target: PlayerId,
    ) {
    }
    fn game_ended(&self, _session: SessionId, _outcome: &GameOutcome) {}
}
