//! Collaborator seams: notification transport and persistence.
//!
//! The engine prompts players privately, broadcasts to arenas, and
//! records durable rows — but it does neither delivery nor storage
//! itself. Implementations of these traits sit on the other side of
//! the seam (a chat transport, a database) and must not block: the
//! session actor calls them inline from its loop and moves on. Queue
//! internally and retry there; a failed write never stalls or corrupts
//! phase progression.

use nocturne_protocol::{
    ArenaId, Audience, Faction, GameEvent, Phase, PlayerId, Role, SessionId, TerminationReason,
};

/// Delivers engine events to players and arenas.
pub trait Notifier: Send + Sync + 'static {
    /// Delivers `event` for the session bound to `arena`. `audience`
    /// distinguishes private prompts from arena broadcasts.
    fn deliver(&self, arena: ArenaId, audience: Audience, event: GameEvent);
}

/// One player's row in the end-of-game leaderboard update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStanding {
    pub player: PlayerId,
    pub role: Role,
    pub alive: bool,
    pub won: bool,
}

/// How a session concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    /// The winning faction, or `None` for a terminated session.
    pub winner: Option<Faction>,
    /// Set when the session ended without a winner.
    pub termination: Option<TerminationReason>,
    /// Per-player leaderboard rows. Empty when roles were never dealt.
    pub standings: Vec<PlayerStanding>,
}

/// Durable storage for game rows, written at well-defined points only.
///
/// Writes are fire-and-forget from the engine's perspective and must be
/// idempotent on the implementor's side.
pub trait GameStore: Send + Sync + 'static {
    /// A session was created for an arena.
    fn session_created(&self, session: SessionId, arena: ArenaId);

    /// Roles were dealt at start.
    fn roles_assigned(&self, session: SessionId, assignment: &[(PlayerId, Role)]);

    /// The session entered a new phase.
    fn phase_changed(&self, session: SessionId, phase: Phase, round: u32);

    /// A player died during resolution.
    fn player_killed(&self, session: SessionId, round: u32, player: PlayerId);

    /// A day vote was accepted.
    fn vote_recorded(&self, session: SessionId, round: u32, voter: PlayerId, target: PlayerId);

    /// The session ended; update the leaderboard from `outcome`.
    fn game_ended(&self, session: SessionId, outcome: &GameOutcome);
}
