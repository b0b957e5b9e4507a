//! Error types for the session layer.
//!
//! Every rejection is reported to the submitting caller alone; none of
//! these abort a window or touch other players' pending submissions.

use nocturne_protocol::{ArenaId, Phase, PlayerId, Role, SessionId};
use nocturne_rules::{AssignError, NightActionError, VoteError};

/// The coarse category of a [`SessionError`], matching the taxonomy the
/// outer dispatcher renders from (bad request vs. wrong moment vs.
/// spent ability vs. gone).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is invalid (full lobby, dead target, ...).
    Validation,
    /// Valid request at the wrong moment or from the wrong role.
    InvalidState,
    /// A second claim on a slot or one-shot ability that is taken.
    Conflict,
    /// The session does not exist or is no longer reachable.
    NotFound,
}

/// Errors that can occur during session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session with this id is registered.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The session's command channel is closed (actor finished).
    #[error("session {0} is no longer running")]
    Unavailable(SessionId),

    /// The session has ended; no further mutation is accepted.
    #[error("the session has ended")]
    Ended,

    /// The arena already hosts an active session.
    #[error("arena {0} already hosts an active session")]
    ArenaOccupied(ArenaId),

    /// No session is bound to this arena.
    #[error("arena {0} has no session")]
    ArenaVacant(ArenaId),

    /// The player is already on the roster.
    #[error("player {0} has already joined")]
    AlreadyJoined(PlayerId),

    /// The lobby is at the configured maximum.
    #[error("the lobby is full ({0} players)")]
    LobbyFull(usize),

    /// Joins are only accepted during the lobby phase.
    #[error("the game has already started")]
    JoinClosed,

    /// Start was requested below the minimum roster size.
    #[error("need at least {min} players to start, have {have}")]
    NotEnoughPlayers { have: usize, min: usize },

    /// Only the host may start or terminate the session.
    #[error("player {0} is not the host")]
    NotHost(PlayerId),

    /// The player is not on this session's roster.
    #[error("player {0} is not in this game")]
    NotInGame(PlayerId),

    /// Dead players take no further part in the game.
    #[error("player {0} is dead")]
    ActorDead(PlayerId),

    /// The named target is dead or not on the roster.
    #[error("target {0} is not a living player")]
    TargetNotAlive(PlayerId),

    /// Kill-type actions may not name their own submitter.
    #[error("you cannot target yourself")]
    SelfTarget,

    /// A night action arrived outside a Night window.
    #[error("that action is not valid during {0}")]
    WrongPhase(Phase),

    /// A vote arrived outside a Day window.
    #[error("votes may only be cast during the day")]
    VoteOutsideDay,

    /// The submitting player does not hold the role the action needs.
    #[error("player {player} does not hold the {required} role")]
    WrongRole { player: PlayerId, required: Role },

    /// Cupid's pairing is restricted to the first night.
    #[error("cupid may only act during the first night")]
    CupidWindowClosed,

    /// The lover link has already been set this session.
    #[error("the lovers are already linked")]
    LoversAlreadyLinked,

    /// A cardinality or one-shot rule rejected the night action.
    #[error(transparent)]
    Night(#[from] NightActionError),

    /// The one-vote-per-round rule rejected the vote.
    #[error(transparent)]
    Vote(#[from] VoteError),

    /// Role assignment refused the roster.
    #[error(transparent)]
    Assign(#[from] AssignError),
}

impl SessionError {
    /// Maps every variant onto the dispatcher-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        use SessionError::*;
        match self {
            NotFound(_) | Unavailable(_) | Ended | ArenaVacant(_) => ErrorKind::NotFound,
            ArenaOccupied(_) | AlreadyJoined(_) | LobbyFull(_) | JoinClosed
            | NotEnoughPlayers { .. } | NotHost(_) | ActorDead(_) | TargetNotAlive(_)
            | SelfTarget | Assign(_) => ErrorKind::Validation,
            NotInGame(_) | WrongPhase(_) | VoteOutsideDay | WrongRole { .. }
            | CupidWindowClosed => ErrorKind::InvalidState,
            LoversAlreadyLinked | Vote(_) => ErrorKind::Conflict,
            Night(err) => match err {
                NightActionError::IdenticalPair => ErrorKind::Validation,
                _ => ErrorKind::Conflict,
            },
        }
    }
}
