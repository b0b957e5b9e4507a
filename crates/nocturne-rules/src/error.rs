//! Error types for rule violations.
//!
//! These are deliberately small: the rules layer only rejects what it
//! alone can judge (cardinality, one-shot ledgers, malformed pairs).
//! Phase, liveness, and role-holding checks need the session's state
//! and live in `nocturne-session`.

/// Role assignment cannot proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AssignError {
    /// Fewer players than the smallest configured role pool.
    #[error("need at least {min} players to start, have {have}")]
    InsufficientPlayers { have: usize, min: usize },
}

/// A night submission violates a cardinality or one-shot rule.
///
/// None of these mutate the buffer or the ledgers: a rejected
/// submission leaves the round exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NightActionError {
    /// A second submission for the same capability in the same round.
    #[error("this role has already acted this round")]
    DuplicateSubmission,

    /// The witch's heal was consumed in an earlier round.
    #[error("the heal potion has already been used this game")]
    HealSpent,

    /// The witch's kill was consumed in an earlier round.
    #[error("the poison has already been used this game")]
    KillSpent,

    /// Cupid named the same player twice.
    #[error("cupid must choose two distinct players")]
    IdenticalPair,
}

/// A day vote violates the one-vote-per-round rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VoteError {
    /// The voter already cast a vote this round.
    #[error("player has already voted this round")]
    AlreadyVoted,
}
