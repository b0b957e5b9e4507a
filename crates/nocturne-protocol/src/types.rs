//! Identity newtypes and the closed game vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player, assigned by the outer dispatcher.
///
/// `#[serde(transparent)]` keeps the JSON representation a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// The external grouping context a session is bound to (e.g. a chat
/// channel). At most one active session exists per arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArenaId(pub u64);

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A-{}", self.0)
    }
}

/// A unique identifier for one game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Role / Faction
// ---------------------------------------------------------------------------

/// The six playable roles.
///
/// The set is closed on purpose: role dispatch throughout the engine is
/// exhaustive `match`, so adding a role is a compile-time event, not a
/// string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Werewolf,
    Seer,
    Cupid,
    Guardian,
    Witch,
    Villager,
}

impl Role {
    /// The faction this role wins with.
    pub fn faction(self) -> Faction {
        match self {
            Role::Werewolf => Faction::Werewolves,
            Role::Seer | Role::Cupid | Role::Guardian | Role::Witch | Role::Villager => {
                Faction::Villagers
            }
        }
    }

    pub fn is_werewolf(self) -> bool {
        matches!(self, Role::Werewolf)
    }

    /// Whether this role is prompted for a secret action at night.
    /// Villagers sleep through the whole thing.
    pub fn acts_at_night(self) -> bool {
        !matches!(self, Role::Villager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Werewolf => "Werewolf",
            Role::Seer => "Seer",
            Role::Cupid => "Cupid",
            Role::Guardian => "Guardian",
            Role::Witch => "Witch",
            Role::Villager => "Villager",
        };
        f.write_str(name)
    }
}

/// A winning side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Werewolves,
    Villagers,
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Werewolves => f.write_str("Werewolves"),
            Faction::Villagers => f.write_str("Villagers"),
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The session's current stage.
///
/// ```text
/// Lobby ──(start)──→ Night ⇄ Day ──(win / terminate / stall)──→ Ended
/// ```
///
/// `Lobby` is the only phase that accepts joins. `Ended` is terminal:
/// no mutation is accepted afterwards. A session may be force-moved to
/// `Ended` from any phase by an explicit terminate or the idle watchdog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Lobby,
    Night,
    Day,
    Ended,
}

impl Phase {
    /// Whether new players may still join.
    pub fn is_joinable(self) -> bool {
        matches!(self, Phase::Lobby)
    }

    /// Whether a game is actively being played.
    pub fn is_live(self) -> bool {
        matches!(self, Phase::Night | Phase::Day)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lobby => f.write_str("Lobby"),
            Phase::Night => f.write_str("Night"),
            Phase::Day => f.write_str("Day"),
            Phase::Ended => f.write_str("Ended"),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
