//! Events the engine emits to the notification collaborator, and the
//! read-only snapshot served to renderers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ArenaId, Faction, Phase, PlayerId, Role, SessionId};

// ---------------------------------------------------------------------------
// Audience
// ---------------------------------------------------------------------------

/// Where an event should be delivered.
///
/// Role assignments and seer reveals are secrets and go to one player;
/// phase results and terminations are broadcast to the whole arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Audience {
    /// Broadcast to the session's arena.
    Arena,
    /// Private delivery to a single player.
    Player(PlayerId),
}

// ---------------------------------------------------------------------------
// TerminationReason
// ---------------------------------------------------------------------------

/// Why a session was force-ended before a faction won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// The host asked for the session to end.
    HostRequest,
    /// The idle watchdog found no activity beyond the configured window.
    Idle,
    /// A full Night and the following Day passed with zero submissions.
    Abandoned,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::HostRequest => f.write_str("ended by host"),
            TerminationReason::Idle => f.write_str("idle timeout"),
            TerminationReason::Abandoned => f.write_str("abandoned"),
        }
    }
}

// ---------------------------------------------------------------------------
// GameEvent
// ---------------------------------------------------------------------------

/// A fully revealed roster entry, sent when the game ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerReveal {
    pub player: PlayerId,
    pub name: String,
    pub role: Role,
    pub alive: bool,
}

/// Everything the engine tells the outside world.
///
/// Each event is paired with an [`Audience`] by the session; the
/// notification collaborator does the actual delivery and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Private: your secret role for this game.
    RolesAssigned { role: Role },

    /// Private: the night window is open, pick a target.
    NightPromptIssued {
        round: u32,
        eligible: Vec<PlayerId>,
    },

    /// Private: the seer's inspection result, delivered immediately on
    /// an accepted submission.
    SeerReveal { target: PlayerId, role: Role },

    /// Broadcast: a Night or Day window closed and its deaths resolved.
    PhaseResolved {
        phase: Phase,
        round: u32,
        deaths: Vec<PlayerId>,
        saved_by_witch: bool,
        lover_chain: bool,
    },

    /// Broadcast: a faction won; the full roster is revealed.
    WinDeclared {
        faction: Faction,
        roster: Vec<PlayerReveal>,
    },

    /// Broadcast: the session ended without a winner.
    SessionTerminated { reason: TerminationReason },
}

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

/// One roster entry as visible from outside the engine.
///
/// `role` is `None` while the game is running — roles are secrets until
/// the session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub player: PlayerId,
    pub name: String,
    pub alive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// A read-only snapshot of a session, served by `GetSessionState` for
/// rendering. Carries no secret sub-state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub arena_id: ArenaId,
    pub phase: Phase,
    pub round: u32,
    /// `None` only while the lobby is still empty.
    pub host: Option<PlayerId>,
    pub players: Vec<PlayerView>,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_resolved_json_format() {
        let event = GameEvent::PhaseResolved {
            phase: Phase::Night,
            round: 2,
            deaths: vec![PlayerId(4), PlayerId(5)],
            saved_by_witch: false,
            lover_chain: true,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "PhaseResolved");
        assert_eq!(json["phase"], "Night");
        assert_eq!(json["round"], 2);
        assert_eq!(json["deaths"], serde_json::json!([4, 5]));
        assert_eq!(json["lover_chain"], true);
    }

    #[test]
    fn test_win_declared_round_trip() {
        let event = GameEvent::WinDeclared {
            faction: Faction::Villagers,
            roster: vec![PlayerReveal {
                player: PlayerId(1),
                name: "ada".into(),
                role: Role::Seer,
                alive: true,
            }],
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: GameEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_session_terminated_round_trip() {
        let event = GameEvent::SessionTerminated {
            reason: TerminationReason::Abandoned,
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: GameEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_player_view_hides_missing_role() {
        let view = PlayerView {
            player: PlayerId(2),
            name: "bo".into(),
            alive: true,
            role: None,
        };
        let json: serde_json::Value = serde_json::to_value(&view).unwrap();
        assert!(json.get("role").is_none(), "hidden roles must not serialize");
    }

    #[test]
    fn test_snapshot_round_trip() {
        let snapshot = SessionSnapshot {
            session_id: SessionId(1),
            arena_id: ArenaId(9),
            phase: Phase::Day,
            round: 3,
            host: Some(PlayerId(1)),
            players: vec![PlayerView {
                player: PlayerId(1),
                name: "ada".into(),
                alive: false,
                role: Some(Role::Villager),
            }],
        };
        let bytes = serde_json::to_vec(&snapshot).unwrap();
        let decoded: SessionSnapshot = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn test_termination_reason_display() {
        assert_eq!(TerminationReason::Idle.to_string(), "idle timeout");
        assert_eq!(TerminationReason::Abandoned.to_string(), "abandoned");
    }
}
