//! Secret night-action payloads submitted by individual players.

use serde::{Deserialize, Serialize};

use crate::{PlayerId, Role};

/// The witch's one-shot abilities. Exactly one may be submitted per
/// round, and each is usable at most once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum WitchAction {
    /// Cancel tonight's werewolf kill if it lands on `target`.
    Heal { target: PlayerId },
    /// Kill `target` unconditionally, independent of protection.
    Kill { target: PlayerId },
}

impl WitchAction {
    pub fn target(self) -> PlayerId {
        match self {
            WitchAction::Heal { target } | WitchAction::Kill { target } => target,
        }
    }
}

/// One player's secret submission during a Night window.
///
/// Internally tagged so the dispatcher's JSON reads
/// `{ "type": "WerewolfKill", "target": 3 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NightAction {
    /// A werewolf's kill vote. Every living werewolf votes independently;
    /// the plurality target is attacked.
    WerewolfKill { target: PlayerId },
    /// The seer inspects a player and privately learns their role.
    /// Not part of the death-resolution snapshot.
    SeerInspect { target: PlayerId },
    /// The guardian shields one player from the werewolf attack.
    GuardianProtect { target: PlayerId },
    /// Cupid links two players' fates. Round 1 only, once per session.
    CupidPair { first: PlayerId, second: PlayerId },
    /// The witch spends one of her two lifetime abilities.
    Witch(WitchAction),
}

impl NightAction {
    /// The role a player must hold to submit this action.
    pub fn required_role(&self) -> Role {
        match self {
            NightAction::WerewolfKill { .. } => Role::Werewolf,
            NightAction::SeerInspect { .. } => Role::Seer,
            NightAction::GuardianProtect { .. } => Role::Guardian,
            NightAction::CupidPair { .. } => Role::Cupid,
            NightAction::Witch(_) => Role::Witch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_night_action_json_is_internally_tagged() {
        let action = NightAction::WerewolfKill { target: PlayerId(3) };
        let json: serde_json::Value = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "WerewolfKill");
        assert_eq!(json["target"], 3);
    }

    #[test]
    fn test_cupid_pair_round_trip() {
        let action = NightAction::CupidPair {
            first: PlayerId(1),
            second: PlayerId(2),
        };
        let bytes = serde_json::to_vec(&action).unwrap();
        let decoded: NightAction = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(action, decoded);
    }

    #[test]
    fn test_witch_action_tagged_with_kind() {
        let action = NightAction::Witch(WitchAction::Heal { target: PlayerId(9) });
        let json: serde_json::Value = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "Witch");
        assert_eq!(json["kind"], "Heal");
        assert_eq!(json["target"], 9);
    }

    #[test]
    fn test_required_role_covers_every_variant() {
        let target = PlayerId(1);
        assert_eq!(
            NightAction::WerewolfKill { target }.required_role(),
            Role::Werewolf
        );
        assert_eq!(NightAction::SeerInspect { target }.required_role(), Role::Seer);
        assert_eq!(
            NightAction::GuardianProtect { target }.required_role(),
            Role::Guardian
        );
        assert_eq!(
            NightAction::CupidPair { first: target, second: PlayerId(2) }.required_role(),
            Role::Cupid
        );
        assert_eq!(
            NightAction::Witch(WitchAction::Kill { target }).required_role(),
            Role::Witch
        );
    }

    #[test]
    fn test_decode_unknown_action_type_returns_error() {
        let unknown = r#"{"type": "MoonHowl", "target": 1}"#;
        let result: Result<NightAction, _> = serde_json::from_str(unknown);
        assert!(result.is_err());
    }
}
