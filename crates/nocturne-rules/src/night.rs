//! The round-scoped night buffer and the session-lifetime sub-state.
//!
//! These are deliberately two different kinds of type. [`NightActions`]
//! is replaced wholesale when a new Night opens; [`WitchLedger`] and
//! [`LoverLink`] are created once per session and carried across every
//! round rollover. Conflating the two silently loses one-shot
//! enforcement, so the split is part of the data model, not a detail.

use std::collections::HashMap;

use nocturne_protocol::{PlayerId, WitchAction};

use crate::NightActionError;

// ---------------------------------------------------------------------------
// WitchLedger
// ---------------------------------------------------------------------------

/// The witch's two lifetime abilities. Each flag flips `false → true`
/// at most once per session, at the moment the submission is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WitchLedger {
    heal_spent: bool,
    kill_spent: bool,
}

impl WitchLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heal_spent(&self) -> bool {
        self.heal_spent
    }

    pub fn kill_spent(&self) -> bool {
        self.kill_spent
    }

    /// Consumes the ability behind `action`, or rejects without
    /// touching either flag.
    fn spend(&mut self, action: WitchAction) -> Result<(), NightActionError> {
        match action {
            WitchAction::Heal { .. } if self.heal_spent => Err(NightActionError::HealSpent),
            WitchAction::Kill { .. } if self.kill_spent => Err(NightActionError::KillSpent),
            WitchAction::Heal { .. } => {
                self.heal_spent = true;
                Ok(())
            }
            WitchAction::Kill { .. } => {
                self.kill_spent = true;
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// LoverLink
// ---------------------------------------------------------------------------

/// An unordered pair of players whose deaths are coupled. Set by cupid
/// at most once per session, during round 1 only (the session enforces
/// the round gate; the pair itself only guards distinctness).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoverLink {
    a: PlayerId,
    b: PlayerId,
}

impl LoverLink {
    pub fn new(a: PlayerId, b: PlayerId) -> Result<Self, NightActionError> {
        if a == b {
            return Err(NightActionError::IdenticalPair);
        }
        Ok(Self { a, b })
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.a == player || self.b == player
    }

    /// The other half of the pair, if `player` is in it.
    pub fn partner_of(&self, player: PlayerId) -> Option<PlayerId> {
        if player == self.a {
            Some(self.b)
        } else if player == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    pub fn pair(&self) -> (PlayerId, PlayerId) {
        (self.a, self.b)
    }
}

// ---------------------------------------------------------------------------
// NightActions
// ---------------------------------------------------------------------------

/// The accepted secret actions of one Night round.
///
/// A fresh buffer is installed every time a Night opens; everything in
/// here dies with the round. Each recording method enforces its
/// capability's cardinality and rejects without mutating on violation.
#[derive(Debug, Clone, Default)]
pub struct NightActions {
    /// Independent kill votes, one per living werewolf.
    wolf_votes: HashMap<PlayerId, PlayerId>,
    /// The seer's single inspection this round (seer, target).
    inspection: Option<(PlayerId, PlayerId)>,
    /// The guardian's single protect target this round.
    protection: Option<PlayerId>,
    /// The witch's single action this round.
    witch: Option<WitchAction>,
}

impl NightActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one werewolf's kill vote. Each werewolf votes at most
    /// once per round; different werewolves vote independently.
    pub fn record_wolf_vote(
        &mut self,
        voter: PlayerId,
        target: PlayerId,
    ) -> Result<(), NightActionError> {
        if self.wolf_votes.contains_key(&voter) {
            return Err(NightActionError::DuplicateSubmission);
        }
        self.wolf_votes.insert(voter, target);
        Ok(())
    }

    /// Records the seer's inspection. At most one per round.
    pub fn record_inspection(
        &mut self,
        seer: PlayerId,
        target: PlayerId,
    ) -> Result<(), NightActionError> {
        if self.inspection.is_some() {
            return Err(NightActionError::DuplicateSubmission);
        }
        self.inspection = Some((seer, target));
        Ok(())
    }

    /// Records the guardian's protect target. At most one per round.
    pub fn record_protection(&mut self, target: PlayerId) -> Result<(), NightActionError> {
        if self.protection.is_some() {
            return Err(NightActionError::DuplicateSubmission);
        }
        self.protection = Some(target);
        Ok(())
    }

    /// Records the witch's action for this round, consuming the matching
    /// lifetime ability in `ledger`.
    ///
    /// Order of checks matters: a second action in the same round is a
    /// duplicate even if the other potion is still available, and an
    /// already-spent ability is rejected before anything flips.
    pub fn record_witch(
        &mut self,
        action: WitchAction,
        ledger: &mut WitchLedger,
    ) -> Result<(), NightActionError> {
        if self.witch.is_some() {
            return Err(NightActionError::DuplicateSubmission);
        }
        ledger.spend(action)?;
        self.witch = Some(action);
        Ok(())
    }

    /// Whether any action of any kind was accepted this round. Drives
    /// the abandoned-session stall rule.
    pub fn is_empty(&self) -> bool {
        self.wolf_votes.is_empty()
            && self.inspection.is_none()
            && self.protection.is_none()
            && self.witch.is_none()
    }

    pub fn wolf_votes(&self) -> impl Iterator<Item = (&PlayerId, &PlayerId)> {
        self.wolf_votes.iter()
    }

    pub fn wolf_vote_targets(&self) -> impl Iterator<Item = &PlayerId> {
        self.wolf_votes.values()
    }

    pub fn inspection(&self) -> Option<(PlayerId, PlayerId)> {
        self.inspection
    }

    pub fn protection(&self) -> Option<PlayerId> {
        self.protection
    }

    pub fn witch(&self) -> Option<WitchAction> {
        self.witch
    }
}

// =========================================================================
// Tests
// =========================================================================
