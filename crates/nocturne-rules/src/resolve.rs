//! Night resolution: from a frozen action snapshot to a set of deaths.
//!
//! The precedence is fixed and total, so any combination of
//! simultaneous submissions resolves the same way every time:
//!
//! 1. werewolf plurality target
//! 2. witch heal cancels that kill (raises the "saved" flag)
//! 3. otherwise guardian protection cancels it (no flag)
//! 4. a witch kill lands unconditionally, regardless of 2–3
//! 5. each confirmed death drags a living lover partner along, once

use nocturne_protocol::{PlayerId, WitchAction};
use tracing::debug;

use crate::{LoverLink, NightActions, Roster, tally::plurality};

/// What a Night window resolved to. The narrative flags feed the
/// `PhaseResolved` broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NightOutcome {
    /// Newly dead players, in resolution order (werewolf victim first,
    /// then the witch's, then chained lovers).
    pub deaths: Vec<PlayerId>,
    /// The witch's heal landed on the werewolf target.
    pub saved_by_witch: bool,
    /// At least one death was a lover chained to another.
    pub lover_chain: bool,
}

/// Resolves one Night's frozen snapshot against the current roster.
///
/// Pure over everything but its return value: the caller applies the
/// deaths to the roster. Runs to completion on an empty snapshot and
/// yields no deaths.
pub fn resolve_night(
    actions: &NightActions,
    lovers: Option<&LoverLink>,
    order: &[PlayerId],
    roster: &Roster,
) -> NightOutcome {
    let mut outcome = NightOutcome::default();

    // 1. Werewolf plurality among independent votes.
    let mut wolf_target = plurality(actions.wolf_vote_targets(), order);

    // 2–3. Heal beats protection; either cancels the kill.
    if let Some(target) = wolf_target {
        match actions.witch() {
            Some(WitchAction::Heal { target: healed }) if healed == target => {
                debug!(%target, "witch heal cancelled the werewolf kill");
                outcome.saved_by_witch = true;
                wolf_target = None;
            }
            _ => {
                if actions.protection() == Some(target) {
                    debug!(%target, "guardian protection cancelled the werewolf kill");
                    wolf_target = None;
                }
            }
        }
    }

    if let Some(target) = wolf_target {
        if roster.is_alive(target) {
            outcome.deaths.push(target);
        }
    }

    // 4. The witch's kill ignores protection and the wolves entirely.
    if let Some(WitchAction::Kill { target }) = actions.witch() {
        if roster.is_alive(target) && !outcome.deaths.contains(&target) {
            outcome.deaths.push(target);
        }
    }

    // 5. Lover chain, applied exactly once per resolution.
    outcome.lover_chain = chain_lovers(&mut outcome.deaths, lovers, roster);

    outcome
}

/// Appends the lover partner of any confirmed death, if that partner
/// still lives and is not already in the set. Shared by night
/// resolution and the day elimination path. Returns whether a chain
/// death was added.
pub fn chain_lovers(
    deaths: &mut Vec<PlayerId>,
    lovers: Option<&LoverLink>,
    roster: &Roster,
) -> bool {
    let Some(link) = lovers else {
        return false;
    };

    // One pass over the original deaths is enough: a chained partner
    // can only be the other half of the same link, so chains never
    // cascade further.
    let confirmed = deaths.clone();
    let mut chained = false;
    for dead in confirmed {
        if let Some(partner) = link.partner_of(dead) {
            if roster.is_alive(partner) && !deaths.contains(&partner) {
                debug!(%dead, %partner, "lover follows their partner");
                deaths.push(partner);
                chained = true;
            }
        }
    }
    chained
}

// =========================================================================
// Tests
// =========================================================================
