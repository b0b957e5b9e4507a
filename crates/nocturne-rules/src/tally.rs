//! Plurality counting, shared by the werewolf kill vote and the day
//! elimination vote.

use std::collections::HashMap;

use nocturne_protocol::PlayerId;

use crate::VoteError;

/// Reduces a set of votes to the target with the most of them.
///
/// Ties break to the candidate appearing first in `order`, the
/// role-assignment order fixed at start. Deterministic by construction:
/// no map-iteration order leaks into the result. Returns `None` when no
/// votes were cast.
pub fn plurality<'a, I>(votes: I, order: &[PlayerId]) -> Option<PlayerId>
where
    I: IntoIterator<Item = &'a PlayerId>,
{
    let mut counts: HashMap<PlayerId, usize> = HashMap::new();
    for target in votes {
        *counts.entry(*target).or_insert(0) += 1;
    }
    let best = counts.values().copied().max()?;

    // Every legal vote targets a dealt player, so `order` contains all
    // counted targets.
    debug_assert!(
        counts.keys().all(|target| order.contains(target)),
        "vote target outside the assignment order"
    );

    order
        .iter()
        .find(|candidate| counts.get(candidate) == Some(&best))
        .copied()
}

/// The Day-phase ballot box: one vote per living player per round.
///
/// A fresh tally is installed when a Day opens. Liveness of voter and
/// target is validated by the session, which sees the roster; this type
/// only guards the one-vote rule.
#[derive(Debug, Clone, Default)]
pub struct VoteTally {
    votes: HashMap<PlayerId, PlayerId>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `voter`'s vote against `target`, rejecting a second vote
    /// from the same player without changing the first.
    pub fn record(&mut self, voter: PlayerId, target: PlayerId) -> Result<(), VoteError> {
        if self.votes.contains_key(&voter) {
            return Err(VoteError::AlreadyVoted);
        }
        self.votes.insert(voter, target);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    /// Closes the ballot box: the plurality target, or `None` when no
    /// votes were cast (no elimination that round).
    pub fn close(&self, order: &[PlayerId]) -> Option<PlayerId> {
        plurality(self.votes.values(), order)
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    #[test]
    fn test_plurality_picks_most_voted_target() {
        let votes = [pid(3), pid(3), pid(2)];
        let order = [pid(1), pid(2), pid(3)];
        assert_eq!(plurality(votes.iter(), &order), Some(pid(3)));
    }

    #[test]
    fn test_plurality_tie_breaks_by_assignment_order() {
        let votes = [pid(2), pid(3)];
        // pid(3) comes first in assignment order, so it wins the tie.
        let order = [pid(3), pid(1), pid(2)];
        assert_eq!(plurality(votes.iter(), &order), Some(pid(3)));
    }

    #[test]
    fn test_plurality_of_no_votes_is_none() {
        let order = [pid(1), pid(2)];
        assert_eq!(plurality([].iter(), &order), None);
    }

    #[test]
    fn test_plurality_does_not_require_absolute_majority() {
        // 2 of 5 votes suffice when nothing beats them.
        let votes = [pid(1), pid(1), pid(2), pid(3), pid(4)];
        let order = [pid(1), pid(2), pid(3), pid(4), pid(5)];
        assert_eq!(plurality(votes.iter(), &order), Some(pid(1)));
    }

    #[test]
    fn test_vote_tally_one_vote_per_player() {
        let mut tally = VoteTally::new();
        tally.record(pid(1), pid(2)).unwrap();
        assert_eq!(tally.record(pid(1), pid(3)), Err(VoteError::AlreadyVoted));
        assert_eq!(tally.len(), 1);
    }

    #[test]
    fn test_vote_tally_close_empty_means_no_elimination() {
        let tally = VoteTally::new();
        assert_eq!(tally.close(&[pid(1), pid(2)]), None);
    }

    #[test]
    fn test_vote_tally_close_reduces_by_plurality() {
        let mut tally = VoteTally::new();
        tally.record(pid(1), pid(4)).unwrap();
        tally.record(pid(2), pid(4)).unwrap();
        tally.record(pid(3), pid(1)).unwrap();
        let order = [pid(1), pid(2), pid(3), pid(4)];
        assert_eq!(tally.close(&order), Some(pid(4)));
    }
}
