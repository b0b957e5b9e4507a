//! Win evaluation, run after every elimination.

use nocturne_protocol::Faction;

use crate::Roster;

/// The result of a win check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinState {
    /// The game continues.
    Ongoing,
    /// Every werewolf is dead.
    VillagersWin,
    /// Living werewolves match or outnumber everyone else.
    WerewolvesWin,
}

impl WinState {
    /// The winning faction, if this state is terminal.
    pub fn winner(self) -> Option<Faction> {
        match self {
            WinState::Ongoing => None,
            WinState::VillagersWin => Some(Faction::Villagers),
            WinState::WerewolvesWin => Some(Faction::Werewolves),
        }
    }
}

/// Pure function over the current alive-role counts.
pub fn evaluate_win(roster: &Roster) -> WinState {
    let wolves = roster.living_werewolves();
    let others = roster.living_non_werewolves();

    if wolves == 0 {
        WinState::VillagersWin
    } else if wolves >= others {
        WinState::WerewolvesWin
    } else {
        WinState::Ongoing
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use nocturne_protocol::{PlayerId, Role};

    use super::*;

    /// Builds a roster with the given counts of living wolves and
    /// living non-wolves (the dead don't matter to the evaluator).
    fn roster_with(wolves: usize, others: usize) -> Roster {
        let mut roster = Roster::new();
        let mut assignment = Vec::new();
        for i in 0..(wolves + others) {
            let id = PlayerId(i as u64 + 1);
            roster.join(id, format!("p{i}"));
            let role = if i < wolves { Role::Werewolf } else { Role::Villager };
            assignment.push((id, role));
        }
        roster.set_roles(&assignment);
        roster
    }

    #[test]
    fn test_exhaustive_small_rosters() {
        // VillagersWin iff wolves == 0; WerewolvesWin iff wolves >= others;
        // Ongoing otherwise. Checked over every split of up to 10 players.
        for wolves in 0..=10usize {
            for others in 0..=(10 - wolves) {
                let expected = if wolves == 0 {
                    WinState::VillagersWin
                } else if wolves >= others {
                    WinState::WerewolvesWin
                } else {
                    WinState::Ongoing
                };
                assert_eq!(
                    evaluate_win(&roster_with(wolves, others)),
                    expected,
                    "{wolves} wolves vs {others} others"
                );
            }
        }
    }

    #[test]
    fn test_dead_players_do_not_count() {
        let mut roster = roster_with(1, 3);
        // Kill the only werewolf: villagers win.
        roster.kill(PlayerId(1));
        assert_eq!(evaluate_win(&roster), WinState::VillagersWin);
    }

    #[test]
    fn test_parity_is_a_werewolf_win() {
        assert_eq!(evaluate_win(&roster_with(2, 2)), WinState::WerewolvesWin);
    }

    #[test]
    fn test_winner_mapping() {
        assert_eq!(WinState::Ongoing.winner(), None);
        assert_eq!(WinState::VillagersWin.winner(), Some(Faction::Villagers));
        assert_eq!(WinState::WerewolvesWin.winner(), Some(Faction::Werewolves));
    }
}
