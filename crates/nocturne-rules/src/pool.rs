//! Role pools and the role assigner.
//!
//! The pool table maps roster size to the multiset of roles dealt at
//! start. Assignment shuffles the roster and the flattened pool
//! independently and zips them, so both "who sits where" and "which
//! role lands there" are random.

use nocturne_protocol::{PlayerId, Role};
use rand::seq::SliceRandom;

use crate::AssignError;

/// Smallest roster the pool table supports.
pub const MIN_PLAYERS: usize = 5;

/// Largest configured pool. Also the join cap enforced by the session
/// layer, so pools are never stretched in practice.
pub const MAX_PLAYERS: usize = 10;

/// The configured pool for each supported roster size.
fn base_pool(n: usize) -> &'static [Role] {
    use Role::*;
    match n {
        5 => &[Werewolf, Seer, Cupid, Villager, Villager],
        6 => &[Werewolf, Seer, Cupid, Guardian, Villager, Villager],
        7 => &[Werewolf, Seer, Cupid, Guardian, Witch, Villager, Villager],
        8 => &[Werewolf, Werewolf, Seer, Cupid, Guardian, Witch, Villager, Villager],
        9 => &[Werewolf, Werewolf, Seer, Cupid, Guardian, Witch, Villager, Villager, Villager],
        _ => &[
            Werewolf, Werewolf, Werewolf, Seer, Cupid, Guardian, Witch, Villager, Villager,
            Villager,
        ],
    }
}

/// Returns the role multiset for a roster of `n` players.
///
/// Sizes above [`MAX_PLAYERS`] reuse the largest configured pool padded
/// with Villagers, so `role_pool(n).len() == n` always holds for
/// `n >= MIN_PLAYERS`. Unreachable while the join cap stands, but the
/// invariant is kept rather than trusted.
pub fn role_pool(n: usize) -> Vec<Role> {
    let mut pool = base_pool(n.min(MAX_PLAYERS)).to_vec();
    pool.resize(n, Role::Villager);
    pool
}

/// Shuffles the roster and the role pool independently and zips them
/// into a bijective player → role assignment.
///
/// The returned order is the *role-assignment order* the rest of the
/// engine uses for tie-breaks, so callers should keep it.
pub fn assign_roles(players: &[PlayerId]) -> Result<Vec<(PlayerId, Role)>, AssignError> {
    if players.len() < MIN_PLAYERS {
        return Err(AssignError::InsufficientPlayers {
            have: players.len(),
            min: MIN_PLAYERS,
        });
    }

    let mut rng = rand::rng();
    let mut order: Vec<PlayerId> = players.to_vec();
    let mut roles = role_pool(players.len());
    order.shuffle(&mut rng);
    roles.shuffle(&mut rng);

    Ok(order.into_iter().zip(roles).collect())
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    #[test]
    fn test_role_pool_sums_match_roster_size() {
        for n in MIN_PLAYERS..=MAX_PLAYERS {
            assert_eq!(role_pool(n).len(), n, "pool for {n} players");
        }
    }

    #[test]
    fn test_role_pool_five_matches_reference_table() {
        let mut counts: HashMap<Role, usize> = HashMap::new();
        for role in role_pool(5) {
            *counts.entry(role).or_insert(0) += 1;
        }
        assert_eq!(counts.get(&Role::Werewolf), Some(&1));
        assert_eq!(counts.get(&Role::Seer), Some(&1));
        assert_eq!(counts.get(&Role::Cupid), Some(&1));
        assert_eq!(counts.get(&Role::Villager), Some(&2));
        assert_eq!(counts.get(&Role::Guardian), None);
        assert_eq!(counts.get(&Role::Witch), None);
    }

    #[test]
    fn test_role_pool_always_has_a_werewolf_and_a_seer() {
        for n in MIN_PLAYERS..=MAX_PLAYERS {
            let pool = role_pool(n);
            assert!(pool.contains(&Role::Werewolf), "{n}-pool needs a werewolf");
            assert!(pool.contains(&Role::Seer), "{n}-pool needs a seer");
        }
    }

    #[test]
    fn test_role_pool_above_max_pads_with_villagers() {
        let pool = role_pool(13);
        assert_eq!(pool.len(), 13);
        let wolves = pool.iter().filter(|r| r.is_werewolf()).count();
        let villagers = pool.iter().filter(|r| **r == Role::Villager).count();
        assert_eq!(wolves, 3, "largest configured pool is reused");
        assert_eq!(villagers, 6, "surplus players become villagers");
    }

    #[test]
    fn test_assign_roles_is_a_bijection_onto_the_pool() {
        let players: Vec<PlayerId> = (1..=7).map(pid).collect();
        let assignment = assign_roles(&players).unwrap();

        assert_eq!(assignment.len(), 7);

        // Every player appears exactly once.
        let mut seen: Vec<PlayerId> = assignment.iter().map(|(p, _)| *p).collect();
        seen.sort();
        let mut expected = players.clone();
        expected.sort();
        assert_eq!(seen, expected);

        // The dealt roles are exactly the pool multiset.
        let mut dealt: HashMap<Role, usize> = HashMap::new();
        for (_, role) in &assignment {
            *dealt.entry(*role).or_insert(0) += 1;
        }
        let mut pool: HashMap<Role, usize> = HashMap::new();
        for role in role_pool(7) {
            *pool.entry(role).or_insert(0) += 1;
        }
        assert_eq!(dealt, pool);
    }

    #[test]
    fn test_assign_roles_below_minimum_is_rejected() {
        let players: Vec<PlayerId> = (1..=4).map(pid).collect();
        let result = assign_roles(&players);
        assert_eq!(
            result,
            Err(AssignError::InsufficientPlayers { have: 4, min: 5 })
        );
    }

    #[test]
    fn test_assign_roles_shuffles_the_mapping() {
        // With 10 players the chance of two identical assignments in a
        // row is vanishingly small; retry once to keep flakes at zero.
        let players: Vec<PlayerId> = (1..=10).map(pid).collect();
        let first = assign_roles(&players).unwrap();
        let differs = (0..2).any(|_| assign_roles(&players).unwrap() != first);
        assert!(differs, "assignment should not be deterministic");
    }
}
