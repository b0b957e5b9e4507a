//! The session roster: who is playing, what they hold, who still lives.

use nocturne_protocol::{PlayerId, Role};

/// One seat at the table.
///
/// `role` is `None` until the assigner deals at start. `alive` flips to
/// `false` through [`Roster::kill`] only and never back — the dead stay
/// dead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    pub role: Option<Role>,
    pub alive: bool,
}

/// An ordered set of players. Insertion order is join order and is
/// preserved for the session's lifetime.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<PlayerRecord>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a player to the end of the roster. The caller (the session)
    /// checks capacity and phase; the roster only guards uniqueness.
    /// Returns `false` if the player is already seated.
    pub fn join(&mut self, id: PlayerId, name: impl Into<String>) -> bool {
        if self.contains(id) {
            return false;
        }
        self.players.push(PlayerRecord {
            id,
            name: name.into(),
            role: None,
            alive: true,
        });
        true
    }

    /// Removes a player. Only meaningful while in the lobby; once roles
    /// are dealt, players die instead of leaving.
    pub fn remove(&mut self, id: PlayerId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        self.players.len() != before
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Applies a dealt role assignment.
    pub fn set_roles(&mut self, assignment: &[(PlayerId, Role)]) {
        for (id, role) in assignment {
            if let Some(player) = self.players.iter_mut().find(|p| p.id == *id) {
                player.role = Some(*role);
            }
        }
    }

    /// Flips a living player to dead. Returns `true` if the player was
    /// alive (i.e. this call is the kill), `false` if already dead or
    /// unknown. There is no inverse operation.
    pub fn kill(&mut self, id: PlayerId) -> bool {
        match self.players.iter_mut().find(|p| p.id == id) {
            Some(player) if player.alive => {
                player.alive = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.get(id).is_some_and(|p| p.alive)
    }

    pub fn role_of(&self, id: PlayerId) -> Option<Role> {
        self.get(id).and_then(|p| p.role)
    }

    /// All players in join order.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.players.iter()
    }

    /// Living players in join order.
    pub fn living(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.players.iter().filter(|p| p.alive)
    }

    /// Living players holding `role`, in join order.
    pub fn living_with_role(&self, role: Role) -> impl Iterator<Item = &PlayerRecord> {
        self.living().filter(move |p| p.role == Some(role))
    }

    pub fn living_werewolves(&self) -> usize {
        self.living()
            .filter(|p| p.role.is_some_and(Role::is_werewolf))
            .count()
    }

    pub fn living_non_werewolves(&self) -> usize {
        self.living()
            .filter(|p| !p.role.is_some_and(Role::is_werewolf))
            .count()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
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

    fn roster_of(n: u64) -> Roster {
        let mut roster = Roster::new();
        for i in 1..=n {
            assert!(roster.join(pid(i), format!("player-{i}")));
        }
        roster
    }

    #[test]
    fn test_join_preserves_insertion_order() {
        let roster = roster_of(4);
        assert_eq!(roster.ids(), vec![pid(1), pid(2), pid(3), pid(4)]);
    }

    #[test]
    fn test_join_twice_is_rejected() {
        let mut roster = roster_of(2);
        assert!(!roster.join(pid(1), "again"));
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_kill_flips_alive_exactly_once() {
        let mut roster = roster_of(3);
        assert!(roster.kill(pid(2)), "first kill lands");
        assert!(!roster.kill(pid(2)), "a dead player cannot die again");
        assert!(!roster.is_alive(pid(2)));
        assert!(roster.is_alive(pid(1)));
    }

    #[test]
    fn test_kill_unknown_player_is_a_noop() {
        let mut roster = roster_of(2);
        assert!(!roster.kill(pid(99)));
    }

    #[test]
    fn test_set_roles_and_counts() {
        let mut roster = roster_of(5);
        roster.set_roles(&[
            (pid(1), Role::Werewolf),
            (pid(2), Role::Seer),
            (pid(3), Role::Cupid),
            (pid(4), Role::Villager),
            (pid(5), Role::Villager),
        ]);

        assert_eq!(roster.role_of(pid(1)), Some(Role::Werewolf));
        assert_eq!(roster.living_werewolves(), 1);
        assert_eq!(roster.living_non_werewolves(), 4);

        roster.kill(pid(2));
        assert_eq!(roster.living_non_werewolves(), 3);
    }

    #[test]
    fn test_living_with_role_skips_the_dead() {
        let mut roster = roster_of(5);
        roster.set_roles(&[
            (pid(1), Role::Werewolf),
            (pid(2), Role::Werewolf),
            (pid(3), Role::Seer),
            (pid(4), Role::Villager),
            (pid(5), Role::Villager),
        ]);
        roster.kill(pid(1));

        let wolves: Vec<PlayerId> = roster
            .living_with_role(Role::Werewolf)
            .map(|p| p.id)
            .collect();
        assert_eq!(wolves, vec![pid(2)]);
    }

    #[test]
    fn test_remove_only_affects_named_player() {
        let mut roster = roster_of(3);
        assert!(roster.remove(pid(2)));
        assert!(!roster.remove(pid(2)));
        assert_eq!(roster.ids(), vec![pid(1), pid(3)]);
    }
}
