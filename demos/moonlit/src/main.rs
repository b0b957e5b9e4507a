//! Moonlit: a scripted five-player game driven entirely through the
//! engine's public surface.
//!
//! Five bots join an arena, the host starts the game, and the script
//! reacts to engine events the way real clients would: the werewolf
//! hunts a villager, the seer inspects, cupid links the two villagers
//! (so the night kill chains), and the village lynches the wolf at
//! noon. Run with `RUST_LOG=debug` for the engine's internal logs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use nocturne::prelude::*;
use tokio::sync::mpsc;

const NAMES: [&str; 5] = ["selene", "orion", "vesper", "lyra", "caius"];

/// Reacts to engine events with scripted client behavior.
struct Director {
    engine: Engine<ChannelNotifier, MemoryStore>,
    session: SessionId,
    roles: HashMap<PlayerId, Role>,
    alive: Vec<PlayerId>,
}

impl Director {
    fn name_of(&self, player: PlayerId) -> &'static str {
        NAMES[(player.0 - 1) as usize]
    }

    fn first_living(&self, role: Role) -> Option<PlayerId> {
        self.alive
            .iter()
            .copied()
            .find(|p| self.roles.get(p) == Some(&role))
    }

    async fn on_prompt(&self, player: PlayerId, eligible: &[PlayerId]) -> Result<(), NocturneError> {
        let Some(role) = self.roles.get(&player).copied() else {
            return Ok(());
        };
        let action = match role {
            Role::Werewolf => {
                // Hunt a villager when one still stands.
                let target = eligible
                    .iter()
                    .copied()
                    .find(|t| self.roles.get(t) == Some(&Role::Villager))
                    .or_else(|| eligible.first().copied());
                match target {
                    Some(target) => NightAction::WerewolfKill { target },
                    None => return Ok(()),
                }
            }
            Role::Seer => {
                let Some(target) = eligible.iter().copied().find(|t| *t != player) else {
                    return Ok(());
                };
                NightAction::SeerInspect { target }
            }
            Role::Cupid => {
                let villagers: Vec<PlayerId> = eligible
                    .iter()
                    .copied()
                    .filter(|t| self.roles.get(t) == Some(&Role::Villager))
                    .collect();
                let [first, second, ..] = villagers[..] else {
                    return Ok(());
                };
                NightAction::CupidPair { first, second }
            }
            _ => return Ok(()),
        };
        self.engine
            .submit_night_action(self.session, player, action)
            .await
    }

    /// The village turns on the wolf; the wolf deflects.
    async fn cast_votes(&self) -> Result<(), NocturneError> {
        let Some(wolf) = self.first_living(Role::Werewolf) else {
            return Ok(());
        };
        for voter in self.alive.iter().copied() {
            let target = if voter == wolf {
                match self.alive.iter().copied().find(|p| *p != wolf) {
                    Some(scapegoat) => scapegoat,
                    None => continue,
                }
            } else {
                wolf
            };
            self.engine.submit_vote(self.session, voter, target).await?;
        }
        Ok(())
    }

    async fn run(
        &mut self,
        events: &mut mpsc::UnboundedReceiver<OutboundEvent>,
    ) -> Result<(), NocturneError> {
        while let Some(outbound) = events.recv().await {
            match outbound.event {
                GameEvent::RolesAssigned { role } => {
                    if let Audience::Player(player) = outbound.audience {
                        tracing::info!(name = self.name_of(player), ?role, "role dealt");
                        self.roles.insert(player, role);
                    }
                }
                GameEvent::NightPromptIssued { round, ref eligible } => {
                    if let Audience::Player(player) = outbound.audience {
                        tracing::info!(name = self.name_of(player), round, "night prompt");
                        self.on_prompt(player, eligible).await?;
                    }
                }
                GameEvent::SeerReveal { target, role } => {
                    tracing::info!(target = self.name_of(target), ?role, "the seer saw");
                }
                GameEvent::PhaseResolved {
                    phase,
                    round,
                    ref deaths,
                    saved_by_witch,
                    lover_chain,
                } => {
                    for dead in deaths {
                        tracing::info!(name = self.name_of(*dead), "found dead");
                    }
                    self.alive.retain(|p| !deaths.contains(p));
                    tracing::info!(
                        ?phase,
                        round,
                        survivors = self.alive.len(),
                        saved_by_witch,
                        lover_chain,
                        "phase resolved"
                    );
                    if phase == Phase::Night {
                        self.cast_votes().await?;
                    }
                }
                GameEvent::WinDeclared { faction, ref roster } => {
                    for reveal in roster {
                        tracing::info!(
                            name = %reveal.name,
                            role = ?reveal.role,
                            alive = reveal.alive,
                            "final reveal"
                        );
                    }
                    tracing::info!(?faction, "the game is over");
                    return Ok(());
                }
                GameEvent::SessionTerminated { reason } => {
                    tracing::warn!(%reason, "session terminated");
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), NocturneError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let (notifier, mut events) = ChannelNotifier::new();
    let store = Arc::new(MemoryStore::new());
    let engine = Engine::<ChannelNotifier, MemoryStore>::builder()
        .session_config(SessionConfig {
            night_window: Duration::from_secs(2),
            day_window: Duration::from_secs(2),
            ..SessionConfig::default()
        })
        .build(Arc::new(notifier), Arc::clone(&store));

    let session = engine.create_session(ArenaId(1)).await?;
    let players: Vec<PlayerId> = (1..=5).map(PlayerId).collect();
    for (player, name) in players.iter().zip(NAMES) {
        engine.join(session, *player, name).await?;
    }
    engine.start_game(session, players[0]).await?;

    let mut director = Director {
        engine,
        session,
        roles: HashMap::new(),
        alive: players,
    };
    director.run(&mut events).await?;

    for (player, wins) in store.leaderboard() {
        tracing::info!(name = director.name_of(player), wins, "leaderboard");
    }
    Ok(())
}
