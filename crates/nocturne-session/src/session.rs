//! Session actor: an isolated Tokio task that owns one game.
//!
//! All mutable game state lives inside the actor; the outside world
//! talks to it through an mpsc channel via [`SessionHandle`]. A phase
//! window is the actor's `select!` loop with a deadline armed: player
//! submissions are validated and applied one at a time while the
//! deadline branch pends, which makes every submission atomic with
//! respect to the others without any locking. The deadline firing is
//! the only thing that advances a phase; a `Terminate` command
//! interrupts a suspended window immediately. An ended session keeps
//! answering reads for a short linger window so clients can fetch the
//! final revealed snapshot, then the actor exits on its own.

use std::sync::Arc;
use std::time::Duration;

use nocturne_protocol::{
    ArenaId, Audience, Faction, GameEvent, NightAction, Phase, PlayerId, PlayerReveal,
    PlayerView, SessionId, SessionSnapshot, TerminationReason, WitchAction,
};
use nocturne_rules::{
    LoverLink, NightActions, Roster, VoteTally, WitchLedger, assign_roles, chain_lovers,
    evaluate_win, resolve_night,
};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant as TokioInstant};

use crate::{GameOutcome, GameStore, Notifier, PlayerStanding, SessionConfig, SessionError};

/// Command channel depth per session actor.
const CHANNEL_SIZE: usize = 64;

/// Commands sent to a session actor through its channel.
pub(crate) enum SessionCommand {
    Join {
        player: PlayerId,
        name: String,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Leave {
        player: PlayerId,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Start {
        requester: PlayerId,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    NightAction {
        player: PlayerId,
        action: NightAction,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Vote {
        voter: PlayerId,
        target: PlayerId,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Terminate {
        /// `None` for internal callers (watchdog, registry shutdown),
        /// which skip the host check.
        requester: Option<PlayerId>,
        reason: TerminationReason,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Info {
        reply: oneshot::Sender<SessionInfo>,
    },
}

/// Lightweight metadata about a running session, served to the
/// registry and the watchdog.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub session_id: SessionId,
    pub arena_id: ArenaId,
    pub phase: Phase,
    pub round: u32,
    pub players: usize,
    /// Time since the last accepted activity.
    pub idle_for: Duration,
}

/// Handle to a running session actor. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    session_id: SessionId,
    arena_id: ArenaId,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn arena_id(&self) -> ArenaId {
        self.arena_id
    }

    /// True once the actor task has exited and dropped its receiver.
    pub(crate) fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub async fn join(
        &self,
        player: PlayerId,
        name: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Join {
            player,
            name: name.into(),
            reply,
        })
        .await?
    }

    pub async fn leave(&self, player: PlayerId) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Leave { player, reply }).await?
    }

    pub async fn start(&self, requester: PlayerId) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Start { requester, reply }).await?
    }

    pub async fn submit_night_action(
        &self,
        player: PlayerId,
        action: NightAction,
    ) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::NightAction {
            player,
            action,
            reply,
        })
        .await?
    }

    pub async fn submit_vote(
        &self,
        voter: PlayerId,
        target: PlayerId,
    ) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Vote { voter, target, reply }).await?
    }

    /// Host-initiated termination; validates the requester.
    pub async fn terminate(&self, requester: PlayerId) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Terminate {
            requester: Some(requester),
            reason: TerminationReason::HostRequest,
            reply,
        })
        .await?
    }

    /// Internal termination (watchdog, registry shutdown); no host check.
    pub async fn force_terminate(
        &self,
        reason: TerminationReason,
    ) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Terminate {
            requester: None,
            reason,
            reply,
        })
        .await?
    }

    /// Read-only snapshot for rendering.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| SessionCommand::Snapshot { reply }).await
    }

    /// Lifecycle metadata for the registry and the watchdog.
    pub async fn info(&self) -> Result<SessionInfo, SessionError> {
        self.request(|reply| SessionCommand::Info { reply }).await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))
    }
}

/// Whether the actor loop keeps running after a command or a window close.
#[derive(PartialEq)]
enum Flow {
    Continue,
    Stop,
}

/// The session actor's state. Lives inside one Tokio task.
struct SessionActor<N: Notifier, S: GameStore> {
    session_id: SessionId,
    arena_id: ArenaId,
    config: SessionConfig,

    phase: Phase,
    /// Round counter; 0 in the lobby, incremented entering each Night.
    round: u32,
    host: Option<PlayerId>,
    roster: Roster,
    /// The shuffled order fixed at role assignment; plurality tie-breaks
    /// consult it.
    assignment_order: Vec<PlayerId>,

    // Round-scoped buffers, replaced at each phase entry.
    night: NightActions,
    tally: VoteTally,
    /// Any night action accepted this round (including cupid and seer,
    /// which leave no trace in the resolution snapshot).
    round_had_action: bool,
    /// The previous Night closed with zero submissions; combined with an
    /// empty Day tally this triggers the abandoned-session rule.
    night_was_silent: bool,

    // Session-lifetime sub-state, carried across round rollover.
    witch: WitchLedger,
    lovers: Option<LoverLink>,

    /// Tokio clock so tests with a paused runtime see idleness accrue.
    last_activity: TokioInstant,
    /// Armed while a Night or Day window is open.
    deadline: Option<TokioInstant>,

    notifier: Arc<N>,
    store: Arc<S>,
    receiver: mpsc::Receiver<SessionCommand>,
}

/// Pends forever when no window is open, so `select!` only ever
/// advances phases while a deadline is armed.
async fn wait_deadline(deadline: Option<TokioInstant>) {
    match deadline {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

impl<N: Notifier, S: GameStore> SessionActor<N, S> {
    async fn run(mut self) {
        tracing::info!(
            session_id = %self.session_id,
            arena_id = %self.arena_id,
            "session actor started"
        );

        loop {
            let deadline = self.deadline;
            tokio::select! {
                maybe_cmd = self.receiver.recv() => match maybe_cmd {
                    Some(cmd) => {
                        if self.handle_command(cmd) == Flow::Stop {
                            break;
                        }
                    }
                    None => break,
                },
                _ = wait_deadline(deadline) => {
                    if self.handle_window_close() == Flow::Stop {
                        break;
                    }
                }
            }
        }

        tracing::info!(session_id = %self.session_id, "session actor stopped");
    }

    fn handle_command(&mut self, cmd: SessionCommand) -> Flow {
        match cmd {
            SessionCommand::Join { player, name, reply } => {
                let _ = reply.send(self.handle_join(player, name));
                Flow::Continue
            }
            SessionCommand::Leave { player, reply } => {
                let result = self.handle_leave(player);
                let emptied = result.is_ok() && self.roster.is_empty();
                let _ = reply.send(result);
                if emptied {
                    tracing::info!(session_id = %self.session_id, "lobby emptied, closing");
                    Flow::Stop
                } else {
                    Flow::Continue
                }
            }
            SessionCommand::Start { requester, reply } => {
                let _ = reply.send(self.handle_start(requester));
                Flow::Continue
            }
            SessionCommand::NightAction { player, action, reply } => {
                let _ = reply.send(self.handle_night_action(player, action));
                Flow::Continue
            }
            SessionCommand::Vote { voter, target, reply } => {
                let _ = reply.send(self.handle_vote(voter, target));
                Flow::Continue
            }
            SessionCommand::Terminate { requester, reason, reply } => {
                let _ = reply.send(self.handle_terminate(requester, reason));
                Flow::Continue
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
                Flow::Continue
            }
            SessionCommand::Info { reply } => {
                let _ = reply.send(self.info());
                Flow::Continue
            }
        }
    }

    // -- Lobby ------------------------------------------------------------

    fn handle_join(&mut self, player: PlayerId, name: String) -> Result<(), SessionError> {
        match self.phase {
            Phase::Lobby => {}
            Phase::Ended => return Err(SessionError::Ended),
            _ => return Err(SessionError::JoinClosed),
        }
        if self.roster.contains(player) {
            return Err(SessionError::AlreadyJoined(player));
        }
        if self.roster.len() >= self.config.max_players {
            return Err(SessionError::LobbyFull(self.roster.len()));
        }

        self.roster.join(player, name);
        if self.host.is_none() {
            self.host = Some(player);
        }
        self.touch();
        tracing::info!(
            session_id = %self.session_id,
            %player,
            players = self.roster.len(),
            "player joined"
        );
        Ok(())
    }

    fn handle_leave(&mut self, player: PlayerId) -> Result<(), SessionError> {
        match self.phase {
            Phase::Lobby => {}
            Phase::Ended => return Err(SessionError::Ended),
            other => return Err(SessionError::WrongPhase(other)),
        }
        if !self.roster.remove(player) {
            return Err(SessionError::NotInGame(player));
        }
        // Host privilege passes to the next joiner.
        if self.host == Some(player) {
            self.host = self.roster.ids().first().copied();
        }
        self.touch();
        tracing::info!(session_id = %self.session_id, %player, "player left the lobby");
        Ok(())
    }

    fn handle_start(&mut self, requester: PlayerId) -> Result<(), SessionError> {
        match self.phase {
            Phase::Lobby => {}
            Phase::Ended => return Err(SessionError::Ended),
            other => return Err(SessionError::WrongPhase(other)),
        }
        if self.host != Some(requester) {
            return Err(SessionError::NotHost(requester));
        }
        if self.roster.len() < self.config.min_players {
            return Err(SessionError::NotEnoughPlayers {
                have: self.roster.len(),
                min: self.config.min_players,
            });
        }

        let assignment = assign_roles(&self.roster.ids())?;
        self.roster.set_roles(&assignment);
        self.assignment_order = assignment.iter().map(|(player, _)| *player).collect();
        self.store.roles_assigned(self.session_id, &assignment);
        for (player, role) in &assignment {
            self.emit(
                Audience::Player(*player),
                GameEvent::RolesAssigned { role: *role },
            );
        }
        tracing::info!(
            session_id = %self.session_id,
            players = assignment.len(),
            "roles dealt, game starting"
        );

        self.enter_night();
        Ok(())
    }

    // -- Night ------------------------------------------------------------

    fn handle_night_action(
        &mut self,
        player: PlayerId,
        action: NightAction,
    ) -> Result<(), SessionError> {
        match self.phase {
            Phase::Night => {}
            Phase::Ended => return Err(SessionError::Ended),
            other => return Err(SessionError::WrongPhase(other)),
        }
        let Some(record) = self.roster.get(player) else {
            return Err(SessionError::NotInGame(player));
        };
        if !record.alive {
            return Err(SessionError::ActorDead(player));
        }
        let required = action.required_role();
        if record.role != Some(required) {
            return Err(SessionError::WrongRole { player, required });
        }

        match action {
            NightAction::WerewolfKill { target } => {
                if target == player {
                    return Err(SessionError::SelfTarget);
                }
                self.ensure_alive(target)?;
                self.night.record_wolf_vote(player, target)?;
            }
            NightAction::SeerInspect { target } => {
                self.ensure_alive(target)?;
                self.night.record_inspection(player, target)?;
                // The reveal is immediate and private; it is not part of
                // the death-resolution snapshot.
                if let Some(role) = self.roster.role_of(target) {
                    self.emit(
                        Audience::Player(player),
                        GameEvent::SeerReveal { target, role },
                    );
                }
            }
            NightAction::GuardianProtect { target } => {
                self.ensure_alive(target)?;
                self.night.record_protection(target)?;
            }
            NightAction::CupidPair { first, second } => {
                if self.round != 1 {
                    return Err(SessionError::CupidWindowClosed);
                }
                if self.lovers.is_some() {
                    return Err(SessionError::LoversAlreadyLinked);
                }
                self.ensure_alive(first)?;
                self.ensure_alive(second)?;
                self.lovers = Some(LoverLink::new(first, second)?);
                tracing::info!(
                    session_id = %self.session_id,
                    %first,
                    %second,
                    "cupid linked the lovers"
                );
            }
            NightAction::Witch(witch_action) => {
                if let WitchAction::Kill { target } = witch_action {
                    if target == player {
                        return Err(SessionError::SelfTarget);
                    }
                }
                self.ensure_alive(witch_action.target())?;
                self.night.record_witch(witch_action, &mut self.witch)?;
            }
        }

        self.round_had_action = true;
        self.touch();
        Ok(())
    }

    fn enter_night(&mut self) {
        self.round += 1;
        self.phase = Phase::Night;
        self.night = NightActions::new();
        self.round_had_action = false;
        self.deadline = Some(TokioInstant::now() + self.config.night_window);
        self.touch();
        self.store.phase_changed(self.session_id, Phase::Night, self.round);
        tracing::info!(session_id = %self.session_id, round = self.round, "night falls");
        self.issue_night_prompts();
    }

    /// Prompts every living player whose role can still act tonight.
    fn issue_night_prompts(&self) {
        let living: Vec<PlayerId> = self.roster.living().map(|p| p.id).collect();
        for player in self.roster.living() {
            let Some(role) = player.role else { continue };
            if !role.acts_at_night() {
                continue;
            }
            let eligible: Vec<PlayerId> = match role {
                nocturne_protocol::Role::Werewolf => {
                    living.iter().copied().filter(|t| *t != player.id).collect()
                }
                nocturne_protocol::Role::Cupid => {
                    if self.round != 1 || self.lovers.is_some() {
                        continue;
                    }
                    living.clone()
                }
                nocturne_protocol::Role::Witch => {
                    if self.witch.heal_spent() && self.witch.kill_spent() {
                        continue;
                    }
                    living.clone()
                }
                _ => living.clone(),
            };
            self.emit(
                Audience::Player(player.id),
                GameEvent::NightPromptIssued {
                    round: self.round,
                    eligible,
                },
            );
        }
    }

    fn close_night(&mut self) {
        let outcome = resolve_night(
            &self.night,
            self.lovers.as_ref(),
            &self.assignment_order,
            &self.roster,
        );
        for dead in &outcome.deaths {
            if self.roster.kill(*dead) {
                self.store.player_killed(self.session_id, self.round, *dead);
            }
        }
        self.night_was_silent = !self.round_had_action;

        self.emit(
            Audience::Arena,
            GameEvent::PhaseResolved {
                phase: Phase::Night,
                round: self.round,
                deaths: outcome.deaths.clone(),
                saved_by_witch: outcome.saved_by_witch,
                lover_chain: outcome.lover_chain,
            },
        );
        tracing::info!(
            session_id = %self.session_id,
            round = self.round,
            deaths = outcome.deaths.len(),
            saved = outcome.saved_by_witch,
            "night resolved"
        );

        match evaluate_win(&self.roster).winner() {
            Some(faction) => self.declare_win(faction),
            None => self.enter_day(),
        }
    }

    // -- Day --------------------------------------------------------------

    fn handle_vote(&mut self, voter: PlayerId, target: PlayerId) -> Result<(), SessionError> {
        match self.phase {
            Phase::Day => {}
            Phase::Ended => return Err(SessionError::Ended),
            _ => return Err(SessionError::VoteOutsideDay),
        }
        let Some(record) = self.roster.get(voter) else {
            return Err(SessionError::NotInGame(voter));
        };
        if !record.alive {
            return Err(SessionError::ActorDead(voter));
        }
        self.ensure_alive(target)?;

        self.tally.record(voter, target)?;
        self.store.vote_recorded(self.session_id, self.round, voter, target);
        self.touch();
        Ok(())
    }

    fn enter_day(&mut self) {
        self.phase = Phase::Day;
        self.tally = VoteTally::new();
        self.deadline = Some(TokioInstant::now() + self.config.day_window);
        self.touch();
        self.store.phase_changed(self.session_id, Phase::Day, self.round);
        tracing::info!(session_id = %self.session_id, round = self.round, "day breaks");
    }

    fn close_day(&mut self) {
        // The stall check looks at raw participation, before any deaths
        // land: a whole Night and Day with zero submissions means the
        // table walked away.
        let stalled = self.night_was_silent && self.tally.is_empty();

        let mut deaths = Vec::new();
        let mut lover_chain = false;
        if let Some(target) = self.tally.close(&self.assignment_order) {
            deaths.push(target);
            lover_chain = chain_lovers(&mut deaths, self.lovers.as_ref(), &self.roster);
            for dead in &deaths {
                if self.roster.kill(*dead) {
                    self.store.player_killed(self.session_id, self.round, *dead);
                }
            }
        }

        self.emit(
            Audience::Arena,
            GameEvent::PhaseResolved {
                phase: Phase::Day,
                round: self.round,
                deaths,
                saved_by_witch: false,
                lover_chain,
            },
        );

        if stalled {
            tracing::warn!(
                session_id = %self.session_id,
                round = self.round,
                "a full round passed with no submissions, ending as abandoned"
            );
            self.finish_terminated(TerminationReason::Abandoned);
            return;
        }

        match evaluate_win(&self.roster).winner() {
            Some(faction) => self.declare_win(faction),
            None => self.enter_night(),
        }
    }

    fn handle_window_close(&mut self) -> Flow {
        match self.phase {
            Phase::Night => {
                self.close_night();
                Flow::Continue
            }
            Phase::Day => {
                self.close_day();
                Flow::Continue
            }
            // The post-game linger elapsed.
            Phase::Ended => Flow::Stop,
            // A deadline in the lobby is a leftover; disarm it.
            _ => {
                self.deadline = None;
                Flow::Continue
            }
        }
    }

    // -- Endings ----------------------------------------------------------

    fn handle_terminate(
        &mut self,
        requester: Option<PlayerId>,
        reason: TerminationReason,
    ) -> Result<(), SessionError> {
        if self.phase == Phase::Ended {
            return Err(SessionError::Ended);
        }
        if let Some(requester) = requester {
            if self.host != Some(requester) {
                return Err(SessionError::NotHost(requester));
            }
        }
        self.finish_terminated(reason);
        Ok(())
    }

    fn declare_win(&mut self, faction: Faction) {
        let roster: Vec<PlayerReveal> = self
            .roster
            .iter()
            .filter_map(|p| {
                p.role.map(|role| PlayerReveal {
                    player: p.id,
                    name: p.name.clone(),
                    role,
                    alive: p.alive,
                })
            })
            .collect();
        self.emit(Audience::Arena, GameEvent::WinDeclared { faction, roster });

        let outcome = GameOutcome {
            winner: Some(faction),
            termination: None,
            standings: self.standings(Some(faction)),
        };
        self.store.game_ended(self.session_id, &outcome);
        self.finish();
        tracing::info!(session_id = %self.session_id, %faction, "game over");
    }

    fn finish_terminated(&mut self, reason: TerminationReason) {
        self.emit(Audience::Arena, GameEvent::SessionTerminated { reason });
        let outcome = GameOutcome {
            winner: None,
            termination: Some(reason),
            standings: self.standings(None),
        };
        self.store.game_ended(self.session_id, &outcome);
        self.finish();
        tracing::info!(session_id = %self.session_id, %reason, "session terminated");
    }

    /// Moves to `Ended` and clears both the round-scoped buffers and the
    /// session-lifetime sub-state. Nothing mutates past this point; the
    /// actor keeps answering reads for the linger window (snapshots now
    /// reveal roles), then exits when the deadline fires.
    fn finish(&mut self) {
        self.phase = Phase::Ended;
        self.deadline = Some(TokioInstant::now() + self.config.ended_linger);
        self.night = NightActions::new();
        self.tally = VoteTally::new();
        self.lovers = None;
        self.touch();
        self.store.phase_changed(self.session_id, Phase::Ended, self.round);
    }

    fn standings(&self, winner: Option<Faction>) -> Vec<PlayerStanding> {
        self.roster
            .iter()
            .filter_map(|p| {
                p.role.map(|role| PlayerStanding {
                    player: p.id,
                    role,
                    alive: p.alive,
                    won: winner.is_some_and(|w| role.faction() == w),
                })
            })
            .collect()
    }

    // -- Views ------------------------------------------------------------

    fn snapshot(&self) -> SessionSnapshot {
        // Roles stay secret until the game ends.
        let reveal = self.phase == Phase::Ended;
        SessionSnapshot {
            session_id: self.session_id,
            arena_id: self.arena_id,
            phase: self.phase,
            round: self.round,
            host: self.host,
            players: self
                .roster
                .iter()
                .map(|p| PlayerView {
                    player: p.id,
                    name: p.name.clone(),
                    alive: p.alive,
                    role: if reveal { p.role } else { None },
                })
                .collect(),
        }
    }

    fn info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.session_id,
            arena_id: self.arena_id,
            phase: self.phase,
            round: self.round,
            players: self.roster.len(),
            idle_for: self.last_activity.elapsed(),
        }
    }

    // -- Helpers ----------------------------------------------------------

    fn ensure_alive(&self, target: PlayerId) -> Result<(), SessionError> {
        if self.roster.is_alive(target) {
            Ok(())
        } else {
            Err(SessionError::TargetNotAlive(target))
        }
    }

    fn emit(&self, audience: Audience, event: GameEvent) {
        self.notifier.deliver(self.arena_id, audience, event);
    }

    fn touch(&mut self) {
        self.last_activity = TokioInstant::now();
    }
}

/// Spawns a new session actor task and returns a handle to it.
pub(crate) fn spawn_session<N: Notifier, S: GameStore>(
    session_id: SessionId,
    arena_id: ArenaId,
    config: SessionConfig,
    notifier: Arc<N>,
    store: Arc<S>,
) -> SessionHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);

    let actor = SessionActor {
        session_id,
        arena_id,
        config,
        phase: Phase::Lobby,
        round: 0,
        host: None,
        roster: Roster::new(),
        assignment_order: Vec::new(),
        night: NightActions::new(),
        tally: VoteTally::new(),
        round_had_action: false,
        night_was_silent: false,
        witch: WitchLedger::new(),
        lovers: None,
        last_activity: TokioInstant::now(),
        deadline: None,
        notifier,
        store,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    SessionHandle {
        session_id,
        arena_id,
        sender: tx,
    }
}
