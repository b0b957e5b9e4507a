//! # Nocturne
//!
//! Server-authoritative werewolf game engine.
//!
//! Nocturne runs the full arc of a social-deduction game: a lobby
//! fills, secret roles are dealt, Night and Day windows alternate on
//! fixed timers, and play continues until one faction wins or the
//! session is terminated. Each session is an isolated Tokio task; the
//! host application supplies two collaborators — a [`Notifier`] that
//! delivers events to players and a [`GameStore`] that persists rows —
//! and drives everything else through [`Engine`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nocturne::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), NocturneError> {
//!     let (notifier, mut events) = ChannelNotifier::new();
//!     let engine = Engine::builder()
//!         .build(Arc::new(notifier), Arc::new(MemoryStore::new()));
//!
//!     let session = engine.create_session(ArenaId(1)).await?;
//!     for id in 1..=5 {
//!         engine.join(session, PlayerId(id), format!("player-{id}")).await?;
//!     }
//!     engine.start_game(session, PlayerId(1)).await?;
//!
//!     while let Some(outbound) = events.recv().await {
//!         // fan outbound.event out to outbound.audience
//!     }
//!     Ok(())
//! }
//! ```

mod adapters;
mod engine;
mod error;

pub use adapters::{ChannelNotifier, MemoryStore, NullNotifier, NullStore, OutboundEvent};
pub use engine::{Engine, EngineBuilder};
pub use error::NocturneError;

pub use nocturne_protocol as protocol;
pub use nocturne_rules as rules;
pub use nocturne_session as session;

/// The commonly needed surface in one import.
pub mod prelude {
    pub use crate::{
        ChannelNotifier, Engine, EngineBuilder, MemoryStore, NocturneError, NullNotifier,
        NullStore, OutboundEvent,
    };
    pub use nocturne_protocol::{
        ArenaId, Audience, Faction, GameEvent, NightAction, Phase, PlayerId, Role, SessionId,
        SessionSnapshot, TerminationReason, WitchAction,
    };
    pub use nocturne_session::{
        GameOutcome, GameStore, Notifier, PlayerStanding, SessionConfig, SessionError,
    };
}
