//! Shared vocabulary for the Nocturne werewolf engine.
//!
//! Everything the engine, its collaborators (dispatcher, notification
//! transport, persistence), and its tests need to agree on lives here:
//!
//! - [`PlayerId`] / [`ArenaId`] / [`SessionId`] — identity newtypes
//! - [`Role`] / [`Faction`] / [`Phase`] — the closed game vocabulary
//! - [`NightAction`] / [`WitchAction`] — secret per-role submissions
//! - [`GameEvent`] / [`Audience`] — what the engine tells the outside world
//! - [`SessionSnapshot`] — the read-only view served to renderers
//!
//! All types are serde-serializable; the JSON shapes are pinned by tests
//! because the outer dispatcher renders them for players.

mod action;
mod event;
mod types;

pub use action::{NightAction, WitchAction};
pub use event::{
    Audience, GameEvent, PlayerReveal, PlayerView, SessionSnapshot, TerminationReason,
};
pub use types::{ArenaId, Faction, Phase, PlayerId, Role, SessionId};
