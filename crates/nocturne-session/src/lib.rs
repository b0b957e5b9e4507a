//! Session layer for the Nocturne werewolf engine.
//!
//! Each game session runs as an isolated Tokio task (actor model) that
//! exclusively owns the roster, phase machine, round buffers, and the
//! session-lifetime sub-state. The outside world talks to it through a
//! cheap-to-clone [`SessionHandle`]; phase windows are driven by a
//! deadline inside the actor's `select!` loop, so submissions stream in
//! concurrently while the window timer pends.
//!
//! # Key types
//!
//! - [`SessionHandle`] — send commands to a running session actor
//! - [`SessionRegistry`] — creates sessions, enforces one per arena
//! - [`spawn_watchdog`] — periodic sweep ending idle sessions
//! - [`Notifier`] / [`GameStore`] — collaborator seams for messaging
//!   and persistence
//! - [`SessionConfig`] — player limits and window durations

mod config;
mod error;
mod hooks;
mod registry;
mod session;
mod watchdog;

pub use config::SessionConfig;
pub use error::{ErrorKind, SessionError};
pub use hooks::{GameOutcome, GameStore, Notifier, PlayerStanding};
pub use registry::SessionRegistry;
pub use session::{SessionHandle, SessionInfo};
pub use watchdog::spawn_watchdog;
