//! Pure game rules for the Nocturne werewolf engine.
//!
//! Everything in this crate is synchronous and free of I/O so every rule
//! is unit-testable in isolation. The concurrency layer
//! (`nocturne-session`) owns the clocks and channels and calls in here
//! at window close.
//!
//! # Key types
//!
//! - [`role_pool`] / [`assign_roles`] — roster size → role multiset, and
//!   the shuffle-zip assignment
//! - [`Roster`] — join-ordered players with alive bookkeeping
//! - [`NightActions`] — the round-scoped action buffer
//! - [`WitchLedger`] / [`LoverLink`] — session-lifetime sub-state that
//!   survives round rollover
//! - [`resolve_night`] — deterministic death resolution
//! - [`VoteTally`] — day-phase plurality vote
//! - [`evaluate_win`] — win condition check after every elimination

mod error;
mod night;
mod pool;
mod resolve;
mod roster;
mod tally;
mod win;

pub use error::{AssignError, NightActionError, VoteError};
pub use night::{LoverLink, NightActions, WitchLedger};
pub use pool::{MAX_PLAYERS, MIN_PLAYERS, assign_roles, role_pool};
pub use resolve::{NightOutcome, chain_lovers, resolve_night};
pub use roster::{PlayerRecord, Roster};
pub use tally::{VoteTally, plurality};
pub use win::{WinState, evaluate_win};
