//! Unified error type for the Nocturne engine.

use nocturne_rules::{AssignError, NightActionError, VoteError};
use nocturne_session::SessionError;

/// Top-level error that wraps the crate-specific errors.
///
/// When using the `nocturne` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate. The
/// `#[from]` attribute on each variant auto-generates `From` impls, so
/// the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum NocturneError {
    /// A session-level error (lobby, phase, host, lifecycle).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A role-assignment error (roster too small).
    #[error(transparent)]
    Assign(#[from] AssignError),

    /// A night-buffer error (duplicates, spent witch charges).
    #[error(transparent)]
    Night(#[from] NightActionError),

    /// A ballot error (vote already cast).
    #[error(transparent)]
    Vote(#[from] VoteError),
}
