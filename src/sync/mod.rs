//! Sync orchestration: bridges user intents to the remote note service and
//! reconciles the results into the [`NoteStore`](crate::store::NoteStore).

mod sequence;
mod session;

pub use sequence::{CancelHandle, Scope, Sequencer, Ticket};
pub use session::SyncSession;

use crate::domain::ParseNoteError;
use crate::remote::RemoteError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors surfaced to the user by a sync operation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote call failed: transport error or non-2xx status.
    #[error("remote call failed: {0}")]
    Network(#[source] RemoteError),

    /// The server rejected the credentials, or no session is stored.
    #[error("not signed in or session expired")]
    Unauthorized,

    /// The request was invalid and was not sent.
    #[error(transparent)]
    Validation(#[from] ParseNoteError),
}

impl From<RemoteError> for SyncError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Unauthorized => Self::Unauthorized,
            other => Self::Network(other),
        }
    }
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// What a sync operation did to the local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The change was confirmed and committed.
    Applied,
    /// Nothing to do; no remote call was made.
    Unchanged,
    /// The note id is not in the store; no remote call was made.
    NotFound,
    /// A newer operation on the same note superseded this one; its result
    /// was dropped.
    Stale,
    /// The session was cancelled while the call was in flight; its result
    /// was dropped.
    Cancelled,
}

impl Outcome {
    /// Returns true if the local state now reflects the operation.
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Applied => "applied",
            Self::Unchanged => "unchanged",
            Self::NotFound => "not found",
            Self::Stale => "superseded",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// When local state is committed relative to the remote call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Call the remote first; commit only on success.
    #[default]
    Confirmed,
    /// Commit first; restore the prior snapshot if the remote call fails.
    Optimistic,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed => f.write_str("confirmed"),
            Self::Optimistic => f.write_str("optimistic"),
        }
    }
}

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Clone)]
pub struct ParseStrategyError(String);

impl fmt::Display for ParseStrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid strategy '{}': expected 'confirmed' or 'optimistic'",
            self.0
        )
    }
}

impl std::error::Error for ParseStrategyError {}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "confirmed" | "safe" => Ok(Self::Confirmed),
            "optimistic" => Ok(Self::Optimistic),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}
