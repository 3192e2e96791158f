//! Per-note request sequencing and session cancellation.

use crate::domain::NoteId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// What a ticket is sequenced against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The full note list (refresh).
    List,
    /// A single note.
    Note(NoteId),
}

/// Proof of issue order for one in-flight operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    scope: Scope,
    version: u64,
    generation: u64,
}

impl Ticket {
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Hands out monotonically increasing versions per scope.
///
/// Only the most recently issued ticket for a scope may commit. Clones
/// share state, so a handle can be given to whatever issues competing
/// operations.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    versions: Arc<Mutex<HashMap<Scope, u64>>>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next ticket for `scope`, superseding earlier ones.
    pub fn issue(&self, scope: Scope, cancel: &CancelHandle) -> Ticket {
        let mut versions = self.versions.lock().unwrap_or_else(PoisonError::into_inner);
        let version = versions.entry(scope.clone()).or_insert(0);
        *version += 1;
        Ticket {
            scope,
            version: *version,
            generation: cancel.generation(),
        }
    }

    /// Returns true if no newer ticket has been issued for the scope.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        let versions = self.versions.lock().unwrap_or_else(PoisonError::into_inner);
        versions.get(&ticket.scope).copied() == Some(ticket.version)
    }
}

/// Cancels in-flight operations when a view is torn down.
///
/// Cancelling bumps a generation counter; tickets issued before the bump
/// are treated as cancelled. Operations started afterwards run normally.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    generation: Arc<AtomicU64>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Returns true if the handle was cancelled after `ticket` was issued.
    pub fn is_cancelled(&self, ticket: &Ticket) -> bool {
        ticket.generation != self.generation()
    }
}
