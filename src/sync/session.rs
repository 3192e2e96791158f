use super::{CancelHandle, Outcome, Scope, Sequencer, Strategy, SyncError, SyncResult, Ticket};
use crate::cache::LocalCache;
use crate::domain::{Filter, Note, NoteDraft, NoteId, Tag, validate_title};
use crate::remote::{NotePatch, NoteService, RemoteResult, StatusPatch, UserId};
use crate::store::{NoteStore, Snapshot};
use chrono::Utc;

/// A note store bound to a remote note service.
///
/// Every mutating intent goes through the service and is reconciled into
/// the store according to the session's [`Strategy`]. Operations on ids the
/// store does not hold return [`Outcome::NotFound`] without a remote call.
pub struct SyncSession<S, C> {
    store: NoteStore<C>,
    service: S,
    strategy: Strategy,
    user_id: Option<UserId>,
    sequencer: Sequencer,
    cancel: CancelHandle,
}

impl<S: NoteService, C: LocalCache> SyncSession<S, C> {
    pub fn new(store: NoteStore<C>, service: S) -> Self {
        Self {
            store,
            service,
            strategy: Strategy::default(),
            user_id: None,
            sequencer: Sequencer::new(),
            cancel: CancelHandle::new(),
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the user whose notes are listed. Without one, list operations
    /// fail with [`SyncError::Unauthorized`].
    pub fn with_user(mut self, user_id: Option<UserId>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn store(&self) -> &NoteStore<C> {
        &self.store
    }

    /// Mutable access for view-state setters and drafts, which never reach
    /// the remote.
    pub fn store_mut(&mut self) -> &mut NoteStore<C> {
        &mut self.store
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    /// Returns a handle sharing this session's request versions.
    pub fn sequencer(&self) -> Sequencer {
        self.sequencer.clone()
    }

    /// Returns a handle that cancels operations in flight.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    // ===========================================
    // Loading
    // ===========================================

    /// Replaces the note list with the user's notes from the server.
    pub fn refresh(&mut self) -> SyncResult<Outcome> {
        let user_id = self.require_user()?.clone();
        let ticket = self.sequencer.issue(Scope::List, &self.cancel);
        let result = self.service.list_notes(&user_id);
        self.settle("refresh", &ticket, result, None, |store, notes: Vec<Note>| {
            store.set_notes(notes);
            true
        })
    }

    /// Fetches a server-side filtered view without touching the store.
    pub fn fetch_view(&self, filter: &Filter) -> SyncResult<Vec<Note>> {
        let user_id = self.require_user()?;
        let mut notes = match filter {
            Filter::All => self.service.list_notes(user_id)?,
            Filter::Favorites => self.service.favorite_notes(user_id)?,
            Filter::Untagged => self.service.untagged_notes(user_id)?,
            Filter::Trash => self.service.trashed_notes(user_id)?,
            Filter::Tag(_) => self.service.tagged_notes(user_id)?,
        };
        notes.retain(|n| filter.matches(n));
        Ok(notes)
    }

    /// Fetches every tag the user has used, as the server reports it.
    pub fn remote_tags(&self) -> SyncResult<Vec<Tag>> {
        let user_id = self.require_user()?;
        Ok(self.service.all_tags(user_id)?)
    }

    // ===========================================
    // Creation
    // ===========================================

    /// Creates a note from a validated draft.
    ///
    /// Returns the id of the committed note, or `None` if the result was
    /// dropped because the session was cancelled or superseded.
    pub fn create(&mut self, draft: NoteDraft) -> SyncResult<Option<NoteId>> {
        let placeholder = draft.to_placeholder(Utc::now());
        let placeholder_id = placeholder.id().clone();
        let ticket = self
            .sequencer
            .issue(Scope::Note(placeholder_id.clone()), &self.cancel);

        let snapshot = self.optimistic(|store| store.add_note(placeholder));
        let result = self.service.create_note(&draft);

        let mut created = None;
        let outcome = self.settle("create", &ticket, result, snapshot, |store, note: Note| {
            created = Some(note.id().clone());
            if store.contains(&placeholder_id) {
                store.replace_note(&placeholder_id, note)
            } else {
                store.add_note(note);
                true
            }
        })?;
        Ok(created.filter(|_| outcome.is_applied()))
    }

    // ===========================================
    // Text edits
    // ===========================================

    /// Renames a note. An empty title is rejected before any remote call.
    pub fn rename(&mut self, id: &NoteId, title: &str) -> SyncResult<Outcome> {
        let title = validate_title(title)?.to_string();
        let patch = NotePatch::title(&title);
        self.run(
            "rename",
            id,
            |service| service.update_note(id, &patch),
            |store| {
                store.update_title(id, &title);
            },
            |store, note| {
                store.discard_title_draft(id);
                store.update_note(note)
            },
        )
    }

    /// Replaces a note's content.
    pub fn edit_content(&mut self, id: &NoteId, content: &str) -> SyncResult<Outcome> {
        let patch = NotePatch::content(content);
        self.run(
            "edit_content",
            id,
            |service| service.update_note(id, &patch),
            |store| {
                store.update_content(id, content);
            },
            |store, note| {
                store.discard_content_draft(id);
                store.update_note(note)
            },
        )
    }

    /// Pushes any saved drafts for the note and clears them on success.
    pub fn commit_drafts(&mut self, id: &NoteId) -> SyncResult<Outcome> {
        if !self.store.contains(id) {
            return Ok(skipped(id, "commit_drafts", Outcome::NotFound));
        }
        let title = match self.store.draft_title(id) {
            Some(title) => Some(validate_title(&title)?.to_string()),
            None => None,
        };
        let patch = NotePatch {
            title,
            content: self.store.draft_content(id),
            ..NotePatch::default()
        };
        if patch.is_empty() {
            return Ok(skipped(id, "commit_drafts", Outcome::Unchanged));
        }

        self.run(
            "commit_drafts",
            id,
            |service| service.update_note(id, &patch),
            |store| {
                if let Some(title) = &patch.title {
                    store.update_title(id, title);
                }
                if let Some(content) = &patch.content {
                    store.update_content(id, content);
                }
            },
            |store, note| {
                store.discard_drafts(id);
                store.update_note(note)
            },
        )
    }

    // ===========================================
    // Status flags
    // ===========================================

    pub fn toggle_favorite(&mut self, id: &NoteId) -> SyncResult<Outcome> {
        let Some(target) = self.store.note(id).map(|n| !n.favorite()) else {
            return Ok(skipped(id, "toggle_favorite", Outcome::NotFound));
        };
        self.set_status(
            "toggle_favorite",
            id,
            StatusPatch::favorite(target),
            |store, id| store.set_favorite(id, target),
        )
    }

    pub fn toggle_pin(&mut self, id: &NoteId) -> SyncResult<Outcome> {
        let Some(target) = self.store.note(id).map(|n| !n.pinned()) else {
            return Ok(skipped(id, "toggle_pin", Outcome::NotFound));
        };
        self.set_status(
            "toggle_pin",
            id,
            StatusPatch::pinned(target),
            |store, id| store.set_pinned(id, target),
        )
    }

    pub fn move_to_trash(&mut self, id: &NoteId) -> SyncResult<Outcome> {
        self.set_status(
            "move_to_trash",
            id,
            StatusPatch::in_trash(true),
            |store, id| store.move_note_to_trash(id),
        )
    }

    pub fn restore(&mut self, id: &NoteId) -> SyncResult<Outcome> {
        self.set_status(
            "restore",
            id,
            StatusPatch::in_trash(false),
            |store, id| store.restore_note(id),
        )
    }

    /// Deletes the note on the server and removes it locally.
    pub fn delete_permanently(&mut self, id: &NoteId) -> SyncResult<Outcome> {
        self.run(
            "delete_permanently",
            id,
            |service| service.delete_note(id),
            |store| {
                store.remove_note(id);
            },
            |store, ()| {
                store.remove_note(id);
                store.forget_note(id);
                true
            },
        )
    }

    // ===========================================
    // Tags and attachments
    // ===========================================

    /// Adds a tag. A tag the note already carries is left alone.
    pub fn add_tag(&mut self, id: &NoteId, tag: &Tag) -> SyncResult<Outcome> {
        match self.store.note(id) {
            None => return Ok(skipped(id, "add_tag", Outcome::NotFound)),
            Some(note) if note.has_tag(tag) => return Ok(skipped(id, "add_tag", Outcome::Unchanged)),
            Some(_) => {}
        }
        let add = |store: &mut NoteStore<C>| {
            store.note(id).is_some_and(|n| n.has_tag(tag)) || store.add_tag(id, tag.clone())
        };
        self.run(
            "add_tag",
            id,
            |service| service.create_tag(id, tag),
            |store| {
                add(store);
            },
            |store, ()| add(store),
        )
    }

    /// Removes a tag. A tag the note does not carry is left alone.
    pub fn delete_tag(&mut self, id: &NoteId, tag: &Tag) -> SyncResult<Outcome> {
        match self.store.note(id) {
            None => return Ok(skipped(id, "delete_tag", Outcome::NotFound)),
            Some(note) if !note.has_tag(tag) => {
                return Ok(skipped(id, "delete_tag", Outcome::Unchanged));
            }
            Some(_) => {}
        }
        self.run(
            "delete_tag",
            id,
            |service| service.delete_tag(id, tag),
            |store| {
                store.delete_tag(id, tag);
            },
            |store, ()| store.delete_tag(id, tag),
        )
    }

    pub fn add_attachment(&mut self, id: &NoteId, attachment: &str) -> SyncResult<Outcome> {
        match self.store.note(id) {
            None => return Ok(skipped(id, "add_attachment", Outcome::NotFound)),
            Some(note) if note.has_attachment(attachment) => {
                return Ok(skipped(id, "add_attachment", Outcome::Unchanged));
            }
            Some(_) => {}
        }
        let add = |store: &mut NoteStore<C>| {
            store.note(id).is_some_and(|n| n.has_attachment(attachment))
                || store.add_attachment(id, attachment)
        };
        self.run(
            "add_attachment",
            id,
            |service| service.create_attachment(id, attachment),
            |store| {
                add(store);
            },
            |store, ()| add(store),
        )
    }

    pub fn delete_attachment(&mut self, id: &NoteId, attachment: &str) -> SyncResult<Outcome> {
        match self.store.note(id) {
            None => return Ok(skipped(id, "delete_attachment", Outcome::NotFound)),
            Some(note) if !note.has_attachment(attachment) => {
                return Ok(skipped(id, "delete_attachment", Outcome::Unchanged));
            }
            Some(_) => {}
        }
        self.run(
            "delete_attachment",
            id,
            |service| service.delete_attachment(id, attachment),
            |store| {
                store.delete_attachment(id, attachment);
            },
            |store, ()| store.delete_attachment(id, attachment),
        )
    }

    // ===========================================
    // Internals
    // ===========================================

    fn require_user(&self) -> SyncResult<&UserId> {
        self.user_id.as_ref().ok_or(SyncError::Unauthorized)
    }

    /// Applies `change` now if the strategy is optimistic, returning the
    /// snapshot to roll back to.
    fn optimistic(&mut self, change: impl FnOnce(&mut NoteStore<C>)) -> Option<Snapshot> {
        match self.strategy {
            Strategy::Confirmed => None,
            Strategy::Optimistic => {
                let snapshot = self.store.snapshot();
                change(&mut self.store);
                Some(snapshot)
            }
        }
    }

    fn set_status(
        &mut self,
        op: &'static str,
        id: &NoteId,
        patch: StatusPatch,
        apply: impl Fn(&mut NoteStore<C>, &NoteId) -> bool,
    ) -> SyncResult<Outcome> {
        self.run(
            op,
            id,
            |service| service.update_status(id, &patch),
            |store| {
                apply(store, id);
            },
            |store, _confirmed: Note| apply(store, id),
        )
    }

    /// Runs one remote call for an existing note.
    ///
    /// `optimistic` is applied before the call under [`Strategy::Optimistic`];
    /// `confirm` is applied after a successful call under both strategies
    /// and must tolerate the optimistic change having already happened.
    fn run<T>(
        &mut self,
        op: &'static str,
        id: &NoteId,
        call: impl FnOnce(&S) -> RemoteResult<T>,
        optimistic: impl FnOnce(&mut NoteStore<C>),
        confirm: impl FnOnce(&mut NoteStore<C>, T) -> bool,
    ) -> SyncResult<Outcome> {
        if !self.store.contains(id) {
            return Ok(skipped(id, op, Outcome::NotFound));
        }
        let ticket = self.sequencer.issue(Scope::Note(id.clone()), &self.cancel);
        let snapshot = self.optimistic(optimistic);
        let result = call(&self.service);
        self.settle(op, &ticket, result, snapshot, confirm)
    }

    /// Reconciles a finished remote call into the store.
    fn settle<T>(
        &mut self,
        op: &'static str,
        ticket: &Ticket,
        result: RemoteResult<T>,
        snapshot: Option<Snapshot>,
        confirm: impl FnOnce(&mut NoteStore<C>, T) -> bool,
    ) -> SyncResult<Outcome> {
        if self.cancel.is_cancelled(ticket) {
            // A rejected optimistic change is reverted even after cancel,
            // unless a newer operation on the same scope owns the state now.
            if let (Err(err), Some(snapshot)) = (&result, snapshot)
                && self.sequencer.is_current(ticket)
            {
                tracing::warn!(op, %err, "remote call failed after cancel, rolling back");
                self.store.restore_snapshot(snapshot);
            }
            tracing::warn!(op, "session cancelled, dropping result");
            return Ok(Outcome::Cancelled);
        }
        if !self.sequencer.is_current(ticket) {
            tracing::warn!(op, version = ticket.version(), "superseded, dropping result");
            return Ok(Outcome::Stale);
        }

        match result {
            Ok(value) => {
                if confirm(&mut self.store, value) {
                    tracing::info!(op, "committed");
                    Ok(Outcome::Applied)
                } else {
                    Ok(Outcome::NotFound)
                }
            }
            Err(err) => {
                if let Some(snapshot) = snapshot {
                    tracing::warn!(op, %err, "remote call failed, rolling back");
                    self.store.restore_snapshot(snapshot);
                }
                Err(SyncError::from(err))
            }
        }
    }
}

fn skipped(id: &NoteId, op: &'static str, outcome: Outcome) -> Outcome {
    tracing::debug!(%id, op, %outcome, "skipping remote call");
    outcome
}
