//! Recording stand-in for the remote note service, shared by unit tests.

use super::{NotePatch, NoteService, RemoteError, RemoteResult, StatusPatch, UserId};
use crate::domain::{Note, NoteDraft, NoteId, Tag};
use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};

fn at() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Failure {
    Network,
    Unauthorized,
}

/// In-memory stand-in for the remote note service.
///
/// Records every call, keeps its own copy of the notes, and can fail or run
/// a hook on demand.
pub(crate) struct MockService {
    pub(crate) server: RefCell<Vec<Note>>,
    calls: RefCell<Vec<String>>,
    failure: Cell<Option<Failure>>,
    hook: RefCell<Option<Box<dyn FnOnce()>>>,
    next_id: Cell<u64>,
}

impl MockService {
    pub(crate) fn new(notes: Vec<Note>) -> Self {
        Self {
            server: RefCell::new(notes),
            calls: RefCell::new(Vec::new()),
            failure: Cell::new(None),
            hook: RefCell::new(None),
            next_id: Cell::new(100),
        }
    }

    pub(crate) fn fail_with(&self, failure: Failure) {
        self.failure.set(Some(failure));
    }

    pub(crate) fn succeed(&self) {
        self.failure.set(None);
    }

    /// Runs `hook` while the next call is in flight.
    pub(crate) fn during_next_call(&self, hook: impl FnOnce() + 'static) {
        *self.hook.borrow_mut() = Some(Box::new(hook));
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> RemoteResult<()> {
        self.calls.borrow_mut().push(call);
        let hook = self.hook.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }
        match self.failure.get() {
            Some(Failure::Network) => Err(RemoteError::Network("connection refused".into())),
            Some(Failure::Unauthorized) => Err(RemoteError::Unauthorized),
            None => Ok(()),
        }
    }

    fn with_server_note(&self, id: &NoteId, f: impl FnOnce(&mut Note)) -> RemoteResult<Note> {
        let mut server = self.server.borrow_mut();
        let note = server
            .iter_mut()
            .find(|n| n.id() == id)
            .ok_or_else(|| RemoteError::Status {
                status: 404,
                message: "note not found".into(),
            })?;
        f(note);
        Ok(note.clone())
    }

    fn filtered(&self, keep: impl Fn(&Note) -> bool) -> Vec<Note> {
        self.server.borrow().iter().filter(|n| keep(n)).cloned().collect()
    }
}

impl NoteService for MockService {
    fn list_notes(&self, user_id: &UserId) -> RemoteResult<Vec<Note>> {
        self.record(format!("list_notes {user_id}"))?;
        Ok(self.server.borrow().clone())
    }

    fn create_note(&self, draft: &NoteDraft) -> RemoteResult<Note> {
        self.record(format!("create_note {}", draft.title()))?;
        let n = self.next_id.get();
        self.next_id.set(n + 1);
        let created = Note::builder(NoteId::from(n), draft.title(), at(), at())
            .content(draft.content())
            .tags(draft.tags().to_vec())
            .build();
        self.server.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn update_note(&self, id: &NoteId, patch: &NotePatch) -> RemoteResult<Note> {
        self.record(format!("update_note {id}"))?;
        self.with_server_note(id, |note| {
            if let Some(title) = &patch.title {
                note.set_title(title.as_str(), Utc::now());
            }
            if let Some(content) = &patch.content {
                note.set_content(content.as_str(), Utc::now());
            }
        })
    }

    fn delete_note(&self, id: &NoteId) -> RemoteResult<()> {
        self.record(format!("delete_note {id}"))?;
        self.server.borrow_mut().retain(|n| n.id() != id);
        Ok(())
    }

    fn update_status(&self, id: &NoteId, patch: &StatusPatch) -> RemoteResult<Note> {
        self.record(format!("update_status {id}"))?;
        self.with_server_note(id, |note| {
            if let Some(v) = patch.favorite {
                note.set_favorite(v);
            }
            if let Some(v) = patch.pinned {
                note.set_pinned(v);
            }
            if let Some(v) = patch.in_trash {
                note.set_in_trash(v);
            }
        })
    }

    fn create_tag(&self, id: &NoteId, tag: &Tag) -> RemoteResult<()> {
        self.record(format!("create_tag {id} {tag}"))
    }

    fn delete_tag(&self, id: &NoteId, tag: &Tag) -> RemoteResult<()> {
        self.record(format!("delete_tag {id} {tag}"))
    }

    fn create_attachment(&self, id: &NoteId, attachment: &str) -> RemoteResult<()> {
        self.record(format!("create_attachment {id} {attachment}"))
    }

    fn delete_attachment(&self, id: &NoteId, attachment: &str) -> RemoteResult<()> {
        self.record(format!("delete_attachment {id} {attachment}"))
    }

    fn favorite_notes(&self, user_id: &UserId) -> RemoteResult<Vec<Note>> {
        self.record(format!("favorite_notes {user_id}"))?;
        Ok(self.filtered(|n| n.favorite()))
    }

    fn tagged_notes(&self, user_id: &UserId) -> RemoteResult<Vec<Note>> {
        self.record(format!("tagged_notes {user_id}"))?;
        Ok(self.filtered(|n| !n.tags().is_empty()))
    }

    fn untagged_notes(&self, user_id: &UserId) -> RemoteResult<Vec<Note>> {
        self.record(format!("untagged_notes {user_id}"))?;
        Ok(self.filtered(|n| n.tags().is_empty()))
    }

    fn trashed_notes(&self, user_id: &UserId) -> RemoteResult<Vec<Note>> {
        self.record(format!("trashed_notes {user_id}"))?;
        Ok(self.filtered(Note::in_trash))
    }

    fn all_tags(&self, user_id: &UserId) -> RemoteResult<Vec<Tag>> {
        self.record(format!("all_tags {user_id}"))?;
        let mut tags: Vec<Tag> = Vec::new();
        for note in self.server.borrow().iter() {
            for t in note.tags() {
                if !tags.contains(t) {
                    tags.push(t.clone());
                }
            }
        }
        Ok(tags)
    }
}
