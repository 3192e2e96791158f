//! Note store: the canonical note list, view state, and the reducer
//! operations that move notes between filters.
//!
//! Every operation that changes the note list ends in [`NoteStore::commit`],
//! which recomputes the derived counts and writes the full list through to
//! the local cache. Operations on an unknown id are no-ops and return
//! `false`; none of them fail.

mod counts;
mod view;
mod visible;

pub use counts::{NoteCounts, TagWithCount};
pub use view::ViewState;
pub use visible::{title_matches, visible_notes};

use crate::cache::{self, LocalCache};
use crate::domain::{Filter, Note, NoteId, SortKey, SortOrder, Tag};
use chrono::Utc;

/// Copy of the note list and selection taken before an optimistic change.
#[derive(Debug, Clone)]
pub struct Snapshot {
    notes: Vec<Note>,
    selected: Option<NoteId>,
}

/// The reducer core.
///
/// Owns the canonical ordered note list and the cache it mirrors to. The
/// store is an explicit instance: callers pass it (or the session wrapping
/// it) to whatever needs it.
pub struct NoteStore<C> {
    notes: Vec<Note>,
    view: ViewState,
    counts: NoteCounts,
    cache: C,
}

impl<C: LocalCache> NoteStore<C> {
    /// Creates an empty store over `cache` without reading it.
    pub fn new(cache: C) -> Self {
        Self {
            notes: Vec::new(),
            view: ViewState::default(),
            counts: NoteCounts::default(),
            cache,
        }
    }

    /// Creates a store loaded from the cached note list, if any.
    ///
    /// An unreadable cache entry yields an empty store.
    pub fn hydrate(cache: C) -> Self {
        let mut store = Self::new(cache);
        match store.cache.get_json::<Vec<Note>>(cache::NOTES) {
            Ok(Some(notes)) => {
                store.notes = dedup_by_id(notes);
                store.counts = NoteCounts::from_notes(&store.notes);
                tracing::debug!(count = store.notes.len(), "hydrated notes from cache");
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(%err, "ignoring unreadable cached note list"),
        }
        store
    }

    // ===========================================
    // Accessors
    // ===========================================

    /// Returns the canonical note list.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Returns the note with the given id.
    pub fn note(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id() == id)
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.note(id).is_some()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Returns the counts derived from the current note list.
    pub fn counts(&self) -> &NoteCounts {
        &self.counts
    }

    /// Returns the distinct tags across active notes.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.counts.tags().iter().map(TagWithCount::tag)
    }

    /// Returns the notes to display for the current view.
    pub fn visible(&self) -> Vec<&Note> {
        visible_notes(&self.notes, &self.view)
    }

    /// Returns the selected note, resolved against the canonical list.
    pub fn selected_note(&self) -> Option<&Note> {
        self.view.selected.as_ref().and_then(|id| self.note(id))
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }

    pub fn into_cache(self) -> C {
        self.cache
    }

    // ===========================================
    // List Reducers
    // ===========================================

    /// Replaces the entire note list.
    ///
    /// Duplicate ids keep their first occurrence.
    pub fn set_notes(&mut self, notes: Vec<Note>) {
        self.notes = dedup_by_id(notes);
        self.commit();
    }

    /// Appends a note.
    ///
    /// If a note with the same id already exists it is replaced in place, so
    /// ids stay unique.
    pub fn add_note(&mut self, note: Note) {
        match self.position(note.id()) {
            Some(index) => {
                tracing::debug!(id = %note.id(), "add_note on existing id, replacing");
                self.notes[index] = note;
            }
            None => self.notes.push(note),
        }
        self.commit();
    }

    /// Replaces the note with the matching id. No-op if not found.
    pub fn update_note(&mut self, note: Note) -> bool {
        let Some(index) = self.position(note.id()) else {
            return self.missing(note.id(), "update_note");
        };
        self.notes[index] = note;
        self.commit();
        true
    }

    /// Replaces the note `old_id` with `note`, keeping its list position.
    ///
    /// Used to swap a client placeholder for the server-confirmed note.
    pub fn replace_note(&mut self, old_id: &NoteId, note: Note) -> bool {
        let Some(mut index) = self.position(old_id) else {
            return self.missing(old_id, "replace_note");
        };
        let new_id = note.id().clone();
        // The new id may already be present if a refresh landed first.
        if &new_id != old_id
            && let Some(dup) = self.position(&new_id)
        {
            self.notes.remove(dup);
            if dup < index {
                index -= 1;
            }
        }
        self.notes[index] = note;
        if self.view.selected.as_ref() == Some(old_id) {
            self.view.selected = Some(new_id);
        }
        self.commit();
        true
    }

    pub fn update_title(&mut self, id: &NoteId, title: &str) -> bool {
        self.modify(id, "update_title", |note| note.set_title(title, Utc::now()))
    }

    pub fn update_content(&mut self, id: &NoteId, content: &str) -> bool {
        self.modify(id, "update_content", |note| {
            note.set_content(content, Utc::now())
        })
    }

    /// Flips `pinned`, then moves pinned notes ahead of unpinned ones.
    pub fn toggle_pin(&mut self, id: &NoteId) -> bool {
        match self.note(id) {
            Some(note) => {
                let pinned = !note.pinned();
                self.set_pinned(id, pinned)
            }
            None => self.missing(id, "toggle_pin"),
        }
    }

    /// Flips `favorite`, then moves favorites ahead of the rest.
    pub fn toggle_favorite(&mut self, id: &NoteId) -> bool {
        match self.note(id) {
            Some(note) => {
                let favorite = !note.favorite();
                self.set_favorite(id, favorite)
            }
            None => self.missing(id, "toggle_favorite"),
        }
    }

    /// Sets `pinned` to a known value and reorders pinned-first.
    ///
    /// The reorder is a stable partition of the current list.
    pub fn set_pinned(&mut self, id: &NoteId, pinned: bool) -> bool {
        let Some(index) = self.position(id) else {
            return self.missing(id, "set_pinned");
        };
        self.notes[index].set_pinned(pinned);
        self.notes.sort_by_key(|n| !n.pinned());
        self.commit();
        true
    }

    /// Sets `favorite` to a known value and reorders favorites-first.
    pub fn set_favorite(&mut self, id: &NoteId, favorite: bool) -> bool {
        let Some(index) = self.position(id) else {
            return self.missing(id, "set_favorite");
        };
        self.notes[index].set_favorite(favorite);
        self.notes.sort_by_key(|n| !n.favorite());
        self.commit();
        true
    }

    /// Appends a tag to the note.
    ///
    /// Duplicates are not filtered here; callers check [`Note::has_tag`].
    pub fn add_tag(&mut self, id: &NoteId, tag: Tag) -> bool {
        self.modify(id, "add_tag", |note| note.push_tag(tag, Utc::now()))
    }

    /// Removes every occurrence of `tag` from the note.
    ///
    /// The tag disappears from the global list once no active note uses it.
    pub fn delete_tag(&mut self, id: &NoteId, tag: &Tag) -> bool {
        self.modify(id, "delete_tag", |note| {
            note.remove_tag(tag, Utc::now());
        })
    }

    pub fn add_attachment(&mut self, id: &NoteId, attachment: &str) -> bool {
        self.modify(id, "add_attachment", |note| {
            note.push_attachment(attachment, Utc::now())
        })
    }

    pub fn delete_attachment(&mut self, id: &NoteId, attachment: &str) -> bool {
        self.modify(id, "delete_attachment", |note| {
            note.remove_attachment(attachment, Utc::now());
        })
    }

    /// Moves the note to the trash. Other flags and tags are kept.
    pub fn move_note_to_trash(&mut self, id: &NoteId) -> bool {
        self.modify(id, "move_note_to_trash", |note| note.set_in_trash(true))
    }

    /// Takes the note out of the trash.
    pub fn restore_note(&mut self, id: &NoteId) -> bool {
        self.modify(id, "restore_note", |note| note.set_in_trash(false))
    }

    /// Removes the note entirely, along with its drafts and selection.
    ///
    /// Idempotent: a second call with the same id is a no-op.
    pub fn delete_note_permanently(&mut self, id: &NoteId) -> bool {
        if !self.remove_note(id) {
            return false;
        }
        self.forget_note(id);
        true
    }

    /// Removes the note from the list only. Its drafts and the selection
    /// stay until [`forget_note`](Self::forget_note).
    pub fn remove_note(&mut self, id: &NoteId) -> bool {
        let Some(index) = self.position(id) else {
            return self.missing(id, "remove_note");
        };
        self.notes.remove(index);
        self.commit();
        true
    }

    /// Drops the drafts of a note and deselects it.
    pub fn forget_note(&mut self, id: &NoteId) {
        if self.view.selected.as_ref() == Some(id) {
            self.view.selected = None;
        }
        self.discard_drafts(id);
    }

    // ===========================================
    // View Setters (no cache side effect)
    // ===========================================

    pub fn set_current_filter(&mut self, filter: Filter) {
        self.view.filter = filter;
    }

    pub fn set_selected_sort(&mut self, key: SortKey) {
        self.view.sort_key = key;
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.view.sort_order = order;
    }

    /// Flips the sort icon; the icon being on means ascending.
    pub fn toggle_icon(&mut self) {
        self.view.icon_toggle = !self.view.icon_toggle;
        self.view.sort_order = if self.view.icon_toggle {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        };
    }

    pub fn set_search_value(&mut self, search: impl Into<String>) {
        self.view.search = search.into();
    }

    pub fn clear_search(&mut self) {
        self.view.search.clear();
    }

    /// Selects a note by id, or clears the selection with `None`.
    pub fn set_selected_note(&mut self, id: Option<NoteId>) {
        self.view.selected = id;
    }

    // ===========================================
    // Drafts
    // ===========================================

    /// Stores an unsaved content edit for the note.
    pub fn save_draft_content(&mut self, id: &NoteId, content: &str) {
        if let Err(err) = self.cache.set(&cache::draft_content_key(id), content) {
            tracing::warn!(%err, %id, "failed to save content draft");
        }
    }

    /// Stores an unsaved title edit for the note.
    pub fn save_draft_title(&mut self, id: &NoteId, title: &str) {
        if let Err(err) = self.cache.set(&cache::draft_title_key(id), title) {
            tracing::warn!(%err, %id, "failed to save title draft");
        }
    }

    pub fn draft_content(&self, id: &NoteId) -> Option<String> {
        self.read_draft(&cache::draft_content_key(id))
    }

    pub fn draft_title(&self, id: &NoteId) -> Option<String> {
        self.read_draft(&cache::draft_title_key(id))
    }

    /// Drops both drafts for the note.
    pub fn discard_drafts(&mut self, id: &NoteId) {
        self.discard_content_draft(id);
        self.discard_title_draft(id);
    }

    pub fn discard_content_draft(&mut self, id: &NoteId) {
        self.remove_draft(&cache::draft_content_key(id));
    }

    pub fn discard_title_draft(&mut self, id: &NoteId) {
        self.remove_draft(&cache::draft_title_key(id));
    }

    /// Returns the note's content with any draft override applied.
    pub fn effective_content(&self, note: &Note) -> String {
        self.draft_content(note.id())
            .unwrap_or_else(|| note.content().to_string())
    }

    /// Returns the note's title with any draft override applied.
    pub fn effective_title(&self, note: &Note) -> String {
        self.draft_title(note.id())
            .unwrap_or_else(|| note.title().to_string())
    }

    // ===========================================
    // Snapshots
    // ===========================================

    /// Captures the note list and selection for a later rollback.
    ///
    /// Drafts are not captured; optimistic changes must leave them alone.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            notes: self.notes.clone(),
            selected: self.view.selected.clone(),
        }
    }

    /// Restores a previously captured note list and selection.
    pub fn restore_snapshot(&mut self, snapshot: Snapshot) {
        self.notes = snapshot.notes;
        self.view.selected = snapshot.selected;
        self.commit();
    }

    // ===========================================
    // Internals
    // ===========================================

    fn position(&self, id: &NoteId) -> Option<usize> {
        self.notes.iter().position(|n| n.id() == id)
    }

    fn modify(&mut self, id: &NoteId, op: &'static str, f: impl FnOnce(&mut Note)) -> bool {
        let Some(index) = self.position(id) else {
            return self.missing(id, op);
        };
        f(&mut self.notes[index]);
        self.commit();
        true
    }

    fn missing(&self, id: &NoteId, op: &'static str) -> bool {
        tracing::debug!(%id, op, "note not found, ignoring");
        false
    }

    fn read_draft(&self, key: &str) -> Option<String> {
        match self.cache.get(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%err, key, "failed to read draft");
                None
            }
        }
    }

    fn remove_draft(&mut self, key: &str) {
        if let Err(err) = self.cache.remove(key) {
            tracing::warn!(%err, key, "failed to discard draft");
        }
    }

    /// Recomputes derived counts and mirrors the list to the cache.
    ///
    /// A failed cache write is logged; the in-memory list stays
    /// authoritative.
    fn commit(&mut self) {
        self.counts = NoteCounts::from_notes(&self.notes);
        if let Err(err) = self.cache.set_json(cache::NOTES, &self.notes) {
            tracing::warn!(%err, "failed to mirror notes to local cache");
        }
    }
}

/// Keeps the first note for each id.
fn dedup_by_id(notes: Vec<Note>) -> Vec<Note> {
    let mut result: Vec<Note> = Vec::with_capacity(notes.len());
    for note in notes {
        if result.iter().any(|n| n.id() == note.id()) {
            tracing::warn!(id = %note.id(), "dropping duplicate note id");
            continue;
        }
        result.push(note);
    }
    result
}
