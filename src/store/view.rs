//! View state: filter, sort, search and selection.

use crate::domain::{Filter, NoteId, SortKey, SortOrder};

/// UI-facing state derived from user intents; never sent to the remote.
///
/// The selection is held as an id and resolved against the canonical note
/// list on access, so it always reflects the committed note.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub(crate) filter: Filter,
    pub(crate) sort_key: SortKey,
    pub(crate) sort_order: SortOrder,
    pub(crate) icon_toggle: bool,
    pub(crate) search: String,
    pub(crate) selected: Option<NoteId>,
}

impl ViewState {
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// State of the sort-direction icon.
    pub fn icon_toggle(&self) -> bool {
        self.icon_toggle
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn selected(&self) -> Option<&NoteId> {
        self.selected.as_ref()
    }
}
