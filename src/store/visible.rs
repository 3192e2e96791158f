//! Computes the displayed note list: filter, search, then sort.

use super::ViewState;
use crate::domain::{Note, SortKey, SortOrder};
use std::cmp::Ordering;

/// Returns the notes to display for the given view.
///
/// 1. Keep notes matching the current filter.
/// 2. With a non-empty search, notes whose title contains it
///    (case-insensitive) come first; the rest follow rather than being
///    dropped.
/// 3. Within each group, order by the sort key and direction. The sort is
///    stable, so equal keys keep their canonical list order.
///
/// Titles compare by their Unicode lowercase form, with the exact title as
/// the tie-break. This is not a locale-aware collation: accented letters
/// order by code point, not by language rules.
pub fn visible_notes<'a>(notes: &'a [Note], view: &ViewState) -> Vec<&'a Note> {
    let needle = view.search().trim().to_lowercase();

    let mut decorated: Vec<(bool, String, &Note)> = notes
        .iter()
        .filter(|n| view.filter().matches(n))
        .map(|n| {
            let lower = n.title().to_lowercase();
            let miss = !needle.is_empty() && !lower.contains(&needle);
            (miss, lower, n)
        })
        .collect();

    decorated.sort_by(|(miss_a, lower_a, a), (miss_b, lower_b, b)| {
        miss_a.cmp(miss_b).then_with(|| {
            let ord = match view.sort_key() {
                SortKey::Title => lower_a.cmp(lower_b).then_with(|| a.title().cmp(b.title())),
                SortKey::CreatedAt => a.created_at().cmp(&b.created_at()),
                SortKey::ModifiedAt => a.modified_at().cmp(&b.modified_at()),
            };
            apply_order(ord, view.sort_order())
        })
    });

    decorated.into_iter().map(|(_, _, n)| n).collect()
}

fn apply_order(ord: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Ascending => ord,
        SortOrder::Descending => ord.reverse(),
    }
}

/// Returns true if the note's title matches the search (case-insensitive).
pub fn title_matches(note: &Note, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    needle.is_empty() || note.title().to_lowercase().contains(&needle)
}
