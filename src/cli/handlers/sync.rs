//! Sync command handler.

use anyhow::{Context, Result};

use crate::cache::LocalCache;
use crate::remote::NoteService;
use crate::sync::{Outcome, SyncSession};

pub fn handle_sync<S: NoteService, C: LocalCache>(session: &mut SyncSession<S, C>) -> Result<()> {
    let outcome = session.refresh().context("failed to fetch notes")?;
    match outcome {
        Outcome::Applied => {
            let counts = session.store().counts();
            println!(
                "Synced {} notes ({} in trash)",
                counts.note_count(),
                counts.trash_count()
            );
        }
        other => eprintln!("Sync result was dropped ({})", other),
    }
    Ok(())
}
