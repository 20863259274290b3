use std::path::PathBuf;

use anyhow::{Context, Result};

use tally_core::export::entries_to_csv;
use tally_core::store::DataStore;

pub(crate) fn cmd_export(store: &DataStore, output: Option<PathBuf>) -> Result<()> {
    let entries = store.all_cached_entries()?;
    let csv = entries_to_csv(&entries)?;

    match output {
        Some(path) => {
            std::fs::write(&path, csv)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Exported {} entries to {}", entries.len(), path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}
