//! Bottom-up removal of empty directories.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Removes every empty directory below `directory`, deepest first, and
/// returns the number of entries left directly inside `directory`.
///
/// A directory whose only content was empty directories becomes empty
/// itself and is removed as well. `directory` itself is never removed.
/// Symlinks are counted, never followed. Removal failures are logged and
/// the directory keeps counting as an entry.
///
/// # Errors
///
/// Returns an error only if `directory` itself cannot be listed. Unreadable
/// subdirectories are logged and kept.
pub fn prune(directory: &Path) -> io::Result<usize> {
    let mut remaining = 0;

    for entry in fs::read_dir(directory)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry in {}: {}", directory.display(), err);
                remaining += 1;
                continue;
            }
        };
        remaining += 1;

        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }

        let path = entry.path();
        match prune(&path) {
            Ok(0) => match fs::remove_dir(&path) {
                Ok(()) => {
                    debug!("Removed empty directory {}", path.display());
                    remaining -= 1;
                }
                Err(err) => warn!("Failed to remove {}: {}", path.display(), err),
            },
            Ok(_) => {}
            Err(err) => warn!("Failed to list {}: {}", path.display(), err),
        }
    }

    Ok(remaining)
}
