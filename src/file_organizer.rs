//! Directory tree organization.
//!
//! [`FileOrganizer::scan`] walks a root directory depth-first. Classified
//! files are moved (archives unpacked) into `<root>/<category>/` under their
//! normalized name, subdirectories are renamed to their normalized name once
//! their content has been handled, and empty directories are pruned at the
//! end. Per-entry failures end up as error codes in the returned
//! [`ScanResult`]; only a root that cannot be listed fails the whole scan.

use crate::config::ExclusionRules;
use crate::file_category::{Category, FileMapper};
use crate::normalize::normalize;
use crate::prune::prune;
use crate::relocate::relocate;
use crate::scan_result::{EntryRecord, ErrorCode, Group, Outcome, ScanResult};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a scan, or a branch of it.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The path to organize is missing or not a directory.
    #[error("invalid directory {}: {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: String },
    /// A directory could not be listed.
    #[error("failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Organizes a directory tree into category subdirectories.
#[derive(Debug, Clone, Default)]
pub struct FileOrganizer {
    mapper: FileMapper,
    exclusions: ExclusionRules,
}

impl FileOrganizer {
    pub fn new(exclusions: ExclusionRules) -> Self {
        Self {
            mapper: FileMapper::default(),
            exclusions,
        }
    }

    /// Organizes `directory` in place and reports what happened to each
    /// entry.
    ///
    /// A `directory` that is itself a symlink is not followed: a warning is
    /// logged and the result is empty. Pass the path with a trailing
    /// separator to organize the link target instead.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use clean_folder::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let result = FileOrganizer::default().scan(Path::new("/home/user/Downloads"));
    /// match result {
    ///     Ok(report) => println!("{} entries processed", report.len()),
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn scan(&self, directory: &Path) -> OrganizeResult<ScanResult> {
        let metadata =
            fs::symlink_metadata(directory).map_err(|e| OrganizeError::InvalidRoot {
                path: directory.to_path_buf(),
                reason: e.to_string(),
            })?;

        if metadata.file_type().is_symlink() {
            warn!(
                "{} is a symbolic link, which is not organized; add a trailing path separator to organize its target",
                directory.display()
            );
            return Ok(ScanResult::new());
        }
        if !metadata.is_dir() {
            return Err(OrganizeError::InvalidRoot {
                path: directory.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        let root = std::path::absolute(directory).map_err(|e| OrganizeError::InvalidRoot {
            path: directory.to_path_buf(),
            reason: e.to_string(),
        })?;

        info!("Organizing {}", root.display());
        let result = self.scan_at(directory, &root, 0)?;

        match prune(directory) {
            Ok(remaining) => debug!("{} entries left in {}", remaining, root.display()),
            Err(err) => warn!("Failed to prune {}: {}", root.display(), err),
        }

        info!(
            "Processed {} entries, {} failed",
            result.len(),
            result.failure_count()
        );
        Ok(result)
    }

    fn scan_at(&self, directory: &Path, root: &Path, depth: usize) -> OrganizeResult<ScanResult> {
        let entries = fs::read_dir(directory).map_err(|source| OrganizeError::ReadDir {
            path: directory.to_path_buf(),
            source,
        })?;

        let mut result = ScanResult::new();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable entry in {}: {}", directory.display(), err);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            if self.exclusions.is_excluded(&name) {
                debug!("Excluded {}", entry.path().display());
                continue;
            }

            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(err) => {
                    warn!("Cannot inspect {}: {}", entry.path().display(), err);
                    continue;
                }
            };
            let path = entry.path();

            if file_type.is_symlink() {
                result.push(Group::Symlinks, EntryRecord::inspected(path));
            } else if file_type.is_file() {
                let (category, record) = self.organize_file(path, &name, root);
                result.push(category, record);
            } else if file_type.is_dir() {
                // already organized output from a previous run
                if depth == 0 && Category::is_category_dir(&name) {
                    continue;
                }

                let nested = match self.scan_at(&path, root, depth + 1) {
                    Ok(nested) => nested,
                    Err(err) => {
                        warn!("{}; skipping this branch", err);
                        continue;
                    }
                };
                if nested.is_empty() {
                    continue;
                }
                result.merge(nested);

                if let Some(record) = rename_directory(path, &name) {
                    result.push(Group::Directories, record);
                }
            }
        }

        Ok(result)
    }

    /// Classifies one file and moves it to `<root>/<category>/<normalized>`.
    fn organize_file(&self, path: PathBuf, name: &str, root: &Path) -> (Category, EntryRecord) {
        let category = self.mapper.classify(name);
        if category == Category::Unknown {
            return (category, EntryRecord::inspected(path));
        }

        let new_path = root.join(category.dir_name()).join(normalize(name));
        let outcome = relocate(category, &path, &new_path);
        (category, EntryRecord::acted(path, outcome))
    }
}

/// Renames a directory to its normalized name within the same parent.
///
/// Returns `None` when the name is already normalized.
fn rename_directory(path: PathBuf, name: &str) -> Option<EntryRecord> {
    let normalized = normalize(name);
    if normalized == name {
        return None;
    }

    let new_path = path.with_file_name(&normalized);
    let outcome = if fs::symlink_metadata(&new_path).is_ok() {
        Outcome::Failed(ErrorCode::DirectoryExists)
    } else {
        match fs::rename(&path, &new_path) {
            Ok(()) => {
                debug!("Renamed {} to {}", path.display(), new_path.display());
                Outcome::Moved(new_path)
            }
            Err(err) => {
                warn!("Failed to rename {}: {}", path.display(), err);
                Outcome::Failed(ErrorCode::RenamingFailed)
            }
        }
    };

    Some(EntryRecord::acted(path, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn organize(root: &Path) -> ScanResult {
        FileOrganizer::default().scan(root).expect("scan")
    }

    #[test]
    fn test_scan_moves_classified_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("song.mp3"), "mp3").unwrap();
        fs::write(root.join("Звіт.pdf"), "pdf").unwrap();

        let result = organize(root);

        let root_abs = std::path::absolute(root).unwrap();
        assert!(root.join("audio").join("song.mp3").exists());
        assert!(root.join("documents").join("Zvit.pdf").exists());
        let docs = result.records(Category::Documents);
        assert_eq!(docs.len(), 1);
        assert_eq!(
            docs[0].outcome,
            Some(Outcome::Moved(root_abs.join("documents").join("Zvit.pdf")))
        );
    }

    #[test]
    fn test_scan_leaves_unknown_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();

        let result = organize(root);

        assert!(root.join("main.rs").exists());
        let unknown = result.records(Category::Unknown);
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].outcome, None);
    }

    #[test]
    fn test_scan_skips_category_directories_at_top_level() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("images")).unwrap();
        fs::write(root.join("images").join("Фото.jpg"), "jpg").unwrap();

        let result = organize(root);

        assert!(result.is_empty());
        assert!(root.join("images").join("Фото.jpg").exists());
    }

    #[test]
    fn test_scan_descends_into_nested_category_names() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("trip").join("images")).unwrap();
        fs::write(root.join("trip").join("images").join("a.png"), "png").unwrap();

        let result = organize(root);

        assert!(root.join("images").join("a.png").exists());
        assert_eq!(result.records(Category::Images).len(), 1);
        assert!(!root.join("trip").exists());
    }

    #[test]
    fn test_scan_renames_subdirectory_after_descent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("Мої файли")).unwrap();
        fs::write(root.join("Мої файли").join("readme"), "text").unwrap();

        let result = organize(root);

        assert!(root.join("Moii_faily").join("readme").exists());
        let dirs = result.records(Group::Directories);
        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].original_path, root.join("Мої файли"));
        assert_eq!(
            dirs[0].outcome,
            Some(Outcome::Moved(root.join("Moii_faily")))
        );
    }

    #[test]
    fn test_scan_directory_rename_collision() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("Дані")).unwrap();
        fs::write(root.join("Дані").join("keep"), "x").unwrap();
        fs::create_dir(root.join("Dani")).unwrap();
        fs::write(root.join("Dani").join("other"), "y").unwrap();

        let result = organize(root);

        let dirs = result.records(Group::Directories);
        assert_eq!(dirs.len(), 1);
        assert_eq!(
            dirs[0].outcome,
            Some(Outcome::Failed(ErrorCode::DirectoryExists))
        );
        assert!(root.join("Дані").join("keep").exists());
    }

    #[test]
    fn test_scan_empty_subdirectory_not_recorded_but_pruned() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("Порожньо")).unwrap();

        let result = organize(root);

        assert!(result.is_empty());
        assert!(!root.join("Порожньо").exists());
        assert!(!root.join("Porozhno").exists());
    }

    #[test]
    fn test_scan_file_collision_keeps_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("nested")).unwrap();
        fs::create_dir(root.join("logs")).unwrap();
        fs::write(root.join("logs").join("app.log"), "old").unwrap();
        fs::write(root.join("nested").join("app.log"), "new").unwrap();

        let result = organize(root);

        let logs = result.records(Category::Logs);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].outcome, Some(Outcome::Failed(ErrorCode::FileExists)));
        assert_eq!(
            fs::read_to_string(root.join("nested").join("app.log")).unwrap(),
            "new"
        );
        assert_eq!(
            fs::read_to_string(root.join("logs").join("app.log")).unwrap(),
            "old"
        );
    }

    #[test]
    fn test_scan_respects_exclusions() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("keep.jpg"), "jpg").unwrap();
        fs::write(root.join("move.jpg"), "jpg").unwrap();

        let config =
            crate::config::Config::from_toml("[scan.exclude]\nnames = [\"keep.jpg\"]\n").unwrap();
        let organizer = FileOrganizer::new(config.exclusions().unwrap());
        let result = organizer.scan(root).unwrap();

        assert!(root.join("keep.jpg").exists());
        assert!(root.join("images").join("move.jpg").exists());
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_scan_invalid_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert!(matches!(
            FileOrganizer::default().scan(&file),
            Err(OrganizeError::InvalidRoot { .. })
        ));
        assert!(matches!(
            FileOrganizer::default().scan(&temp_dir.path().join("missing")),
            Err(OrganizeError::InvalidRoot { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_symlink_root_is_not_followed() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.path().join("target");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("a.jpg"), "jpg").unwrap();
        let link = temp_dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let result = FileOrganizer::default().scan(&link).unwrap();

        assert!(result.is_empty());
        assert!(target.join("a.jpg").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_records_symlinks_without_following() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("root");
        let outside = temp_dir.path().join("outside");
        fs::create_dir(&root).unwrap();
        fs::create_dir(&outside).unwrap();
        fs::write(outside.join("b.png"), "png").unwrap();
        std::os::unix::fs::symlink(&outside, root.join("shortcut")).unwrap();

        let result = FileOrganizer::default().scan(&root).unwrap();

        let links = result.records(Group::Symlinks);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].original_path, root.join("shortcut"));
        assert_eq!(links[0].outcome, None);
        assert!(outside.join("b.png").exists());
    }
}
