//! Moving a classified file into its category directory.

use crate::file_category::Category;
use crate::scan_result::ErrorCode;
use crate::unpack::unpack;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Moves `current_path` to `new_path`, or expands it there if it is an
/// archive, and returns where the entry ended up.
///
/// Archives end up as a directory named after the archive (see
/// [`unpack`]); every other category ends up at `new_path` itself. Only the
/// immediate parent of `new_path` is created when missing.
///
/// # Errors
///
/// * [`ErrorCode::EmptyValue`] - an empty path, or `Unknown` category
/// * [`ErrorCode::FileExists`] - something already exists at `new_path`
/// * [`ErrorCode::RenamingFailed`] - the move itself failed
/// * any code [`unpack`] returns for archives
pub fn relocate(
    category: Category,
    current_path: &Path,
    new_path: &Path,
) -> Result<PathBuf, ErrorCode> {
    if category == Category::Unknown
        || current_path.as_os_str().is_empty()
        || new_path.as_os_str().is_empty()
    {
        return Err(ErrorCode::EmptyValue);
    }

    if fs::symlink_metadata(new_path).is_ok() {
        return Err(ErrorCode::FileExists);
    }

    if category == Category::Archives {
        return unpack(current_path, new_path);
    }

    match move_file(current_path, new_path) {
        Ok(()) => {
            debug!("Moved {} to {}", current_path.display(), new_path.display());
            Ok(new_path.to_path_buf())
        }
        Err(err) => {
            warn!(
                "Failed to move {} to {}: {}",
                current_path.display(),
                new_path.display(),
                err
            );
            Err(ErrorCode::RenamingFailed)
        }
    }
}

fn move_file(current_path: &Path, new_path: &Path) -> io::Result<()> {
    if let Some(category_dir) = new_path.parent()
        && !category_dir.exists()
    {
        fs::create_dir(category_dir)?;
    }
    fs::rename(current_path, new_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_relocate_creates_category_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let file_path = base_path.join("test.txt");
        fs::write(&file_path, "test content").expect("Failed to write test file");
        let new_path = base_path.join("documents").join("test.txt");

        let moved = relocate(Category::Documents, &file_path, &new_path).expect("relocate");

        assert_eq!(moved, new_path);
        assert!(base_path.join("documents").is_dir());
        assert!(!file_path.exists());
        assert_eq!(fs::read_to_string(&new_path).unwrap(), "test content");
    }

    #[test]
    fn test_relocate_uses_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("images")).unwrap();
        let file_path = base_path.join("Фото.png");
        fs::write(&file_path, "png").unwrap();
        let new_path = base_path.join("images").join("Foto.png");

        relocate(Category::Images, &file_path, &new_path).expect("relocate");

        assert!(new_path.exists());
        assert!(!file_path.exists());
    }

    #[test]
    fn test_relocate_onto_existing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("documents")).unwrap();
        let file_path = base_path.join("notes.txt");
        let existing = base_path.join("documents").join("notes.txt");
        fs::write(&file_path, "new").unwrap();
        fs::write(&existing, "old").unwrap();

        assert_eq!(
            relocate(Category::Documents, &file_path, &existing),
            Err(ErrorCode::FileExists)
        );
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new");
        assert_eq!(fs::read_to_string(&existing).unwrap(), "old");
    }

    #[test]
    fn test_relocate_empty_values() {
        let path = Path::new("/tmp/a.txt");
        assert_eq!(
            relocate(Category::Documents, Path::new(""), path),
            Err(ErrorCode::EmptyValue)
        );
        assert_eq!(
            relocate(Category::Documents, path, Path::new("")),
            Err(ErrorCode::EmptyValue)
        );
        assert_eq!(
            relocate(Category::Unknown, path, path),
            Err(ErrorCode::EmptyValue)
        );
    }

    #[test]
    fn test_relocate_does_not_create_deep_hierarchy() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("song.mp3");
        fs::write(&file_path, "mp3").unwrap();
        let new_path = temp_dir.path().join("missing").join("audio").join("song.mp3");

        assert_eq!(
            relocate(Category::Audio, &file_path, &new_path),
            Err(ErrorCode::RenamingFailed)
        );
        assert!(file_path.exists());
    }

    #[test]
    fn test_relocate_missing_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let new_path = temp_dir.path().join("logs").join("gone.log");

        assert_eq!(
            relocate(Category::Logs, &temp_dir.path().join("gone.log"), &new_path),
            Err(ErrorCode::RenamingFailed)
        );
    }
}
