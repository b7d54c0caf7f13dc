//! Scan result model.
//!
//! A scan produces one [`EntryRecord`] per visited filesystem object, filed
//! under a [`Group`]: either the category a file was classified into, or one
//! of the synthetic `directories` / `symlinks` groups used for reporting.

use crate::file_category::Category;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Per-entry failure carried in a record instead of a resulting path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Moving, renaming or unpacking failed.
    RenamingFailed,
    /// A file already exists at the destination.
    FileExists,
    /// A directory (or any other object) already exists at the destination.
    DirectoryExists,
    /// A required argument was empty.
    EmptyValue,
    /// The archive name carries no extension to strip.
    ArchiveWithoutExtension,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::RenamingFailed => "RENAMING_FAILED",
            ErrorCode::FileExists => "FILE_EXISTS",
            ErrorCode::DirectoryExists => "DIRECTORY_EXISTS",
            ErrorCode::EmptyValue => "EMPTY_VALUE",
            ErrorCode::ArchiveWithoutExtension => "ARCHIVE_WITHOUT_EXTENSION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to an entry an action was attempted on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The entry now lives at this path.
    Moved(PathBuf),
    /// The action failed; the entry was left where it was.
    Failed(ErrorCode),
}

impl From<Result<PathBuf, ErrorCode>> for Outcome {
    fn from(result: Result<PathBuf, ErrorCode>) -> Self {
        match result {
            Ok(path) => Outcome::Moved(path),
            Err(code) => Outcome::Failed(code),
        }
    }
}

/// A single visited filesystem object.
///
/// `outcome` is `None` for entries that were only inspected (unknown files,
/// symlinks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRecord {
    pub original_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl EntryRecord {
    /// Record for an entry that was looked at but left alone.
    pub fn inspected(original_path: impl Into<PathBuf>) -> Self {
        Self {
            original_path: original_path.into(),
            outcome: None,
        }
    }

    /// Record for an entry a move, rename or unpack was attempted on.
    pub fn acted(original_path: impl Into<PathBuf>, outcome: impl Into<Outcome>) -> Self {
        Self {
            original_path: original_path.into(),
            outcome: Some(outcome.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Some(Outcome::Failed(_)))
    }
}

/// Key under which records are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    Category(Category),
    Directories,
    Symlinks,
}

impl Group {
    pub fn label(&self) -> &'static str {
        match self {
            Group::Category(category) => category.dir_name(),
            Group::Directories => "directories",
            Group::Symlinks => "symlinks",
        }
    }
}

impl From<Category> for Group {
    fn from(category: Category) -> Self {
        Group::Category(category)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Records of one traversal, grouped and kept in insertion order per group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    groups: BTreeMap<Group, Vec<EntryRecord>>,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, group: impl Into<Group>, record: EntryRecord) {
        self.groups.entry(group.into()).or_default().push(record);
    }

    /// Appends every group of `other` after the records already held here.
    pub fn merge(&mut self, other: ScanResult) {
        for (group, records) in other.groups {
            self.groups.entry(group).or_default().extend(records);
        }
    }

    /// Records filed under `group`, empty if the group never appeared.
    pub fn records(&self, group: impl Into<Group>) -> &[EntryRecord] {
        self.groups
            .get(&group.into())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Finds the record of a given original path in any group.
    pub fn find(&self, original_path: &Path) -> Option<(Group, &EntryRecord)> {
        self.iter().find_map(|(group, records)| {
            records
                .iter()
                .find(|record| record.original_path == original_path)
                .map(|record| (group, record))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (Group, &[EntryRecord])> {
        self.groups
            .iter()
            .map(|(group, records)| (*group, records.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of records across all groups.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn failure_count(&self) -> usize {
        self.groups
            .values()
            .flatten()
            .filter(|record| record.is_failure())
            .count()
    }
}

impl Serialize for ScanResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (group, records) in &self.groups {
            map.serialize_entry(group.label(), records)?;
        }
        map.end()
    }
}
