//! clean-folder - sort a messy directory tree
//!
//! Files are classified by extension and moved into category directories
//! under the root, names are made filesystem-safe (Cyrillic is
//! transliterated), archives are expanded in place of being moved, and
//! directories left empty are removed.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod prune;
pub mod relocate;
pub mod scan_result;
pub mod unpack;

pub use config::{Config, ConfigError, ExclusionRules};
pub use file_category::{Category, FileMapper, classify};
pub use file_organizer::{FileOrganizer, OrganizeError};
pub use normalize::normalize;
pub use prune::prune;
pub use relocate::relocate;
pub use scan_result::{EntryRecord, ErrorCode, Group, Outcome, ScanResult};
pub use unpack::unpack;

pub use cli::{Cli, run_cli};
