//! File categorization by extension.
//!
//! The extension table is fixed: every known extension maps to one of the
//! category directories, anything else is [`Category::Unknown`] and stays
//! where it is.
//!
//! # Examples
//!
//! ```
//! use clean_folder::file_category::{Category, FileMapper};
//!
//! let mapper = FileMapper::default();
//! assert_eq!(mapper.classify("a.b.JPG"), Category::Images);
//! assert_eq!(mapper.classify("backup.tgz"), Category::Archives);
//! assert_eq!(mapper.classify("noext"), Category::Unknown);
//! ```

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Represents a file category.
///
/// Every category but [`Category::Unknown`] owns a directory under the
/// organized root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// AVI, MP4, MOV, MKV
    Video,
    /// JPEG, PNG, JPG, SVG
    Images,
    /// DOC, DOCX, TXT, PDF, XLSX, XLS, PPTX, PPT
    Documents,
    /// MP3, OGG, WAV, AMR
    Audio,
    /// ZIP, GZ, TAR, TGZ, TXZ, TBZ, RAR, BZ2, XZ, 7Z
    Archives,
    /// MSI
    Install,
    /// LOG
    Logs,
    /// TTF, WOFF, WOFF2
    Fonts,
    /// Anything else; left untouched.
    Unknown,
}

impl Category {
    /// Categories that own a directory, in report order.
    pub const ORGANIZED: [Category; 8] = [
        Category::Video,
        Category::Images,
        Category::Documents,
        Category::Audio,
        Category::Archives,
        Category::Install,
        Category::Logs,
        Category::Fonts,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use clean_folder::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "images");
    /// assert_eq!(Category::Install.dir_name(), "install");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Video => "video",
            Category::Images => "images",
            Category::Documents => "documents",
            Category::Audio => "audio",
            Category::Archives => "archives",
            Category::Install => "install",
            Category::Logs => "logs",
            Category::Fonts => "fonts",
            Category::Unknown => "unknown",
        }
    }

    /// True if `name` is exactly one of the category directory names.
    ///
    /// Comparison is case-sensitive; `unknown` never has a directory.
    pub fn is_category_dir(name: &str) -> bool {
        Self::ORGANIZED
            .iter()
            .any(|category| category.dir_name() == name)
    }
}

/// Maps file extensions to categories.
#[derive(Debug, Clone)]
pub struct FileMapper {
    extension_map: HashMap<String, Category>,
}

impl FileMapper {
    /// Creates a new `FileMapper` with the standard extension table.
    pub fn new() -> Self {
        let mut mapper = Self {
            extension_map: HashMap::new(),
        };
        mapper.populate_standard_mappings();
        mapper
    }

    fn populate_standard_mappings(&mut self) {
        self.add_extensions(&["jpeg", "png", "jpg", "svg"], Category::Images);
        self.add_extensions(&["avi", "mp4", "mov", "mkv"], Category::Video);
        self.add_extensions(
            &["doc", "docx", "txt", "pdf", "xlsx", "xls", "pptx", "ppt"],
            Category::Documents,
        );
        self.add_extensions(&["mp3", "ogg", "wav", "amr"], Category::Audio);
        self.add_extensions(
            &[
                "zip", "gz", "tar", "tgz", "txz", "tbz", "rar", "bz2", "xz", "7z",
            ],
            Category::Archives,
        );
        self.add_extensions(&["msi"], Category::Install);
        self.add_extensions(&["log"], Category::Logs);
        self.add_extensions(&["ttf", "woff", "woff2"], Category::Fonts);
    }

    fn add_extensions(&mut self, extensions: &[&str], category: Category) {
        for ext in extensions {
            self.extension_map.insert(ext.to_lowercase(), category);
        }
    }

    /// Maps a bare extension (no dot) to a category, case-insensitively.
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(&ext.to_lowercase()).copied()
    }

    /// Classifies a file name by the text after its last dot.
    ///
    /// Names without a dot, and unlisted extensions, are `Unknown`.
    pub fn classify(&self, file_name: &str) -> Category {
        file_name
            .rsplit_once('.')
            .and_then(|(_, ext)| self.extension_to_category(ext))
            .unwrap_or(Category::Unknown)
    }
}

impl Default for FileMapper {
    fn default() -> Self {
        Self::new()
    }
}

static STANDARD_MAPPER: Lazy<FileMapper> = Lazy::new(FileMapper::new);

/// Classifies `file_name` with the standard extension table.
pub fn classify(file_name: &str) -> Category {
    STANDARD_MAPPER.classify(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Video.dir_name(), "video");
        assert_eq!(Category::Images.dir_name(), "images");
        assert_eq!(Category::Documents.dir_name(), "documents");
        assert_eq!(Category::Audio.dir_name(), "audio");
        assert_eq!(Category::Archives.dir_name(), "archives");
        assert_eq!(Category::Install.dir_name(), "install");
        assert_eq!(Category::Logs.dir_name(), "logs");
        assert_eq!(Category::Fonts.dir_name(), "fonts");
    }

    #[test]
    fn test_classify_uses_last_extension() {
        assert_eq!(classify("a.b.JPG"), Category::Images);
        assert_eq!(classify("report.final.pdf"), Category::Documents);
        assert_eq!(classify("backup.tar.gz"), Category::Archives);
    }

    #[test]
    fn test_classify_without_extension() {
        assert_eq!(classify("noext"), Category::Unknown);
        assert_eq!(classify(""), Category::Unknown);
        assert_eq!(classify("trailing."), Category::Unknown);
    }

    #[test]
    fn test_classify_unlisted_extension() {
        assert_eq!(classify("main.rs"), Category::Unknown);
        assert_eq!(classify("photo.heic"), Category::Unknown);
    }

    #[test]
    fn test_classify_case_insensitive() {
        let mapper = FileMapper::default();
        assert_eq!(mapper.classify("Song.Mp3"), Category::Audio);
        assert_eq!(mapper.classify("SETUP.MSI"), Category::Install);
        assert_eq!(mapper.classify("font.WOFF2"), Category::Fonts);
        assert_eq!(mapper.classify("server.Log"), Category::Logs);
        assert_eq!(mapper.classify("clip.MkV"), Category::Video);
    }

    #[test]
    fn test_every_archive_extension() {
        let mapper = FileMapper::default();
        for ext in ["zip", "gz", "tar", "tgz", "txz", "tbz", "rar", "bz2", "xz", "7z"] {
            assert_eq!(
                mapper.extension_to_category(ext),
                Some(Category::Archives),
                "{ext} should be an archive"
            );
        }
    }

    #[test]
    fn test_is_category_dir() {
        assert!(Category::is_category_dir("images"));
        assert!(Category::is_category_dir("archives"));
        assert!(!Category::is_category_dir("Images"));
        assert!(!Category::is_category_dir("unknown"));
        assert!(!Category::is_category_dir("videos"));
    }
}
