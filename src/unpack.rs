//! Archive unpacking.
//!
//! Relocating an archive means expanding it: `archives/photos.tar.gz` becomes
//! the directory `archives/photos/` holding the archive's entries, and the
//! source archive is removed once extraction succeeded. Single-file streams
//! (`.gz`, `.bz2`, `.xz` without `.tar`) decompress into a file named after
//! the directory, so `data.gz` becomes `data/data`.

use crate::scan_result::ErrorCode;
use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use xz2::read::XzDecoder;

/// Outer suffixes that may wrap a tar archive.
const STREAM_EXTENSIONS: [&str; 3] = ["GZ", "BZ2", "XZ"];

/// Causes of a failed extraction. They are logged, then reported to the
/// caller as [`ErrorCode::RenamingFailed`].
#[derive(Debug, Error)]
pub enum UnpackError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("zip extraction failed: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("7z extraction failed: {0}")]
    SevenZ(#[from] sevenz_rust::Error),
    #[error("unsupported archive format .{0}")]
    Unsupported(String),
    #[error("content is {found}, but the extension says {expected}")]
    FormatMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// An archive file name split into its stem and effective extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveName<'a> {
    /// Name with the effective extension removed.
    pub stem: &'a str,
    /// Upper-cased extension without the leading dot, e.g. `TAR.GZ`.
    pub extension: String,
}

impl<'a> ArchiveName<'a> {
    /// Splits `file_name` at its effective extension.
    ///
    /// A stream suffix directly preceded by `.tar` is taken together with it.
    /// Returns `None` when there is no extension, or nothing is left of the
    /// name once it is removed.
    pub fn parse(file_name: &'a str) -> Option<Self> {
        let (base, outer) = file_name.rsplit_once('.')?;
        if outer.is_empty() {
            return None;
        }
        let outer = outer.to_ascii_uppercase();

        let (stem, extension) = match base.rsplit_once('.') {
            Some((inner_base, inner))
                if inner.eq_ignore_ascii_case("tar")
                    && STREAM_EXTENSIONS.contains(&outer.as_str()) =>
            {
                (inner_base, format!("TAR.{outer}"))
            }
            _ => (base, outer),
        };

        if stem.is_empty() {
            return None;
        }
        Some(Self { stem, extension })
    }
}

/// Archive formats with an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
    TarBz2,
    TarXz,
    SevenZ,
    Gzip,
    Bzip2,
    Xz,
}

impl ArchiveFormat {
    /// Resolves an effective extension as produced by [`ArchiveName::parse`].
    pub fn from_extension(extension: &str) -> Option<Self> {
        let format = match extension {
            "ZIP" => ArchiveFormat::Zip,
            "TAR" => ArchiveFormat::Tar,
            "TAR.GZ" | "TGZ" => ArchiveFormat::TarGz,
            "TAR.BZ2" | "TBZ" => ArchiveFormat::TarBz2,
            "TAR.XZ" | "TXZ" => ArchiveFormat::TarXz,
            "7Z" => ArchiveFormat::SevenZ,
            "GZ" => ArchiveFormat::Gzip,
            "BZ2" => ArchiveFormat::Bzip2,
            "XZ" => ArchiveFormat::Xz,
            _ => return None,
        };
        Some(format)
    }

    /// Single compressed payload rather than a container of entries.
    pub fn is_stream(&self) -> bool {
        matches!(
            self,
            ArchiveFormat::Gzip | ArchiveFormat::Bzip2 | ArchiveFormat::Xz
        )
    }

    /// MIME type `infer` reports for the outermost layer of this format.
    fn outer_mime(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "application/zip",
            ArchiveFormat::Tar => "application/x-tar",
            ArchiveFormat::TarGz | ArchiveFormat::Gzip => "application/gzip",
            ArchiveFormat::TarBz2 | ArchiveFormat::Bzip2 => "application/x-bzip2",
            ArchiveFormat::TarXz | ArchiveFormat::Xz => "application/x-xz",
            ArchiveFormat::SevenZ => "application/x-7z-compressed",
        }
    }

    /// Rejects sources whose content is clearly another kind of archive.
    /// Unrecognized content is let through to the decoder.
    fn check_content(&self, source: &Path) -> Result<(), UnpackError> {
        if let Some(kind) = infer::get_from_path(source)?
            && kind.matcher_type() == infer::MatcherType::Archive
            && kind.mime_type() != self.outer_mime()
        {
            return Err(UnpackError::FormatMismatch {
                expected: self.outer_mime(),
                found: kind.mime_type(),
            });
        }
        Ok(())
    }

    /// Extracts `source` into the existing directory `destination`.
    fn extract(&self, source: &Path, destination: &Path) -> Result<(), UnpackError> {
        match self {
            ArchiveFormat::Zip => {
                let mut archive = zip::ZipArchive::new(open(source)?)?;
                archive.extract(destination)?;
            }
            ArchiveFormat::Tar => tar::Archive::new(open(source)?).unpack(destination)?,
            ArchiveFormat::TarGz => {
                tar::Archive::new(MultiGzDecoder::new(open(source)?)).unpack(destination)?
            }
            ArchiveFormat::TarBz2 => {
                tar::Archive::new(MultiBzDecoder::new(open(source)?)).unpack(destination)?
            }
            ArchiveFormat::TarXz => {
                tar::Archive::new(XzDecoder::new_multi_decoder(open(source)?))
                    .unpack(destination)?
            }
            ArchiveFormat::SevenZ => sevenz_rust::decompress_file(source, destination)?,
            ArchiveFormat::Gzip => write_stream(MultiGzDecoder::new(open(source)?), destination)?,
            ArchiveFormat::Bzip2 => write_stream(MultiBzDecoder::new(open(source)?), destination)?,
            ArchiveFormat::Xz => {
                write_stream(XzDecoder::new_multi_decoder(open(source)?), destination)?
            }
        }
        Ok(())
    }
}

fn open(path: &Path) -> io::Result<BufReader<File>> {
    File::open(path).map(BufReader::new)
}

/// Decompresses a single-file stream into `destination/<destination name>`.
fn write_stream(mut reader: impl Read, destination: &Path) -> io::Result<()> {
    let payload_name = destination.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "destination directory has no name",
        )
    })?;
    let mut payload = File::create(destination.join(payload_name))?;
    io::copy(&mut reader, &mut payload)?;
    Ok(())
}

/// Directory an archive at `target` would be expanded into, together with
/// its effective extension.
pub fn destination_dir(target: &Path) -> Option<(PathBuf, String)> {
    let file_name = target.file_name()?.to_str()?;
    let name = ArchiveName::parse(file_name)?;
    Some((target.with_file_name(name.stem), name.extension))
}

/// Expands `source` at the location named by `target` and removes `source`.
///
/// `target` is the normalized path the archive would have been moved to; its
/// effective extension is stripped to name the destination directory, which
/// is returned on success.
///
/// # Errors
///
/// * [`ErrorCode::ArchiveWithoutExtension`] - no extension on `target`;
///   nothing touched
/// * [`ErrorCode::DirectoryExists`] - the destination already exists;
///   nothing touched
/// * [`ErrorCode::RenamingFailed`] - creating directories, decoding or
///   removing the source failed; directories created so far are kept and the
///   source is only removed after a complete extraction
pub fn unpack(source: &Path, target: &Path) -> Result<PathBuf, ErrorCode> {
    let Some((destination, extension)) = destination_dir(target) else {
        return Err(ErrorCode::ArchiveWithoutExtension);
    };

    if fs::symlink_metadata(&destination).is_ok() {
        return Err(ErrorCode::DirectoryExists);
    }

    match expand(source, &destination, &extension) {
        Ok(()) => {
            debug!(
                "Unpacked {} into {}",
                source.display(),
                destination.display()
            );
            Ok(destination)
        }
        Err(err) => {
            warn!("Failed to unpack {}: {}", source.display(), err);
            Err(ErrorCode::RenamingFailed)
        }
    }
}

fn expand(source: &Path, destination: &Path, extension: &str) -> Result<(), UnpackError> {
    if let Some(group_dir) = destination.parent()
        && !group_dir.exists()
    {
        fs::create_dir(group_dir)?;
    }
    fs::create_dir(destination)?;

    let format = ArchiveFormat::from_extension(extension)
        .ok_or_else(|| UnpackError::Unsupported(extension.to_lowercase()))?;
    format.check_content(source)?;
    format.extract(source, destination)?;

    fs::remove_file(source)?;
    Ok(())
}
