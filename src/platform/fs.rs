//! Filesystem primitives with no-clobber semantics
//!
//! The export pipeline needs to distinguish the recoverable failure modes of
//! a copy or link (destination taken, parent directory missing, source gone)
//! from fatal I/O errors. Plain `std::fs::copy` overwrites silently and
//! folds all of these into one error, so the primitives live here.

use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::Path;

/// Failure modes of [`copy_noclobber`].
#[derive(Debug)]
pub enum CopyError {
    /// The source file does not exist.
    SourceMissing,
    /// A file already exists at the destination.
    DestinationExists,
    /// The destination's parent directory does not exist.
    ParentMissing,
    Io(io::Error),
}

/// Failure modes of [`symlink_noclobber`].
#[derive(Debug)]
pub enum LinkError {
    /// A file or link already exists at the link path.
    TargetExists,
    /// The link's parent directory does not exist.
    ParentMissing,
    Io(io::Error),
}

impl CopyError {
    pub fn into_io(self) -> io::Error {
        match self {
            CopyError::SourceMissing => {
                io::Error::new(ErrorKind::NotFound, "copy source does not exist")
            }
            CopyError::DestinationExists => {
                io::Error::new(ErrorKind::AlreadyExists, "copy destination already exists")
            }
            CopyError::ParentMissing => {
                io::Error::new(ErrorKind::NotFound, "copy destination directory does not exist")
            }
            CopyError::Io(e) => e,
        }
    }
}

impl LinkError {
    pub fn into_io(self) -> io::Error {
        match self {
            LinkError::TargetExists => {
                io::Error::new(ErrorKind::AlreadyExists, "link target already exists")
            }
            LinkError::ParentMissing => {
                io::Error::new(ErrorKind::NotFound, "link directory does not exist")
            }
            LinkError::Io(e) => e,
        }
    }
}

/// Whether anything (file, directory or dangling symlink) exists at `path`.
pub fn exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Create `path` and all missing parent directories.
pub fn create_dir_recursive(path: &Path) -> io::Result<()> {
    std::fs::create_dir_all(path)
}

/// Copy `src` to `dst`, failing if `dst` already exists.
///
/// The source is opened first so a missing source is reported as
/// `SourceMissing` rather than being confused with a missing destination
/// directory.
pub fn copy_noclobber(src: &Path, dst: &Path) -> Result<(), CopyError> {
    let mut reader = match File::open(src) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(CopyError::SourceMissing),
        Err(e) => return Err(CopyError::Io(e)),
    };

    let mut writer = match OpenOptions::new().write(true).create_new(true).open(dst) {
        Ok(f) => f,
        Err(e) => {
            return Err(match e.kind() {
                ErrorKind::AlreadyExists => CopyError::DestinationExists,
                ErrorKind::NotFound => CopyError::ParentMissing,
                _ => CopyError::Io(e),
            })
        }
    };

    io::copy(&mut reader, &mut writer).map_err(CopyError::Io)?;
    Ok(())
}

/// Create a symlink at `link` pointing to `original`, failing if `link`
/// already exists.
pub fn symlink_noclobber(original: &Path, link: &Path) -> Result<(), LinkError> {
    match std::os::unix::fs::symlink(original, link) {
        Ok(()) => Ok(()),
        Err(e) => Err(match e.kind() {
            ErrorKind::AlreadyExists => LinkError::TargetExists,
            ErrorKind::NotFound => LinkError::ParentMissing,
            _ => LinkError::Io(e),
        }),
    }
}
