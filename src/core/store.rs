//! Content-addressed file store
//!
//! Each unique underlying file is copied exactly once into a flat store
//! sharded by the first character of the item identifier:
//!
//! ```text
//! <destination>/Originals/<c>/<identifier>.<ext>
//! <destination>/Derivatives/<c>/<identifier>.<ext>
//! ```
//!
//! Storing is idempotent per `(category, identifier)`: if the stored file
//! already exists the copy is skipped and assumed identical, since many
//! media items can refer to a single file.

use crate::error::Result;
use crate::platform::fs;
use crate::platform::fs::CopyError;
use std::path::{Path, PathBuf};

/// Which of the two store subtrees a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Originals,
    Derivatives,
}

impl Category {
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Originals => "Originals",
            Category::Derivatives => "Derivatives",
        }
    }

    /// Suffix appended to link names of this category.
    pub fn link_suffix(self) -> &'static str {
        match self {
            Category::Originals => "",
            Category::Derivatives => "-Derivative",
        }
    }
}

/// Sharded, identifier-keyed file storage under the export destination.
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub fn new(destination: &Path) -> Self {
        Self {
            root: destination.to_path_buf(),
        }
    }

    /// Stored path for an identifier. The shard directory is the first
    /// character of the identifier, bounding directory fan-out; the
    /// extension comes from the source URL.
    pub fn stored_path(&self, category: Category, identifier: &str, source: &Path) -> PathBuf {
        let shard = identifier
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_default();

        let mut file_name = identifier.to_string();
        if let Some(ext) = source.extension() {
            file_name.push('.');
            file_name.push_str(&ext.to_string_lossy());
        }

        self.root
            .join(category.dir_name())
            .join(shard)
            .join(file_name)
    }

    /// Copy `source` into the store and return the stored path.
    ///
    /// A missing shard directory is created and the copy retried once. An
    /// already stored file is success without copying. A missing source
    /// file is a non-fatal skip; the stored path is still returned so the
    /// caller can link against a copy made by an earlier item.
    pub fn store(&self, category: Category, identifier: &str, source: &Path) -> Result<PathBuf> {
        let stored = self.stored_path(category, identifier, source);

        match fs::copy_noclobber(source, &stored) {
            Ok(()) => {
                log::debug!("Copy: {} -> {}", source.display(), stored.display());
            }
            Err(CopyError::DestinationExists) => {
                log::debug!("Copy: {} already exists", stored.display());
            }
            Err(CopyError::SourceMissing) => {
                log::warn!("Copy: {} does not exist", source.display());
            }
            Err(CopyError::ParentMissing) => {
                self.retry_into_created_dir(&stored, source)?;
            }
            Err(CopyError::Io(e)) => return Err(e.into()),
        }

        Ok(stored)
    }

    /// Create the missing shard directory and try the copy again.
    fn retry_into_created_dir(&self, stored: &Path, source: &Path) -> Result<()> {
        // stored always has a parent under the store root
        if let Some(dir) = stored.parent() {
            log::debug!("Copy: {} does not exist", dir.display());
            fs::create_dir_recursive(dir)?;
            log::debug!("Copy: {} created", dir.display());
        }

        match fs::copy_noclobber(source, stored) {
            Ok(()) => {
                log::debug!("Copy: {} -> {}", source.display(), stored.display());
                Ok(())
            }
            Err(CopyError::DestinationExists) => {
                log::debug!("Copy: {} already exists", stored.display());
                Ok(())
            }
            Err(CopyError::SourceMissing) => {
                log::warn!("Copy: {} does not exist", source.display());
                Ok(())
            }
            Err(e) => Err(e.into_io().into()),
        }
    }
}
