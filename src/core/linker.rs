//! Mirror hierarchy of symlinks
//!
//! Builds the human-browsable tree under the export destination: one
//! directory per group, one symlink per exported file pointing at its
//! content-store entry. Link names prefer the item's display name, which is
//! not guaranteed unique within a group, so an existing link path is
//! resolved by injecting a random suffix rather than overwriting.

use crate::core::library::MediaItem;
use crate::core::store::Category;
use crate::error::Result;
use crate::platform::fs;
use crate::platform::fs::LinkError;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct Linker {
    destination: PathBuf,
}

impl Linker {
    pub fn new(destination: &Path) -> Self {
        Self {
            destination: destination.to_path_buf(),
        }
    }

    /// Canonical link path for an item within its group directory.
    ///
    /// The extension is taken from the source URL rather than the display
    /// name, so link and target share an extension even when the name has
    /// none or a different one.
    pub fn link_path(
        &self,
        group_path: &str,
        item: &MediaItem,
        category: Category,
        source: &Path,
    ) -> PathBuf {
        let mut name = item.stem();
        name.push_str(category.link_suffix());
        if let Some(ext) = source.extension() {
            name.push('.');
            name.push_str(&ext.to_string_lossy());
        }

        self.destination.join(group_path).join(name)
    }

    /// Create a symlink for `item` under `group_path` pointing at `stored`.
    ///
    /// A missing group directory is created and the link retried once. If
    /// the canonical link path is taken the link is created at an alternate
    /// path with a random unique suffix instead.
    pub fn link(
        &self,
        group_path: &str,
        item: &MediaItem,
        category: Category,
        source: &Path,
        stored: &Path,
    ) -> Result<()> {
        let target = self.link_path(group_path, item, category, source);

        match fs::symlink_noclobber(stored, &target) {
            Ok(()) => {
                log::debug!("Link: {} -> {}", stored.display(), target.display());
                Ok(())
            }
            Err(LinkError::ParentMissing) => {
                // link into freshly created group directory
                if let Some(dir) = target.parent() {
                    log::debug!("Link: {} does not exist", dir.display());
                    fs::create_dir_recursive(dir)?;
                    log::debug!("Link: {} created", dir.display());
                }
                fs::symlink_noclobber(stored, &target)
                    .map_err(|e| e.into_io())?;
                log::debug!("Link: {} -> {}", stored.display(), target.display());
                Ok(())
            }
            Err(LinkError::TargetExists) => {
                log::debug!("Link: {} already exists", target.display());
                let alt = alt_link_path(&target);
                fs::symlink_noclobber(stored, &alt).map_err(|e| e.into_io())?;
                log::debug!("Link: {} -> {}", stored.display(), alt.display());
                Ok(())
            }
            Err(LinkError::Io(e)) => Err(e.into()),
        }
    }
}

/// Alternate link path with a random unique segment injected before the
/// extension.
fn alt_link_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name = format!("{}-{}", stem, Uuid::new_v4());
    if let Some(ext) = path.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }

    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::tempdir;

    fn item(name: &str, id: &str) -> MediaItem {
        MediaItem {
            identifier: id.to_string(),
            name: Some(name.to_string()),
            original_url: None,
            current_url: None,
        }
    }

    #[test]
    fn test_link_path_uses_source_extension() {
        let linker = Linker::new(Path::new("/dest"));
        let path = linker.link_path(
            "Events/2020-01-01",
            &item("IMG_1.png", "abc123"),
            Category::Originals,
            Path::new("/lib/IMG_1.HEIC"),
        );
        assert_eq!(path, Path::new("/dest/Events/2020-01-01/IMG_1.HEIC"));
    }

    #[test]
    fn test_link_path_derivative_suffix() {
        let linker = Linker::new(Path::new("/dest"));
        let path = linker.link_path(
            "Events",
            &item("IMG_1.HEIC", "abc123"),
            Category::Derivatives,
            Path::new("/lib/IMG_1.JPG"),
        );
        assert_eq!(path, Path::new("/dest/Events/IMG_1-Derivative.JPG"));
    }

    #[test]
    fn test_link_creates_group_directory() {
        let temp = tempdir().unwrap();
        let stored = temp.path().join("stored.HEIC");
        stdfs::write(&stored, b"pixels").unwrap();

        let dest = temp.path().join("export");
        let linker = Linker::new(&dest);
        let it = item("IMG_1.HEIC", "abc123");
        linker
            .link("Events/2020-01-01", &it, Category::Originals, &stored, &stored)
            .unwrap();

        let link = dest.join("Events/2020-01-01/IMG_1.HEIC");
        assert_eq!(stdfs::read_link(&link).unwrap(), stored);
        assert_eq!(stdfs::read(&link).unwrap(), b"pixels");
    }

    #[test]
    fn test_link_collision_gets_alternate_name() {
        let temp = tempdir().unwrap();
        let first = temp.path().join("first.JPG");
        let second = temp.path().join("second.JPG");
        stdfs::write(&first, b"first").unwrap();
        stdfs::write(&second, b"second").unwrap();

        let dest = temp.path().join("export");
        let linker = Linker::new(&dest);
        let a = item("IMG.JPG", "aaa111");
        let b = item("IMG.JPG", "bbb222");
        linker.link("Group", &a, Category::Originals, &first, &first).unwrap();
        linker.link("Group", &b, Category::Originals, &second, &second).unwrap();

        let entries: Vec<_> = stdfs::read_dir(dest.join("Group"))
            .unwrap()
            .map(|e| e.unwrap())
            .collect();
        assert_eq!(entries.len(), 2);

        // The canonical name points at the first item's content; the
        // alternate name resolves to the second.
        let canonical = dest.join("Group/IMG.JPG");
        assert_eq!(stdfs::read(&canonical).unwrap(), b"first");

        let alt = entries
            .iter()
            .map(|e| e.path())
            .find(|p| *p != canonical)
            .unwrap();
        let alt_name = alt.file_name().unwrap().to_string_lossy().into_owned();
        assert!(alt_name.starts_with("IMG-"));
        assert!(alt_name.ends_with(".JPG"));
        assert_eq!(stdfs::read(&alt).unwrap(), b"second");
    }

    #[test]
    fn test_alt_link_path_keeps_extension() {
        let alt = alt_link_path(Path::new("/dest/Group/IMG.JPG"));
        let name = alt.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("IMG-"));
        assert!(name.ends_with(".JPG"));
        assert_eq!(alt.parent().unwrap(), Path::new("/dest/Group"));
    }
}
