//! Export orchestrator
//!
//! Walks a materialized [`MediaTree`] depth-first and drives the content
//! store and hierarchy linker for every leaf item. Groups with children are
//! pure containers; their own items are never exported.

use crate::core::library::MediaItem;
use crate::core::linker::Linker;
use crate::core::store::{Category, ContentStore};
use crate::core::tree::{GroupId, MediaTree};
use crate::error::{ExportError, Result};
use crate::platform::fs;
use std::path::{Path, PathBuf};

pub struct Exporter {
    destination: PathBuf,
    store: ContentStore,
    linker: Linker,
}

impl Exporter {
    pub fn new(destination: &Path) -> Self {
        Self {
            store: ContentStore::new(destination),
            linker: Linker::new(destination),
            destination: destination.to_path_buf(),
        }
    }

    /// Export the whole tree under the destination path.
    ///
    /// The destination must not exist; it is created fresh so a re-run into
    /// the same path fails before anything is written.
    pub fn export(&self, tree: &MediaTree) -> Result<()> {
        if fs::exists(&self.destination) {
            return Err(ExportError::DestinationExists(self.destination.clone()));
        }
        fs::create_dir_recursive(&self.destination)?;

        self.export_group(tree, tree.root())
    }

    fn export_group(&self, tree: &MediaTree, id: GroupId) -> Result<()> {
        let node = tree.node(id);

        // Recursively export child groups if there are any. A container
        // group's own items are unreachable by design.
        if !node.children.is_empty() {
            for &child in &node.children {
                self.export_group(tree, child)?;
            }
            return Ok(());
        }

        if node.items.is_empty() {
            log::warn!("No media objects in \"{}\"", node.name);
            return Ok(());
        }

        let path = tree.group_path(id);
        for item in &node.items {
            self.export_item(item, &path)?;
        }
        Ok(())
    }

    /// Export one item: the original file always (when present), the
    /// derivative only when it differs from the original.
    fn export_item(&self, item: &MediaItem, group_path: &str) -> Result<()> {
        if let Some(url) = &item.original_url {
            let stored = self.store.store(Category::Originals, &item.identifier, url)?;
            self.linker
                .link(group_path, item, Category::Originals, url, &stored)?;
        }
        if let Some(url) = item.derivative_url() {
            let stored = self
                .store
                .store(Category::Derivatives, &item.identifier, url)?;
            self.linker
                .link(group_path, item, Category::Derivatives, url, &stored)?;
        }
        Ok(())
    }
}
