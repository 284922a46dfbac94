//! Tree loader
//!
//! Drives a [`MediaLibrary`] to full materialization. The library populates
//! every collection asynchronously behind a two-phase pull, so the loader
//! runs a registration/wait state machine: it requests population of the
//! sources, the root group, and the media objects of every reachable group,
//! counts outstanding group populations, and blocks on the event channel
//! until the count reaches zero. Any stage failure halts the wait loop
//! immediately; no partial tree is ever returned.

use crate::core::library::{GroupKey, LibraryEvent, MediaLibrary};
use crate::core::tree::{GroupId, MediaTree};
use crate::error::{ExportError, Result};
use std::collections::HashMap;
use std::sync::mpsc;

pub struct Loader<L: MediaLibrary> {
    library: L,
    source_id: String,
}

impl<L: MediaLibrary> Loader<L> {
    /// `source_id` is the media source expected to hold the photo
    /// hierarchy; its absence from the library is a load failure.
    pub fn new<S: Into<String>>(library: L, source_id: S) -> Self {
        Self {
            library,
            source_id: source_id.into(),
        }
    }

    /// Materialize the full group tree. Blocks until every group's media
    /// objects have been populated or a stage fails.
    pub fn load(mut self) -> Result<MediaTree> {
        let (events_tx, events_rx) = mpsc::channel();
        self.library.subscribe(events_tx);

        log::debug!("Observe media sources of {}", self.library.name());
        // The first read begins an asynchronous load and returns nothing; a
        // value here signals an unexpected library implementation.
        if self.library.media_sources().is_some() {
            self.library.unsubscribe();
            return Err(ExportError::media_sources(self.library.name()));
        }

        let mut state = LoadState::new(&self.source_id);
        let outcome = loop {
            match events_rx.recv() {
                Ok(event) => match state.handle(&mut self.library, event) {
                    Ok(true) => break Ok(()),
                    Ok(false) => {}
                    Err(e) => break Err(e),
                },
                // All senders gone with work outstanding: the loop can no
                // longer advance.
                Err(mpsc::RecvError) => break Err(ExportError::LoopRunFailure),
            }
        };

        self.library.unsubscribe();
        outcome?;

        state.tree.ok_or(ExportError::LoopRunFailure)
    }
}

/// Wait-loop state: the tree under construction, the key-to-node mapping,
/// and the number of groups whose media objects are still being populated.
struct LoadState {
    source_id: String,
    pending: usize,
    tree: Option<MediaTree>,
    groups: HashMap<GroupKey, GroupId>,
}

impl LoadState {
    fn new(source_id: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            pending: 0,
            tree: None,
            groups: HashMap::new(),
        }
    }

    /// Advance the state machine by one event. Returns `Ok(true)` once the
    /// whole tree is materialized.
    fn handle<L: MediaLibrary>(&mut self, library: &mut L, event: LibraryEvent) -> Result<bool> {
        match event {
            LibraryEvent::MediaSourcesReady => {
                self.on_sources_ready(library)?;
                Ok(false)
            }
            LibraryEvent::RootGroupReady => {
                self.on_root_group_ready(library)?;
                Ok(false)
            }
            LibraryEvent::MediaObjectsReady(key) => self.on_media_objects_ready(library, &key),
        }
    }

    fn on_sources_ready<L: MediaLibrary>(&mut self, library: &mut L) -> Result<()> {
        let sources = library
            .media_sources()
            .ok_or_else(|| ExportError::media_sources(library.name()))?;
        if !sources.iter().any(|s| s == &self.source_id) {
            return Err(ExportError::photos_not_found(library.name()));
        }
        log::debug!("Done observing media sources of {}", library.name());

        log::debug!("Observe root media group of \"{}\"", self.source_id);
        // Same two-phase contract as the sources themselves.
        if library.root_group(&self.source_id).is_some() {
            return Err(ExportError::root_group(format!("\"{}\"", self.source_id)));
        }
        Ok(())
    }

    fn on_root_group_ready<L: MediaLibrary>(&mut self, library: &mut L) -> Result<()> {
        let root = library
            .root_group(&self.source_id)
            .ok_or_else(|| ExportError::root_group(format!("\"{}\"", self.source_id)))?;
        log::debug!("Done observing root media group of \"{}\"", self.source_id);

        let mut tree = MediaTree::new(root.name);
        let root_id = tree.root();
        self.groups.insert(root.key.clone(), root_id);
        self.prefetch(library, &mut tree, &root.key, root_id)?;
        self.tree = Some(tree);
        Ok(())
    }

    /// Request media-object population for a group, then recurse into its
    /// children. The pending counter is incremented before any child
    /// request so completion cannot be observed prematurely.
    fn prefetch<L: MediaLibrary>(
        &mut self,
        library: &mut L,
        tree: &mut MediaTree,
        key: &GroupKey,
        id: GroupId,
    ) -> Result<()> {
        self.pending += 1;

        let name = format!("\"{}\"", tree.node(id).name);
        log::debug!("Observe media objects of {}", name);
        if library.items(key).is_some() {
            return Err(ExportError::media_objects(name));
        }

        if let Some(children) = library.child_groups(key) {
            for child in children {
                let child_id = tree.add_group(id, child.name);
                self.groups.insert(child.key.clone(), child_id);
                self.prefetch(library, tree, &child.key, child_id)?;
            }
        }
        Ok(())
    }

    fn on_media_objects_ready<L: MediaLibrary>(
        &mut self,
        library: &mut L,
        key: &GroupKey,
    ) -> Result<bool> {
        let (tree, id) = match (self.tree.as_mut(), self.groups.get(key)) {
            (Some(tree), Some(id)) => (tree, *id),
            _ => return Err(ExportError::media_objects(format!("\"{}\"", key))),
        };

        let name = format!("\"{}\"", tree.node(id).name);
        let items = library
            .items(key)
            .ok_or_else(|| ExportError::media_objects(name.clone()))?;
        log::debug!("Done observing media objects of {}", name);

        tree.set_items(id, items);
        self.pending -= 1;
        Ok(self.pending == 0)
    }
}
