//! Folder-backed media library
//!
//! A [`MediaLibrary`] over a plain directory tree: nested directories are
//! groups, regular files are items. A sibling file named
//! `<stem>.edited.<ext>` is treated as the edited derivative of
//! `<stem>.<ext>`. Item identifiers are derived from the library-relative
//! path, so they are stable across reads within a run.
//!
//! The two-phase pull contract is honored: the first read of the media
//! sources kicks off a background scan of the whole tree and returns
//! nothing; subsequent property reads post their readiness event on first
//! access and answer from the finished scan on the second.

use crate::core::library::{GroupInfo, GroupKey, LibraryEvent, MediaItem, MediaLibrary};
use crate::error::Result;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;

/// Source identifier this library registers under.
pub const FOLDER_SOURCE_ID: &str = "folder-library";

const EDITED_MARKER: &str = ".edited.";

struct ScannedGroup {
    name: String,
    children: Vec<GroupInfo>,
    items: Vec<MediaItem>,
}

/// Result of the background scan, keyed by library-relative group path.
/// The root group's key is the empty string.
type ScanData = HashMap<GroupKey, ScannedGroup>;

pub struct FolderLibrary {
    root: PathBuf,
    events: Option<Sender<LibraryEvent>>,
    scan: Arc<Mutex<Option<ScanData>>>,
    sources_requested: bool,
    root_requested: bool,
    items_requested: HashSet<GroupKey>,
}

impl FolderLibrary {
    /// `root` must be an existing directory.
    pub fn new(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("library root is not a directory: {}", root.display()),
            )
            .into());
        }
        Ok(Self {
            root: root.to_path_buf(),
            events: None,
            scan: Arc::new(Mutex::new(None)),
            sources_requested: false,
            root_requested: false,
            items_requested: HashSet::new(),
        })
    }

    fn post(&self, event: LibraryEvent) {
        if let Some(tx) = &self.events {
            // send only fails once the loader is gone
            let _ = tx.send(event);
        }
    }

    fn with_scan<T>(&self, f: impl FnOnce(&ScanData) -> Option<T>) -> Option<T> {
        let guard = self.scan.lock().ok()?;
        f(guard.as_ref()?)
    }
}

impl MediaLibrary for FolderLibrary {
    fn subscribe(&mut self, events: Sender<LibraryEvent>) {
        self.events = Some(events);
    }

    fn unsubscribe(&mut self) {
        self.events = None;
    }

    fn media_sources(&mut self) -> Option<Vec<String>> {
        if !self.sources_requested {
            self.sources_requested = true;

            let root = self.root.clone();
            let scan = Arc::clone(&self.scan);
            let events = self.events.clone();
            thread::spawn(move || {
                let data = scan_tree(&root);
                if let Ok(mut guard) = scan.lock() {
                    *guard = Some(data);
                }
                if let Some(tx) = events {
                    let _ = tx.send(LibraryEvent::MediaSourcesReady);
                }
            });
            return None;
        }

        self.with_scan(|_| Some(vec![FOLDER_SOURCE_ID.to_string()]))
    }

    fn root_group(&mut self, source: &str) -> Option<GroupInfo> {
        if source != FOLDER_SOURCE_ID {
            return None;
        }
        if !self.root_requested {
            self.root_requested = true;
            self.post(LibraryEvent::RootGroupReady);
            return None;
        }

        self.with_scan(|data| {
            data.get("").map(|g| GroupInfo {
                key: String::new(),
                name: g.name.clone(),
            })
        })
    }

    fn child_groups(&self, group: &GroupKey) -> Option<Vec<GroupInfo>> {
        self.with_scan(|data| data.get(group).map(|g| g.children.clone()))
    }

    fn items(&mut self, group: &GroupKey) -> Option<Vec<MediaItem>> {
        if !self.items_requested.contains(group) {
            self.items_requested.insert(group.clone());
            self.post(LibraryEvent::MediaObjectsReady(group.clone()));
            return None;
        }

        self.with_scan(|data| data.get(group).map(|g| g.items.clone()))
    }

    fn name(&self) -> String {
        format!("FolderLibrary({})", self.root.display())
    }
}

/// Identifier for an item: leading hex of the SHA-256 of its
/// library-relative path.
fn item_identifier(relative: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(relative.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

fn scan_tree(root: &Path) -> ScanData {
    let root_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    let mut data = ScanData::new();
    scan_group(root, String::new(), root_name, &mut data);
    data
}

fn scan_group(dir: &Path, key: GroupKey, name: String, data: &mut ScanData) {
    let mut children = Vec::new();
    let mut items = Vec::new();

    let mut entries: Vec<_> = match fs::read_dir(dir) {
        Ok(rd) => rd.flatten().collect(),
        Err(e) => {
            log::warn!("Scan: cannot read {}: {}", dir.display(), e);
            Vec::new()
        }
    };
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        let child_key = if key.is_empty() {
            file_name.clone()
        } else {
            format!("{}/{}", key, file_name)
        };

        if path.is_dir() {
            children.push(GroupInfo {
                key: child_key.clone(),
                name: file_name.clone(),
            });
            scan_group(&path, child_key, file_name, data);
        } else if !file_name.contains(EDITED_MARKER) {
            items.push(scan_item(&path, &file_name, &child_key));
        }
    }

    data.insert(key, ScannedGroup { name, children, items });
}

fn scan_item(path: &Path, file_name: &str, relative: &str) -> MediaItem {
    let current = derivative_sibling(path).unwrap_or_else(|| path.to_path_buf());

    MediaItem {
        identifier: item_identifier(relative),
        name: Some(file_name.to_string()),
        original_url: Some(path.to_path_buf()),
        current_url: Some(current),
    }
}

/// The `<stem>.edited.<ext>` sibling of a file, if present.
fn derivative_sibling(path: &Path) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_string_lossy();
    let ext = path.extension()?.to_string_lossy();
    let sibling = path.with_file_name(format!("{}{}{}", stem, EDITED_MARKER, ext));
    sibling.is_file().then_some(sibling)
}
