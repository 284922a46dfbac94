//! Media library interface and data model
//!
//! A media library exposes a lazily populated hierarchy of groups and media
//! items. Every collection property follows a two-phase pull: the first read
//! returns `None` and starts background population, a `LibraryEvent` is then
//! delivered on the subscribed channel, and a second read returns the value.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Key identifying a group inside its library.
pub type GroupKey = String;

/// Notification that a lazily populated property became available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEvent {
    /// The list of media sources is ready.
    MediaSourcesReady,
    /// The root group of the requested source is ready.
    RootGroupReady,
    /// The media objects of the given group are ready.
    MediaObjectsReady(GroupKey),
}

/// A group handle as returned by the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    pub key: GroupKey,
    pub name: String,
}

/// One exportable unit with an identifier and one or two associated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// Globally unique, non-empty ASCII identifier. Sole deduplication key.
    pub identifier: String,
    /// Display name, possibly carrying a file extension.
    pub name: Option<String>,
    /// URL of the unmodified original file.
    pub original_url: Option<PathBuf>,
    /// URL of the current file. May equal the original or point to an
    /// edited derivative.
    pub current_url: Option<PathBuf>,
}

impl MediaItem {
    /// Base name used for links: the display name without its extension,
    /// falling back to the identifier.
    pub fn stem(&self) -> String {
        match &self.name {
            Some(name) => Path::new(name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.identifier.clone()),
            None => self.identifier.clone(),
        }
    }

    /// The derivative file URL, if the current file differs from the
    /// original.
    pub fn derivative_url(&self) -> Option<&PathBuf> {
        let url = self.current_url.as_ref()?;
        if let Some(original) = &self.original_url {
            if url == original {
                return None;
            }
        }
        Some(url)
    }
}

/// A lazily populated media hierarchy.
///
/// `media_sources`, `root_group` and `items` follow the two-phase pull
/// contract described in the module docs. `child_groups` is readable as soon
/// as the group handle exists.
pub trait MediaLibrary {
    /// Register the channel on which readiness events are delivered.
    fn subscribe(&mut self, events: Sender<LibraryEvent>);

    /// Release the notification channel. No events are delivered afterwards.
    fn unsubscribe(&mut self);

    /// Identifiers of the available media sources.
    fn media_sources(&mut self) -> Option<Vec<String>>;

    /// Root group of the given source.
    fn root_group(&mut self, source: &str) -> Option<GroupInfo>;

    /// Child groups of a group. `None` means the group has no child list.
    fn child_groups(&self, group: &GroupKey) -> Option<Vec<GroupInfo>>;

    /// Media items of a group.
    fn items(&mut self, group: &GroupKey) -> Option<Vec<MediaItem>>;

    /// Human-readable description of the library, used in diagnostics.
    fn name(&self) -> String;
}
