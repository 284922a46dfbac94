// Core export pipeline module

pub mod exporter;
pub mod folder_library;
pub mod library;
pub mod linker;
pub mod loader;
pub mod store;
pub mod tree;

// Re-export commonly used items
pub use exporter::Exporter;
pub use folder_library::{FolderLibrary, FOLDER_SOURCE_ID};
pub use library::{GroupInfo, GroupKey, LibraryEvent, MediaItem, MediaLibrary};
pub use linker::Linker;
pub use loader::Loader;
pub use store::{Category, ContentStore};
pub use tree::{GroupId, GroupNode, MediaTree};
