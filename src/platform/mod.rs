// Platform-specific code module

pub mod fs;

// Re-exports for cleaner imports
pub use fs::{copy_noclobber, create_dir_recursive, exists, symlink_noclobber, CopyError, LinkError};
