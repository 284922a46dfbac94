// photo-export library - Public API

// Re-export error types
pub mod error;
pub use error::{ExportError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use crate::core::exporter::Exporter;
pub use crate::core::loader::Loader;
pub use crate::core::tree::MediaTree;

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
