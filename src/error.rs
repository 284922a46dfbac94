use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the photo-export application
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to load media sources of {0}")]
    MediaSourcesLoadFailure(String),

    #[error("No photos found in {0}")]
    PhotosNotFound(String),

    #[error("Failed to load root media group of {0}")]
    RootGroupLoadFailure(String),

    #[error("Failed to load media objects of {0}")]
    MediaObjectsLoadFailure(String),

    #[error("Photo loading loop could not be started")]
    LoopRunFailure,

    #[error("A file or directory exists at the destination path: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for the photo-export application
pub type Result<T> = std::result::Result<T, ExportError>;

impl ExportError {
    /// Create a media sources load error
    pub fn media_sources<S: Into<String>>(subject: S) -> Self {
        ExportError::MediaSourcesLoadFailure(subject.into())
    }

    /// Create a photos-not-found error
    pub fn photos_not_found<S: Into<String>>(subject: S) -> Self {
        ExportError::PhotosNotFound(subject.into())
    }

    /// Create a root group load error
    pub fn root_group<S: Into<String>>(subject: S) -> Self {
        ExportError::RootGroupLoadFailure(subject.into())
    }

    /// Create a media objects load error
    pub fn media_objects<S: Into<String>>(subject: S) -> Self {
        ExportError::MediaObjectsLoadFailure(subject.into())
    }
}
