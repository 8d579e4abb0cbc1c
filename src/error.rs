//! Error types shared by the migration components.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading the F-Spot database.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("The F-Spot database at {0} does not exist")]
    DatabaseMissing(PathBuf),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Tag {0} does not exist in the tags table")]
    TagNotFound(i64),

    #[error("Tag {0} has no name")]
    UnnamedTag(i64),
}

/// Failures while walking a tag's category chain.
#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Category chain of tag {tag_id} loops back to tag {repeated}")]
    Cycle { tag_id: i64, repeated: i64 },

    #[error("Category chain of tag {tag_id} is deeper than {max_depth} levels")]
    TooDeep { tag_id: i64, max_depth: usize },
}

/// Failures while writing a sidecar file.
#[derive(Error, Debug)]
pub enum SidecarError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A failure that aborts the processing of a single photo.
#[derive(Error, Debug)]
pub enum PhotoError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error(transparent)]
    Sidecar(#[from] SidecarError),
}
