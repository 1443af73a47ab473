//! Error types for diagram-file access.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while loading or saving a diagram file.
///
/// All variants are per-file conditions: the importer skips the offending
/// file and continues with the rest of the run.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{path}` is not a valid diagram file: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate page name `{name}` in `{path}`")]
    DuplicatePage { path: PathBuf, name: String },
}
