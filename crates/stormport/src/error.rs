//! Error types for the import pipeline.
//!
//! The taxonomy distinguishes fatal-abort conditions (the model store is
//! unusable, input discovery found nothing to do) from per-file conditions
//! (unreadable or malformed diagrams). Fatal errors end the run; per-file
//! errors skip one file and let the rest continue. Color-compliance
//! violations are not errors at all; they are collected, reported, and used
//! to veto that file's repository writes.

use std::{io, path::PathBuf};

use thiserror::Error;

use stormport_core::shape::DuplicateShape;
use stormport_reader::ReaderError;

use crate::repository::RepositoryError;

/// The main error type for import operations.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Reader(#[from] ReaderError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    MalformedDiagram(#[from] DuplicateShape),

    #[error("failed to write color report: {0}")]
    Report(#[from] csv::Error),

    #[error("no diagram files found at `{path}`")]
    NoInputFiles { path: PathBuf },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ImportError {
    /// Whether this error aborts the whole run rather than one file's import.
    pub fn is_fatal(&self) -> bool {
        match self {
            ImportError::Io(_)
            | ImportError::Repository(_)
            | ImportError::Report(_)
            | ImportError::NoInputFiles { .. }
            | ImportError::Config(_) => true,
            ImportError::Reader(_) | ImportError::MalformedDiagram(_) => false,
        }
    }
}
