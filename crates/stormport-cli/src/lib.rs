//! CLI logic for the Stormport diagram importer.
//!
//! This module contains the core CLI logic: input discovery, configuration
//! loading, model store handling, and the per-run import loop.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};

use stormport::{
    ImportError,
    repository::ModelStore,
    translate::{ImportOptions, Translator},
};

/// Run the Stormport CLI application
///
/// Discovers diagram files at the input path, translates them one at a time
/// against the model store, and persists the store unless the run is a color
/// check or a dry run.
///
/// # Errors
///
/// Returns `ImportError` for:
/// - An unusable model store (fatal before any file is processed)
/// - An input path with no diagram files
/// - Configuration loading errors
/// - I/O errors while writing reports or persisting the store
pub fn run(args: &Args) -> Result<(), ImportError> {
    info!(
        input_path = args.input,
        model_path = args.model;
        "Importing diagrams"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;

    // Discover input files before touching the model store
    let files = discover_diagram_files(
        Path::new(&args.input),
        app_config.discovery().extension(),
    )?;
    info!(files = files.len(); "Discovered diagram files");

    // Open the target model store; failure here aborts the whole run
    let model_path = Path::new(&args.model);
    let mut store = ModelStore::open(model_path)?;

    let options = ImportOptions::new()
        .check_colors_only(args.check_colors)
        .write_report(args.report)
        .fix_colors(args.fix_colors);

    let summary = Translator::new(&mut store, app_config.canvas(), options).import_all(&files)?;

    if args.dry_run || args.check_colors {
        info!("Model store left untouched");
    } else {
        store.save(model_path)?;
    }

    if !summary.failures().is_empty() {
        warn!(skipped = summary.failures().len(); "Some diagram files were skipped");
    }
    info!(
        elements = summary.created_elements(),
        connectors = summary.created_connectors(),
        files_with_violations = summary.files_with_violations();
        "Import finished"
    );

    Ok(())
}

/// Resolve the input path into the ordered list of diagram files to process.
///
/// A file path is taken as-is; a directory is scanned (non-recursively) for
/// files with the configured extension, sorted for a deterministic run
/// order. Finding nothing to do is a fatal input-discovery error.
pub fn discover_diagram_files(path: &Path, extension: &str) -> Result<Vec<PathBuf>, ImportError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if path.is_dir() {
        let suffix = format!(".{extension}");
        let mut files: Vec<PathBuf> = fs::read_dir(path)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|candidate| {
                candidate.is_file()
                    && candidate
                        .file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.ends_with(&suffix))
            })
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(ImportError::NoInputFiles {
                path: path.to_path_buf(),
            });
        }
        return Ok(files);
    }

    Err(ImportError::NoInputFiles {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_accepts_a_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.storm.json");
        fs::write(&file, "{}").unwrap();

        let files = discover_diagram_files(&file, "storm.json").unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn discovery_filters_and_sorts_directory_entries() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.storm.json", "a.storm.json", "notes.txt"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }

        let files = discover_diagram_files(dir.path(), "storm.json").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.storm.json", "b.storm.json"]);
    }

    #[test]
    fn empty_directory_is_a_discovery_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_diagram_files(dir.path(), "storm.json").unwrap_err();
        assert!(matches!(err, ImportError::NoInputFiles { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn missing_path_is_a_discovery_error() {
        let err =
            discover_diagram_files(Path::new("/nonexistent/nowhere"), "storm.json").unwrap_err();
        assert!(matches!(err, ImportError::NoInputFiles { .. }));
    }
}
