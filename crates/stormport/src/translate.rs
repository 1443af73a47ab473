//! The translation driver.
//!
//! Orchestrates flattening, color classification, coordinate transformation,
//! and connector resolution per input file, and emits create operations
//! against the model repository (or the report sink, or neither, depending
//! on mode).
//!
//! Each file is translated in phases so that no partial model ever exists
//! for a rejected file:
//!
//! 1. flatten every page (duplicate shape ids fail the file fast),
//! 2. classify every shape's color, migrating legacy colors in place and
//!    collecting the shapes still disallowed afterwards,
//! 3. veto: any disallowed color skips repository writes for the whole file
//!    (the report artifact is still produced when requested),
//! 4. emit: one package per file, one Activity diagram per page, one typed
//!    element plus positioned placement per shape, then a page-scoped
//!    connector completion pass.

use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use stormport_core::{
    color::{AllowedColor, ColorClass, classify},
    element::DiagramKind,
    geometry::CanvasSpec,
    shape::{Page, ShapeId},
};
use stormport_reader::Document;

use crate::{
    ImportError,
    connector::ConnectorResolver,
    flatten::{ConnectorShape, flatten_page},
    report::{self, BadColorShape},
    repository::{Appearance, ModelRepository, NewElement},
};

/// Mode switches for a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    check_colors_only: bool,
    write_report: bool,
    fix_colors: bool,
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after color validation; never write to the repository.
    pub fn check_colors_only(mut self, value: bool) -> Self {
        self.check_colors_only = value;
        self
    }

    /// Emit a CSV report artifact for files with disallowed colors.
    pub fn write_report(mut self, value: bool) -> Self {
        self.write_report = value;
        self
    }

    /// Write migrated legacy colors back into the diagram files.
    pub fn fix_colors(mut self, value: bool) -> Self {
        self.fix_colors = value;
        self
    }
}

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Fully translated and written to the repository.
    Imported { elements: usize, connectors: usize },
    /// Disallowed colors found; no repository writes for this file.
    ColorViolations(usize),
    /// Color check passed in check-only mode; nothing written.
    CheckedClean,
}

/// Aggregated result of a multi-file run.
#[derive(Debug, Default)]
pub struct RunSummary {
    outcomes: Vec<(PathBuf, FileOutcome)>,
    failures: Vec<(PathBuf, ImportError)>,
}

impl RunSummary {
    pub fn outcomes(&self) -> &[(PathBuf, FileOutcome)] {
        &self.outcomes
    }

    /// Per-file errors (unreadable or malformed diagrams) that skipped one
    /// file while the run continued.
    pub fn failures(&self) -> &[(PathBuf, ImportError)] {
        &self.failures
    }

    pub fn imported_files(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, FileOutcome::Imported { .. }))
            .count()
    }

    pub fn files_with_violations(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, FileOutcome::ColorViolations(_)))
            .count()
    }

    pub fn created_elements(&self) -> usize {
        self.outcomes
            .iter()
            .map(|(_, outcome)| match outcome {
                FileOutcome::Imported { elements, .. } => *elements,
                _ => 0,
            })
            .sum()
    }

    pub fn created_connectors(&self) -> usize {
        self.outcomes
            .iter()
            .map(|(_, outcome)| match outcome {
                FileOutcome::Imported { connectors, .. } => *connectors,
                _ => 0,
            })
            .sum()
    }
}

/// One page's translation state between phases.
struct PreparedPage {
    page: Page,
    connectors: Vec<ConnectorShape>,
    /// Allowed colors aligned with `page.shapes()` order. Only meaningful
    /// when the file has no color violations.
    colors: Vec<AllowedColor>,
}

/// Drives the diagram-to-model translation against a repository.
pub struct Translator<'r, R: ModelRepository> {
    repository: &'r mut R,
    canvas: CanvasSpec,
    options: ImportOptions,
}

impl<'r, R: ModelRepository> Translator<'r, R> {
    pub fn new(repository: &'r mut R, canvas: CanvasSpec, options: ImportOptions) -> Self {
        Self {
            repository,
            canvas,
            options,
        }
    }

    /// Translate a set of diagram files, strictly one at a time.
    ///
    /// Per-file errors are recorded in the summary and the run continues;
    /// fatal errors abort immediately. Batch mode is toggled around the whole
    /// run so the repository can buffer refreshes.
    pub fn import_all(&mut self, files: &[PathBuf]) -> Result<RunSummary, ImportError> {
        let mut summary = RunSummary::default();

        self.repository.begin_batch();
        for path in files {
            match self.import_file(path) {
                Ok(outcome) => summary.outcomes.push((path.clone(), outcome)),
                Err(err) if err.is_fatal() => {
                    self.repository.end_batch();
                    return Err(err);
                }
                Err(err) => {
                    error!(file = path.display().to_string(), err = err.to_string(); "Skipping file");
                    summary.failures.push((path.clone(), err));
                }
            }
        }
        self.repository.end_batch();

        info!(
            imported = summary.imported_files(),
            violations = summary.files_with_violations(),
            failed = summary.failures.len();
            "Run finished"
        );
        Ok(summary)
    }

    /// Translate one diagram file.
    pub fn import_file(&mut self, path: &Path) -> Result<FileOutcome, ImportError> {
        info!(file = path.display().to_string(); "Translating diagram file");
        let mut document = Document::load(path)?;

        let mut pages = Vec::with_capacity(document.pages().len());
        for source in document.pages() {
            let (page, connectors) = flatten_page(source)?;
            debug!(page = page.name(), shapes = page.len(), connectors = connectors.len(); "Page flattened");
            pages.push(PreparedPage {
                page,
                connectors,
                colors: Vec::new(),
            });
        }

        let mut bad_colors = Vec::new();
        let mut migrations: Vec<(String, ShapeId, String)> = Vec::new();
        for prepared in &mut pages {
            let page_name = prepared.page.name().to_string();
            for shape in prepared.page.shapes_mut() {
                let allowed = match classify(shape.color()) {
                    ColorClass::Allowed(member) => Some(member),
                    ColorClass::Legacy { replacement } => {
                        info!(
                            page = page_name,
                            shape = shape.id().as_str(),
                            text = shape.label(),
                            new_color = replacement.to_string();
                            "Replaced legacy color"
                        );
                        let hex = replacement
                            .hex()
                            .expect("legacy colors migrate to colored members");
                        shape.set_color(Some(hex.to_string()));
                        migrations.push((page_name.clone(), shape.id().clone(), hex.to_string()));
                        Some(replacement)
                    }
                    ColorClass::Disallowed => {
                        warn!(
                            page = page_name,
                            shape = shape.id().as_str(),
                            text = shape.label(),
                            color = shape.color().unwrap_or_default();
                            "Disallowed color"
                        );
                        bad_colors.push(BadColorShape::new(
                            &page_name,
                            shape.id().clone(),
                            shape.label(),
                            shape.color().unwrap_or_default(),
                        ));
                        None
                    }
                };
                if let Some(member) = allowed {
                    prepared.colors.push(member);
                }
            }
        }

        if self.options.fix_colors && !migrations.is_empty() {
            for (page_name, shape_id, hex) in &migrations {
                document.set_fill(page_name, shape_id.as_str(), Some(hex.clone()));
            }
            document.save(path)?;
            info!(file = path.display().to_string(), fixed = migrations.len(); "Migrated colors written back");
        }

        if !bad_colors.is_empty() {
            warn!(
                file = path.display().to_string(),
                shapes = bad_colors.len();
                "Disallowed colors present; skipping repository import for this file"
            );
            if self.options.write_report {
                report::write_report(&report::report_path(path), &bad_colors)?;
            }
            return Ok(FileOutcome::ColorViolations(bad_colors.len()));
        }

        if self.options.check_colors_only {
            info!(file = path.display().to_string(); "Colors check passed");
            return Ok(FileOutcome::CheckedClean);
        }

        self.emit(path, &pages)
    }

    /// Phase 4: write one clean file's model into the repository.
    fn emit(&mut self, path: &Path, pages: &[PreparedPage]) -> Result<FileOutcome, ImportError> {
        let package_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let package = self.repository.create_package(&package_name);

        let mut elements = 0;
        let mut connectors = 0;
        for prepared in pages {
            let diagram =
                self.repository
                    .create_diagram(package, prepared.page.name(), DiagramKind::Activity);

            // Connector state lives for exactly this page.
            let mut resolver = ConnectorResolver::new();
            for (shape, &color) in prepared.page.shapes().zip(&prepared.colors) {
                let element = self.repository.create_element(
                    package,
                    NewElement::new(
                        shape.label(),
                        color.element_kind(),
                        Appearance::new(true, false, color.encoded()),
                    ),
                );
                elements += 1;

                for connector in prepared
                    .connectors
                    .iter()
                    .filter(|connector| connector.touches(shape.id()))
                {
                    resolver.observe(connector, element, shape.label(), &prepared.page);
                }

                let bounds = self.canvas.to_target_box(shape);
                self.repository.create_placement(diagram, element, bounds);
            }
            connectors += resolver.complete(self.repository);
        }

        info!(
            file = path.display().to_string(),
            elements = elements,
            connectors = connectors;
            "Diagram file imported"
        );
        Ok(FileOutcome::Imported {
            elements,
            connectors,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use stormport_core::element::ElementKind;
    use stormport_reader::{Connect, DiagramPage, DiagramShape};

    use crate::repository::ModelStore;

    use super::*;

    const EVENT_KIND_COLOR: &str = "#eca1c4"; // ExternalSystem -> Event kind

    fn write_document(dir: &Path, name: &str, document: &Document) -> PathBuf {
        let path = dir.join(name);
        document.save(&path).unwrap();
        path
    }

    fn leaf(id: &str, text: &str, fill: &str, x: f64, y: f64) -> DiagramShape {
        DiagramShape::leaf(id, text, Some(fill.to_string()), x, y, 2.0, 1.0)
    }

    fn import(
        store: &mut ModelStore,
        options: ImportOptions,
        path: &Path,
    ) -> Result<FileOutcome, ImportError> {
        Translator::new(store, CanvasSpec::default(), options).import_file(path)
    }

    #[test]
    fn end_to_end_group_scenario() {
        // One group with two Event-colored leaves, connected A -> B.
        let dir = tempfile::tempdir().unwrap();
        let group = DiagramShape::group(
            "g",
            4.0,
            4.0,
            4.0,
            2.0,
            vec![
                leaf("1", "A", EVENT_KIND_COLOR, 1.0, 0.5),
                leaf("2", "B", EVENT_KIND_COLOR, 3.0, 1.5),
            ],
        );
        let connector = DiagramShape::connector(
            "c",
            vec![Connect::new("1", "BeginX"), Connect::new("2", "EndX")],
        );
        let document = Document::new(vec![DiagramPage::new("Flow", vec![group, connector])]);
        let path = write_document(dir.path(), "flow.storm.json", &document);

        let mut store = ModelStore::default();
        let outcome = import(&mut store, ImportOptions::new(), &path).unwrap();

        assert_eq!(
            outcome,
            FileOutcome::Imported {
                elements: 2,
                connectors: 1
            }
        );
        assert_eq!(store.packages()[0].name(), "flow.storm.json");
        assert_eq!(store.diagrams()[0].name(), "Flow");

        let a = &store.elements()[0];
        let b = &store.elements()[1];
        assert_eq!(a.name(), "A");
        assert_eq!(a.kind(), ElementKind::Event);
        assert_eq!(b.kind(), ElementKind::Event);

        // Directed relationship A -> B.
        let relation = &store.connectors()[0];
        assert_eq!(relation.source(), a.guid());
        assert_eq!(relation.target(), b.guid());

        // Group offset (corner at (2,3)) shows up in the placements.
        let pa = store.placements()[0].bounds();
        let pb = store.placements()[1].bounds();
        // A at absolute center (3, 3.5): left = (3 - 1) * 96.
        assert_eq!(pa.left(), 192.0);
        // B at absolute center (5, 4.5): left = (5 - 1) * 96.
        assert_eq!(pb.left(), 384.0);
        assert!(pb.top() < pa.top());
    }

    #[test]
    fn disallowed_color_vetoes_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let document = Document::new(vec![
            DiagramPage::new("Clean", vec![leaf("1", "A", EVENT_KIND_COLOR, 1.0, 1.0)]),
            DiagramPage::new("Dirty", vec![leaf("2", "B", "#0f0f0f", 1.0, 1.0)]),
        ]);
        let path = write_document(dir.path(), "mixed.storm.json", &document);

        let mut store = ModelStore::default();
        let outcome = import(
            &mut store,
            ImportOptions::new().write_report(true),
            &path,
        )
        .unwrap();

        assert_eq!(outcome, FileOutcome::ColorViolations(1));
        // All-or-nothing: the clean page was not imported either.
        assert!(store.packages().is_empty());
        assert!(store.elements().is_empty());

        let report = std::fs::read_to_string(dir.path().join("mixed.storm.csv")).unwrap();
        assert!(report.contains("Dirty,2,B,#0f0f0f"));
    }

    #[test]
    fn legacy_colors_migrate_before_validation() {
        // #f09609 is legacy for DomainEvent (#ffa95f): migrated, not
        // reported, and the created element carries the corrected color.
        let dir = tempfile::tempdir().unwrap();
        let document = Document::new(vec![DiagramPage::new(
            "P",
            vec![leaf("1", "A", "#f09609", 1.0, 1.0)],
        )]);
        let path = write_document(dir.path(), "legacy.storm.json", &document);

        let mut store = ModelStore::default();
        let outcome = import(&mut store, ImportOptions::new(), &path).unwrap();

        assert!(matches!(outcome, FileOutcome::Imported { elements: 1, .. }));
        let element = &store.elements()[0];
        assert_eq!(element.kind(), ElementKind::Action);
        // BGR of #ffa95f.
        assert_eq!(element.appearance().color(), 0x5fa9ff);
    }

    #[test]
    fn fix_colors_writes_migrations_back() {
        let dir = tempfile::tempdir().unwrap();
        let document = Document::new(vec![DiagramPage::new(
            "P",
            vec![leaf("1", "A", "#f09609", 1.0, 1.0)],
        )]);
        let path = write_document(dir.path(), "fix.storm.json", &document);

        let mut store = ModelStore::default();
        import(
            &mut store,
            ImportOptions::new().fix_colors(true),
            &path,
        )
        .unwrap();

        let rewritten = Document::load(&path).unwrap();
        assert_eq!(rewritten.pages()[0].shapes()[0].fill(), Some("#ffa95f"));
    }

    #[test]
    fn check_colors_only_never_writes() {
        let dir = tempfile::tempdir().unwrap();
        let document = Document::new(vec![DiagramPage::new(
            "P",
            vec![leaf("1", "A", EVENT_KIND_COLOR, 1.0, 1.0)],
        )]);
        let path = write_document(dir.path(), "check.storm.json", &document);

        let mut store = ModelStore::default();
        let outcome = import(
            &mut store,
            ImportOptions::new().check_colors_only(true),
            &path,
        )
        .unwrap();

        assert_eq!(outcome, FileOutcome::CheckedClean);
        assert!(store.packages().is_empty());
    }

    #[test]
    fn unfilled_shapes_import_as_objects() {
        let dir = tempfile::tempdir().unwrap();
        let document = Document::new(vec![DiagramPage::new(
            "P",
            vec![DiagramShape::leaf("1", "note", None, 1.0, 1.0, 2.0, 1.0)],
        )]);
        let path = write_document(dir.path(), "plain.storm.json", &document);

        let mut store = ModelStore::default();
        import(&mut store, ImportOptions::new(), &path).unwrap();

        let element = &store.elements()[0];
        assert_eq!(element.kind(), ElementKind::Object);
        assert_eq!(element.appearance().color(), -1);
    }

    #[test]
    fn connector_ids_do_not_leak_across_pages() {
        // The same connector identity dangles on page one and dangles on
        // page two; if pending state leaked, the two fragments would combine
        // into one bogus relationship.
        let dir = tempfile::tempdir().unwrap();
        let page_one = DiagramPage::new(
            "One",
            vec![
                leaf("1", "A", EVENT_KIND_COLOR, 1.0, 1.0),
                DiagramShape::connector("c", vec![Connect::new("1", "BeginX")]),
            ],
        );
        let page_two = DiagramPage::new(
            "Two",
            vec![
                leaf("2", "B", EVENT_KIND_COLOR, 1.0, 1.0),
                DiagramShape::connector("c", vec![Connect::new("2", "EndX")]),
            ],
        );
        let document = Document::new(vec![page_one, page_two]);
        let path = write_document(dir.path(), "pages.storm.json", &document);

        let mut store = ModelStore::default();
        let outcome = import(&mut store, ImportOptions::new(), &path).unwrap();

        assert_eq!(
            outcome,
            FileOutcome::Imported {
                elements: 2,
                connectors: 0
            }
        );
        assert!(store.connectors().is_empty());
    }

    #[test]
    fn duplicate_shape_fails_only_that_file() {
        let dir = tempfile::tempdir().unwrap();
        let broken = Document::new(vec![DiagramPage::new(
            "P",
            vec![
                leaf("1", "A", EVENT_KIND_COLOR, 1.0, 1.0),
                leaf("1", "B", EVENT_KIND_COLOR, 2.0, 2.0),
            ],
        )]);
        let clean = Document::new(vec![DiagramPage::new(
            "P",
            vec![leaf("1", "A", EVENT_KIND_COLOR, 1.0, 1.0)],
        )]);
        let broken_path = write_document(dir.path(), "broken.storm.json", &broken);
        let clean_path = write_document(dir.path(), "clean.storm.json", &clean);

        let mut store = ModelStore::default();
        let mut translator =
            Translator::new(&mut store, CanvasSpec::default(), ImportOptions::new());
        let summary = translator
            .import_all(&[broken_path.clone(), clean_path])
            .unwrap();

        assert_eq!(summary.failures().len(), 1);
        assert_eq!(summary.failures()[0].0, broken_path);
        assert!(matches!(
            summary.failures()[0].1,
            ImportError::MalformedDiagram(_)
        ));
        assert_eq!(summary.imported_files(), 1);
        assert_eq!(summary.created_elements(), 1);
    }
}
