//! The target model repository.
//!
//! [`ModelRepository`] is the seam between the translation core and whatever
//! stores the resulting model. The importer only ever needs to create
//! packages, diagrams, typed elements with an appearance, positioned
//! placements, and directed connectors, plus a GUID lookup for deferred
//! connector linking and a batch toggle that buffers UI refreshes around a
//! multi-file run (a performance hint, not a correctness mechanism).
//!
//! [`ModelStore`] is the shipped implementation: an in-memory model persisted
//! as a JSON file. A scratch store backs dry runs.

use std::{fmt, fs, path::Path};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use stormport_core::{
    element::{ConnectorKind, DiagramKind, ElementKind},
    geometry::BoundingBox,
};

/// Errors raised by the model store. Always fatal: the run aborts before any
/// file is processed.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("cannot open model store `{path}`: {reason}")]
    Unavailable { path: String, reason: String },

    #[error("cannot persist model store `{path}`: {reason}")]
    Persist { path: String, reason: String },
}

/// Handle to a created package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageId(u32);

/// Handle to a created diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiagramId(u32);

/// Globally unique element identity, assigned by the repository at creation
/// time. Connector resolution defers linking through these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementGuid(Uuid);

impl fmt::Display for ElementGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visual appearance of a created element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    border: bool,
    fill: bool,
    /// Repository-native color: decimal BGR, −1 for no fill.
    color: i32,
}

impl Appearance {
    pub fn new(border: bool, fill: bool, color: i32) -> Self {
        Self {
            border,
            fill,
            color,
        }
    }

    pub fn border(&self) -> bool {
        self.border
    }

    pub fn fill(&self) -> bool {
        self.fill
    }

    pub fn color(&self) -> i32 {
        self.color
    }
}

/// Everything needed to create one element.
#[derive(Debug, Clone)]
pub struct NewElement {
    name: String,
    kind: ElementKind,
    appearance: Appearance,
    notes: Option<String>,
}

impl NewElement {
    pub fn new(name: impl Into<String>, kind: ElementKind, appearance: Appearance) -> Self {
        Self {
            name: name.into(),
            kind,
            appearance,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// The repository surface the translation driver writes against.
pub trait ModelRepository {
    /// Start buffering updates for a multi-file run.
    fn begin_batch(&mut self);

    /// Flush buffered updates at the end of the run.
    fn end_batch(&mut self);

    fn create_package(&mut self, name: &str) -> PackageId;

    fn create_diagram(&mut self, package: PackageId, name: &str, kind: DiagramKind) -> DiagramId;

    fn create_element(&mut self, package: PackageId, element: NewElement) -> ElementGuid;

    fn create_placement(&mut self, diagram: DiagramId, element: ElementGuid, bounds: BoundingBox);

    fn create_connector(&mut self, source: ElementGuid, target: ElementGuid, kind: ConnectorKind);

    fn element_by_guid(&self, guid: ElementGuid) -> Option<&ModelElement>;
}

/// A created element as stored in the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelElement {
    guid: ElementGuid,
    package: PackageId,
    name: String,
    kind: ElementKind,
    appearance: Appearance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl ModelElement {
    pub fn guid(&self) -> ElementGuid {
        self.guid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn appearance(&self) -> Appearance {
        self.appearance
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPackage {
    id: PackageId,
    name: String,
}

impl ModelPackage {
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDiagram {
    id: DiagramId,
    package: PackageId,
    name: String,
    kind: DiagramKind,
}

impl ModelDiagram {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DiagramKind {
        self.kind
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPlacement {
    diagram: DiagramId,
    element: ElementGuid,
    bounds: BoundingBox,
}

impl ModelPlacement {
    pub fn element(&self) -> ElementGuid {
        self.element
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConnector {
    source: ElementGuid,
    target: ElementGuid,
    kind: ConnectorKind,
}

impl ModelConnector {
    pub fn source(&self) -> ElementGuid {
        self.source
    }

    pub fn target(&self) -> ElementGuid {
        self.target
    }

    pub fn kind(&self) -> ConnectorKind {
        self.kind
    }
}

/// In-memory model repository persisted as a JSON file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ModelStore {
    packages: Vec<ModelPackage>,
    diagrams: Vec<ModelDiagram>,
    elements: Vec<ModelElement>,
    placements: Vec<ModelPlacement>,
    connectors: Vec<ModelConnector>,
    next_id: u32,
    #[serde(skip)]
    batching: bool,
}

impl ModelStore {
    /// Open the store at `path`, creating an empty model when the file does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Fails when the path's parent directory does not exist or an existing
    /// file cannot be read or parsed, the "repository unreachable" condition
    /// that aborts the run before any file is processed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();

        if path.exists() {
            let raw = fs::read_to_string(path).map_err(|err| RepositoryError::Unavailable {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;
            let store =
                serde_json::from_str(&raw).map_err(|err| RepositoryError::Unavailable {
                    path: path.display().to_string(),
                    reason: format!("not a valid model store: {err}"),
                })?;
            info!(path = path.display().to_string(); "Opened existing model store");
            return Ok(store);
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(RepositoryError::Unavailable {
                    path: path.display().to_string(),
                    reason: "parent directory does not exist".to_string(),
                });
            }
        }

        info!(path = path.display().to_string(); "Creating new model store");
        Ok(Self::default())
    }

    /// Persist the store as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RepositoryError> {
        let path = path.as_ref();
        let raw = serde_json::to_string_pretty(self).map_err(|err| RepositoryError::Persist {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        fs::write(path, raw).map_err(|err| RepositoryError::Persist {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        info!(path = path.display().to_string(), elements = self.elements.len(); "Model store saved");
        Ok(())
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn packages(&self) -> &[ModelPackage] {
        &self.packages
    }

    pub fn diagrams(&self) -> &[ModelDiagram] {
        &self.diagrams
    }

    pub fn elements(&self) -> &[ModelElement] {
        &self.elements
    }

    pub fn placements(&self) -> &[ModelPlacement] {
        &self.placements
    }

    pub fn connectors(&self) -> &[ModelConnector] {
        &self.connectors
    }
}

impl ModelRepository for ModelStore {
    fn begin_batch(&mut self) {
        self.batching = true;
        debug!("Batch mode on: buffering model refreshes");
    }

    fn end_batch(&mut self) {
        self.batching = false;
        debug!("Batch mode off");
    }

    fn create_package(&mut self, name: &str) -> PackageId {
        let id = PackageId(self.next_id());
        self.packages.push(ModelPackage {
            id,
            name: name.to_string(),
        });
        id
    }

    fn create_diagram(&mut self, package: PackageId, name: &str, kind: DiagramKind) -> DiagramId {
        let id = DiagramId(self.next_id());
        self.diagrams.push(ModelDiagram {
            id,
            package,
            name: name.to_string(),
            kind,
        });
        id
    }

    fn create_element(&mut self, package: PackageId, element: NewElement) -> ElementGuid {
        let guid = ElementGuid(Uuid::new_v4());
        self.elements.push(ModelElement {
            guid,
            package,
            name: element.name,
            kind: element.kind,
            appearance: element.appearance,
            notes: element.notes,
        });
        guid
    }

    fn create_placement(&mut self, diagram: DiagramId, element: ElementGuid, bounds: BoundingBox) {
        self.placements.push(ModelPlacement {
            diagram,
            element,
            bounds,
        });
    }

    fn create_connector(&mut self, source: ElementGuid, target: ElementGuid, kind: ConnectorKind) {
        self.connectors.push(ModelConnector {
            source,
            target,
            kind,
        });
    }

    fn element_by_guid(&self, guid: ElementGuid) -> Option<&ModelElement> {
        self.elements.iter().find(|element| element.guid == guid)
    }
}
