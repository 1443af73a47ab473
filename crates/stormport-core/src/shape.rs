//! Flattened leaf shapes and per-page shape sets.
//!
//! The flattener reduces a page's nested shape forest to a flat, ordered set
//! of [`FlattenedShape`] values with absolute center positions. Group shapes
//! never appear here; their offsets are already folded into their
//! descendants' positions.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

/// Identity of a shape within its diagram file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(String);

impl ShapeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A non-group leaf shape with its position resolved to page-absolute
/// coordinates.
///
/// Positions are geometric centers in page-length units, y increasing
/// upward from the page's bottom-left corner (the source diagram
/// convention). The color is the raw fill string as read from the diagram;
/// it is rewritten in place when a legacy color is migrated.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedShape {
    id: ShapeId,
    label: String,
    color: Option<String>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl FlattenedShape {
    pub fn new(
        id: ShapeId,
        label: impl Into<String>,
        color: Option<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            color,
            x,
            y,
            width,
            height,
        }
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    /// Display text of the shape, used as the created element's name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Raw fill color as currently stored, `None` for unfilled shapes.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Rewrite the stored fill color. Used by legacy-color migration so that
    /// downstream classification and kind resolution observe the corrected
    /// value.
    pub fn set_color(&mut self, color: Option<String>) {
        self.color = color;
    }

    /// Absolute center x, page-length units.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Absolute center y, page-length units, y increasing upward.
    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

/// Inserting a shape id that is already present on the page.
///
/// Indicates a malformed source diagram; the file's import fails fast.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("duplicate shape id `{id}` on page `{page}`")]
pub struct DuplicateShape {
    page: String,
    id: ShapeId,
}

impl DuplicateShape {
    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }
}

/// An ordered set of flattened shapes belonging to one diagram page.
///
/// Iteration order is discovery order, which downstream translation relies
/// on for deterministic element creation.
#[derive(Debug, Clone, Default)]
pub struct Page {
    name: String,
    shapes: IndexMap<ShapeId, FlattenedShape>,
}

impl Page {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shapes: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a flattened shape, rejecting duplicate identities.
    pub fn insert(&mut self, shape: FlattenedShape) -> Result<(), DuplicateShape> {
        if self.shapes.contains_key(shape.id()) {
            return Err(DuplicateShape {
                page: self.name.clone(),
                id: shape.id().clone(),
            });
        }
        self.shapes.insert(shape.id().clone(), shape);
        Ok(())
    }

    pub fn get(&self, id: &ShapeId) -> Option<&FlattenedShape> {
        self.shapes.get(id)
    }

    pub fn shapes(&self) -> impl Iterator<Item = &FlattenedShape> {
        self.shapes.values()
    }

    pub fn shapes_mut(&mut self) -> impl Iterator<Item = &mut FlattenedShape> {
        self.shapes.values_mut()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
