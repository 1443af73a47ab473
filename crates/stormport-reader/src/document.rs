//! The concrete diagram document model.
//!
//! A [`Document`] is a sequence of named pages; each page owns a forest of
//! [`DiagramShape`] values. Shapes are either groups (their geometry offsets
//! their nested children), connectors (marked by a route-style property and
//! carrying [`Connect`] endpoint records), or plain leaf shapes.

use std::{collections::HashSet, fs, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::ReaderError;

/// A loaded diagram file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pages: Vec<DiagramPage>,
}

impl Document {
    pub fn new(pages: Vec<DiagramPage>) -> Self {
        Self { pages }
    }

    /// Load a diagram file, validating that page names are unique.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReaderError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ReaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Document =
            serde_json::from_str(&raw).map_err(|source| ReaderError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut seen = HashSet::new();
        for page in &document.pages {
            if !seen.insert(page.name()) {
                return Err(ReaderError::DuplicatePage {
                    path: path.to_path_buf(),
                    name: page.name().to_string(),
                });
            }
        }

        debug!(path = path.display().to_string(), pages = document.pages.len(); "Diagram loaded");
        Ok(document)
    }

    /// Write the document back out, preserving the interchange format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ReaderError> {
        let path = path.as_ref();
        let raw = serde_json::to_string_pretty(self).map_err(|source| ReaderError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, raw).map_err(|source| ReaderError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn pages(&self) -> &[DiagramPage] {
        &self.pages
    }

    /// Rewrite the fill color of one shape, addressed by page name and shape
    /// id. Returns `false` when no such shape exists.
    ///
    /// Used by legacy-color migration write-back.
    pub fn set_fill(&mut self, page_name: &str, shape_id: &str, fill: Option<String>) -> bool {
        let Some(page) = self.pages.iter_mut().find(|p| p.name() == page_name) else {
            return false;
        };
        for shape in &mut page.shapes {
            if set_fill_in_tree(shape, shape_id, &fill) {
                return true;
            }
        }
        false
    }
}

fn set_fill_in_tree(shape: &mut DiagramShape, shape_id: &str, fill: &Option<String>) -> bool {
    if shape.id() == shape_id {
        shape.fill = fill.clone();
        return true;
    }
    shape
        .shapes
        .iter_mut()
        .any(|child| set_fill_in_tree(child, shape_id, fill))
}

/// One named page of a diagram file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramPage {
    name: String,
    #[serde(default)]
    shapes: Vec<DiagramShape>,
}

impl DiagramPage {
    pub fn new(name: impl Into<String>, shapes: Vec<DiagramShape>) -> Self {
        Self {
            name: name.into(),
            shapes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level shapes in document order.
    pub fn shapes(&self) -> &[DiagramShape] {
        &self.shapes
    }
}

/// A shape as stored in the diagram file: leaf, group, or connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramShape {
    id: String,
    #[serde(default)]
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fill: Option<String>,
    #[serde(default)]
    group: bool,
    /// Routing style of a connector shape. Presence, not value, marks the
    /// shape as a connector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    route_style: Option<i64>,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    shapes: Vec<DiagramShape>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    connects: Vec<Connect>,
}

impl DiagramShape {
    /// A plain leaf shape.
    pub fn leaf(
        id: impl Into<String>,
        text: impl Into<String>,
        fill: Option<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            fill,
            group: false,
            route_style: None,
            x,
            y,
            width,
            height,
            shapes: Vec::new(),
            connects: Vec::new(),
        }
    }

    /// A group shape whose geometry offsets its nested children.
    pub fn group(
        id: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        shapes: Vec<DiagramShape>,
    ) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            fill: None,
            group: true,
            route_style: None,
            x,
            y,
            width,
            height,
            shapes,
            connects: Vec::new(),
        }
    }

    /// A connector shape with its endpoint records.
    pub fn connector(id: impl Into<String>, connects: Vec<Connect>) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            fill: None,
            group: false,
            route_style: Some(1),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            shapes: Vec::new(),
            connects,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display text with the trailing newline the source format appends
    /// stripped off.
    pub fn label(&self) -> &str {
        self.text.trim_end_matches('\n')
    }

    pub fn fill(&self) -> Option<&str> {
        self.fill.as_deref()
    }

    pub fn is_group(&self) -> bool {
        self.group
    }

    /// A shape with a route-style property is a visual connector, handled by
    /// the connector resolver instead of the flattener.
    pub fn is_connector(&self) -> bool {
        self.route_style.is_some()
    }

    /// Local center x, relative to the enclosing group (or the page).
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Local center y, relative to the enclosing group (or the page).
    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Nested sub-shapes in document order.
    pub fn shapes(&self) -> &[DiagramShape] {
        &self.shapes
    }

    /// Endpoint records of a connector shape; empty for non-connectors.
    pub fn connects(&self) -> &[Connect] {
        &self.connects
    }
}

/// One endpoint record of a connector: which shape it touches and from which
/// relation ("BeginX" marks the connector's origin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connect {
    shape: String,
    from_relation: String,
}

impl Connect {
    pub const BEGIN_RELATION: &'static str = "BeginX";

    pub fn new(shape: impl Into<String>, from_relation: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
            from_relation: from_relation.into(),
        }
    }

    /// Id of the endpoint shape this record references.
    pub fn shape(&self) -> &str {
        &self.shape
    }

    pub fn from_relation(&self) -> &str {
        &self.from_relation
    }

    /// Whether this record marks the connector's origin side.
    pub fn is_begin(&self) -> bool {
        self.from_relation == Self::BEGIN_RELATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r##"{
            "pages": [
                {
                    "name": "Checkout",
                    "shapes": [
                        {
                            "id": "1",
                            "text": "Order placed\n",
                            "fill": "#ffa95f",
                            "x": 2.0, "y": 3.0, "width": 1.5, "height": 0.75
                        },
                        {
                            "id": "9",
                            "route_style": 16,
                            "connects": [
                                { "shape": "1", "from_relation": "BeginX" },
                                { "shape": "2", "from_relation": "EndX" }
                            ]
                        }
                    ]
                }
            ]
        }"##
    }

    #[test]
    fn parse_sample_document() {
        let document: Document = serde_json::from_str(sample_json()).unwrap();
        let page = &document.pages()[0];
        assert_eq!(page.name(), "Checkout");

        let shape = &page.shapes()[0];
        assert_eq!(shape.label(), "Order placed");
        assert_eq!(shape.fill(), Some("#ffa95f"));
        assert!(!shape.is_connector());

        let connector = &page.shapes()[1];
        assert!(connector.is_connector());
        assert!(connector.connects()[0].is_begin());
        assert!(!connector.connects()[1].is_begin());
    }

    #[test]
    fn load_rejects_duplicate_page_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dup.storm.json");
        std::fs::write(
            &path,
            r#"{ "pages": [ { "name": "A" }, { "name": "A" } ] }"#,
        )
        .unwrap();

        let err = Document::load(&path).unwrap_err();
        assert!(matches!(err, ReaderError::DuplicatePage { name, .. } if name == "A"));
    }

    #[test]
    fn set_fill_reaches_nested_shapes() {
        let nested = DiagramShape::leaf("5", "inner", Some("#f09609".into()), 1.0, 1.0, 1.0, 1.0);
        let group = DiagramShape::group("4", 3.0, 3.0, 2.0, 2.0, vec![nested]);
        let mut document = Document::new(vec![DiagramPage::new("P", vec![group])]);

        assert!(document.set_fill("P", "5", Some("#ffa95f".into())));
        assert_eq!(
            document.pages()[0].shapes()[0].shapes()[0].fill(),
            Some("#ffa95f")
        );
        assert!(!document.set_fill("P", "404", None));
        assert!(!document.set_fill("missing page", "5", None));
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round.storm.json");

        let document: Document = serde_json::from_str(sample_json()).unwrap();
        document.save(&path).unwrap();
        let reloaded = Document::load(&path).unwrap();

        assert_eq!(reloaded.pages().len(), 1);
        assert_eq!(reloaded.pages()[0].shapes()[0].fill(), Some("#ffa95f"));
        assert!(reloaded.pages()[0].shapes()[1].is_connector());
    }
}
