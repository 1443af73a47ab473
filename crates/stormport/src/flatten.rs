//! Shape-tree flattening.
//!
//! A diagram page stores shapes as a forest: group shapes carry nested
//! children positioned relative to the group. The flattener walks that forest
//! in document order and produces the flat, insertion-ordered [`Page`] the
//! rest of the pipeline works on, with every leaf's center resolved to
//! page-absolute coordinates.
//!
//! The walk is an explicit worklist rather than a parent-chain recursion:
//! each group contributes `(x − width/2, y − height/2)` to the offset its
//! descendants inherit, so pathological nesting depth cannot overflow the
//! stack and the child→parent reference direction never has to be followed
//! backwards.
//!
//! Connector shapes (route-style property present) are excluded from
//! flattening entirely and collected for the connector resolver. Group shapes
//! never become flattened shapes; only their descendants do. Nested content
//! is emitted before its enclosing shape.

use log::trace;

use stormport_core::shape::{DuplicateShape, FlattenedShape, Page, ShapeId};
use stormport_reader::{Connect, DiagramPage, DiagramShape};

/// A connector shape lifted out of the flattening walk: its identity plus the
/// endpoint records the resolver matches against.
#[derive(Debug, Clone)]
pub struct ConnectorShape {
    id: String,
    connects: Vec<Connect>,
}

impl ConnectorShape {
    pub fn new(id: impl Into<String>, connects: Vec<Connect>) -> Self {
        Self {
            id: id.into(),
            connects,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn connects(&self) -> &[Connect] {
        &self.connects
    }

    /// Whether this connector topologically touches the given shape.
    pub fn touches(&self, shape_id: &ShapeId) -> bool {
        self.connects
            .iter()
            .any(|connect| connect.shape() == shape_id.as_str())
    }
}

/// Flatten one page into its leaf shapes and connectors.
///
/// Duplicate shape identities within the page indicate a malformed source
/// diagram and fail the whole page (and with it the file) fast.
pub fn flatten_page(source: &DiagramPage) -> Result<(Page, Vec<ConnectorShape>), DuplicateShape> {
    enum Step<'a> {
        Enter { shape: &'a DiagramShape, offset: (f64, f64) },
        Emit { shape: &'a DiagramShape, offset: (f64, f64) },
    }

    let mut page = Page::new(source.name());
    let mut connectors = Vec::new();

    let mut work: Vec<Step> = source
        .shapes()
        .iter()
        .rev()
        .map(|shape| Step::Enter {
            shape,
            offset: (0.0, 0.0),
        })
        .collect();

    while let Some(step) = work.pop() {
        match step {
            Step::Enter { shape, offset } => {
                if shape.is_connector() {
                    connectors.push(ConnectorShape {
                        id: shape.id().to_string(),
                        connects: shape.connects().to_vec(),
                    });
                    continue;
                }

                // Children are emitted before their enclosing shape, so the
                // Emit step goes on the stack first.
                work.push(Step::Emit { shape, offset });

                let child_offset = if shape.is_group() {
                    // A group's children are positioned relative to its
                    // bottom-left corner: center minus half extent.
                    (
                        offset.0 + shape.x() - shape.width() / 2.0,
                        offset.1 + shape.y() - shape.height() / 2.0,
                    )
                } else {
                    offset
                };
                for child in shape.shapes().iter().rev() {
                    work.push(Step::Enter {
                        shape: child,
                        offset: child_offset,
                    });
                }
            }
            Step::Emit { shape, offset } => {
                if shape.is_group() {
                    continue;
                }

                let flattened = FlattenedShape::new(
                    ShapeId::from(shape.id()),
                    shape.label(),
                    shape.fill().map(str::to_string),
                    offset.0 + shape.x(),
                    offset.1 + shape.y(),
                    shape.width(),
                    shape.height(),
                );
                trace!(
                    page = page.name(),
                    shape = shape.id(),
                    x = flattened.x(),
                    y = flattened.y();
                    "Flattened shape"
                );
                page.insert(flattened)?;
            }
        }
    }

    Ok((page, connectors))
}
