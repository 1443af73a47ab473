//! Page-scoped connector resolution.
//!
//! Visual connectors are direction-agnostic links between two shapes. The
//! target element identity (GUID) only exists after a shape has been
//! translated, so resolution is incremental: [`ConnectorResolver::observe`]
//! is called once per (connector, shape)-adjacency while the page's shapes
//! are translated, and [`ConnectorResolver::complete`] materializes every
//! connector whose two sides resolved.
//!
//! A resolver instance lives for exactly one page. The driver constructs a
//! fresh one per page, so a connector identity reused on a later page never
//! continues a fragment from an earlier one.

use indexmap::IndexMap;
use indexmap::map::Entry;
use log::debug;

use stormport_core::{element::ConnectorKind, shape::Page};

use crate::{
    flatten::ConnectorShape,
    repository::{ElementGuid, ModelRepository},
};

/// A connector with zero, one, or two resolved endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingConnector {
    start: Option<ElementGuid>,
    end: Option<ElementGuid>,
}

impl PendingConnector {
    pub fn start(&self) -> Option<ElementGuid> {
        self.start
    }

    pub fn end(&self) -> Option<ElementGuid> {
        self.end
    }

    /// Only connectors with both endpoints resolved are materialized.
    pub fn is_valid(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

/// Incremental two-sided endpoint matching for one page.
#[derive(Debug, Default)]
pub struct ConnectorResolver {
    pending: IndexMap<String, PendingConnector>,
}

impl ConnectorResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `element` (created for the shape named `element_name`)
    /// touches `connector`.
    ///
    /// The first sighting of a connector inspects its endpoint-relation
    /// metadata: the record whose endpoint shape label matches the current
    /// element's name decides the side, with a `BeginX` relation assigning
    /// the start endpoint and anything else the end. When no record matches (the
    /// reader may surface the other endpoint first) both sides stay empty.
    ///
    /// Any later sighting fills the first empty slot positionally without
    /// re-inspecting metadata. That asymmetric fallback mirrors the source
    /// importer; it can mis-assign direction when shape-processing order
    /// defeats the metadata match, so it logs when it fires.
    pub fn observe(
        &mut self,
        connector: &ConnectorShape,
        element: ElementGuid,
        element_name: &str,
        page: &Page,
    ) {
        match self.pending.entry(connector.id().to_string()) {
            Entry::Vacant(slot) => {
                let mut pending = PendingConnector::default();
                for connect in connector.connects() {
                    let endpoint_label = page
                        .get(&connect.shape().into())
                        .map(|shape| shape.label());
                    if endpoint_label == Some(element_name) {
                        if connect.is_begin() {
                            pending.start = Some(element);
                        } else {
                            pending.end = Some(element);
                        }
                    }
                }
                slot.insert(pending);
            }
            Entry::Occupied(mut slot) => {
                let pending = slot.get_mut();
                if pending.start.is_none() {
                    debug!(
                        connector = connector.id(),
                        element = element_name;
                        "Positional fallback assigned start endpoint"
                    );
                    pending.start = Some(element);
                } else {
                    pending.end = Some(element);
                }
            }
        }
    }

    /// Materialize every valid pending connector as a directed ControlFlow
    /// relationship, consuming the resolver.
    ///
    /// Linking is deferred through element GUIDs; dangling connectors (one
    /// endpoint never resolved) are dropped with a debug-level diagnostic.
    /// An incomplete diagram is something the user can fix, not an error.
    ///
    /// Returns the number of relationships created.
    pub fn complete<R: ModelRepository>(self, repository: &mut R) -> usize {
        let mut created = 0;
        for (id, pending) in self.pending {
            let (Some(start), Some(end)) = (pending.start, pending.end) else {
                debug!(connector = id; "Dropping dangling connector");
                continue;
            };
            if repository.element_by_guid(start).is_none()
                || repository.element_by_guid(end).is_none()
            {
                debug!(connector = id; "Dropping connector with unknown element identity");
                continue;
            }
            repository.create_connector(start, end, ConnectorKind::ControlFlow);
            created += 1;
        }
        created
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
