//! Stormport imports event-storming diagrams into a typed model repository.
//!
//! Event-storming diagrams arrive as a page/shape/connector graph with
//! geometric and color attributes. Stormport translates each page into typed,
//! positioned model elements and directed relationships:
//!
//! ```text
//! Diagram file (stormport-reader)
//!     ↓ flatten
//! FlattenedShape sets per page (groups folded into absolute positions)
//!     ↓ classify + migrate
//! Allowed colors (legacy colors rewritten, disallowed colors veto the file)
//!     ↓ translate
//! Elements, placements, directed connectors (ModelRepository)
//! ```
//!
//! The [`translate::Translator`] drives the pipeline file by file; pages,
//! then shapes, are processed strictly sequentially. Connector resolution is
//! page-scoped: a fresh [`connector::ConnectorResolver`] lives for exactly
//! one page, so dangling connector fragments never leak across pages.

pub mod config;
pub mod connector;
pub mod flatten;
pub mod report;
pub mod repository;
pub mod translate;

mod error;

pub use stormport_core::{color, element, geometry, shape};

pub use error::ImportError;
