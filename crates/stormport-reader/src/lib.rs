//! Diagram-file access layer for the Stormport importer.
//!
//! This crate owns the concrete document model the translation core reads:
//! pages, nested shapes, and connector records, loaded from the JSON
//! interchange format that upstream tooling exports event-storming diagrams
//! into. The surface deliberately exposes only the capabilities the core
//! needs (fill color read/write, route-style presence, geometry, children,
//! and connects metadata) rather than a generic property bag.

mod document;
mod error;

pub use document::{Connect, DiagramPage, DiagramShape, Document};
pub use error::ReaderError;
