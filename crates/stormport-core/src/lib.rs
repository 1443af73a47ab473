//! Stormport Core Types and Definitions
//!
//! This crate provides the foundational types for the Stormport event-storming
//! diagram importer. It includes:
//!
//! - **Colors**: the event-storming color taxonomy, legacy-color migration
//!   targets, and classification ([`color`] module)
//! - **Elements**: semantic element kinds derived from shape colors
//!   ([`element`] module)
//! - **Geometry**: bounding boxes and the diagram-to-canvas coordinate
//!   transform ([`geometry`] module)
//! - **Shapes**: flattened leaf shapes and per-page shape sets
//!   ([`shape`] module)

pub mod color;
pub mod element;
pub mod geometry;
pub mod shape;
