//! Configuration types for the importer.
//!
//! [`AppConfig`] groups the target-canvas constants and the file-discovery
//! settings. All types implement [`serde::Deserialize`] so the CLI can load
//! them from a TOML file; every field has a default matching the source
//! diagram convention.

use serde::Deserialize;

use stormport_core::geometry::CanvasSpec;

/// Default file extension for diagram files discovered in a directory.
pub const DEFAULT_DIAGRAM_EXTENSION: &str = "storm.json";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Target canvas section.
    #[serde(default)]
    canvas: CanvasSpec,

    /// Input discovery section.
    #[serde(default)]
    discovery: DiscoveryConfig,
}

impl AppConfig {
    pub fn new(canvas: CanvasSpec, discovery: DiscoveryConfig) -> Self {
        Self { canvas, discovery }
    }

    /// Returns the canvas configuration.
    pub fn canvas(&self) -> CanvasSpec {
        self.canvas
    }

    /// Returns the discovery configuration.
    pub fn discovery(&self) -> &DiscoveryConfig {
        &self.discovery
    }
}

/// Controls how diagram files are discovered when the input is a directory.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// Extension (without the leading dot) a file must end with to count as
    /// a diagram file.
    #[serde(default = "default_extension")]
    extension: String,
}

fn default_extension() -> String {
    DEFAULT_DIAGRAM_EXTENSION.to_string()
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
        }
    }
}

impl DiscoveryConfig {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}
