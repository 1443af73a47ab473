//! Error adapter for converting ImportError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Import errors
//! carry no source-code spans, so the adapter contributes error codes and
//! help text only.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use stormport::ImportError;

/// Adapter wrapping an [`ImportError`] for miette rendering.
pub struct ErrorAdapter<'a>(pub &'a ImportError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            ImportError::Io(_) => "stormport::io",
            ImportError::Reader(_) => "stormport::reader",
            ImportError::Repository(_) => "stormport::repository",
            ImportError::MalformedDiagram(_) => "stormport::malformed_diagram",
            ImportError::Report(_) => "stormport::report",
            ImportError::NoInputFiles { .. } => "stormport::no_input_files",
            ImportError::Config(_) => "stormport::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help: &str = match &self.0 {
            ImportError::NoInputFiles { .. } => {
                "pass a diagram file, or a directory containing diagram files \
                 with the configured extension"
            }
            ImportError::Repository(_) => {
                "check that the model store path exists and contains a valid model"
            }
            ImportError::MalformedDiagram(_) => {
                "the source diagram reuses a shape id within one page; fix the \
                 diagram and re-run"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
