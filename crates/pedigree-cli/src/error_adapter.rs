//! Error adapter for converting PedigreeError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Parse errors carry
//! their source text and the span of the offending token, which is rendered
//! as a labelled snippet.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use pedigree::PedigreeError;

/// Adapter for [`PedigreeError`].
pub struct ErrorAdapter<'a>(pub &'a PedigreeError);

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
            PedigreeError::Io(_) => "pedigree::io",
            PedigreeError::MissingRoot(_) => "pedigree::missing_root",
            PedigreeError::Parse { .. } => "pedigree::parse",
            PedigreeError::Config(_) => "pedigree::config",
            PedigreeError::Edit(_) => "pedigree::edit",
            PedigreeError::Export(_) => "pedigree::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            PedigreeError::MissingRoot(_) => "the `root` key must name an individual table",
            PedigreeError::Config(_) => "spacing must be positive and at least the node size",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match &self.0 {
            PedigreeError::Parse { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let PedigreeError::Parse {
            span: Some(span), ..
        } = &self.0
        else {
            return None;
        };
        let label = LabeledSpan::new_primary_with_span(
            Some("here".to_string()),
            SourceSpan::from(span.clone()),
        );
        Some(Box::new(std::iter::once(label)))
    }
}
