//! Error types for pedigree operations.
//!
//! This module provides the main error type [`PedigreeError`] which wraps
//! the error conditions that can stop a parse, an edit or a layout.
//! Recoverable data-quality issues are not errors; they are reported as
//! [`Diagnostic`](crate::layout::Diagnostic)s on the layout result.

use std::{io, ops::Range};

use thiserror::Error;

use pedigree_core::identifier::Id;

use crate::{config::ConfigError, editor::EditError};

/// The main error type for pedigree operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text and the byte span of the
/// offending token, so callers can render a labelled report.
#[derive(Debug, Error)]
pub enum PedigreeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("root individual `{0}` is not in the store")]
    MissingRoot(Id),

    #[error("{message}")]
    Parse {
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Edit rejected: {0}")]
    Edit(#[from] EditError),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for PedigreeError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl PedigreeError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: toml::de::Error, src: impl Into<String>) -> Self {
        Self::Parse {
            message: err.message().to_string(),
            span: err.span(),
            src: src.into(),
        }
    }
}
