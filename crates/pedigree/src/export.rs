//! Export functionality for pedigree layouts.
//!
//! This module provides the [`Exporter`] trait that turns a computed
//! [`Layout`] into an output document. It is the final stage in the pedigree
//! processing pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! TOML snapshot
//!     ↓ parse
//! RelationalStore
//!     ↓ layout
//! Layout (nodes, edges, diagnostics)
//!     ↓ export (this module)
//! Output document
//! ```
//!
//! # Available Backends
//!
//! - [`json`]: the node/edge list consumed by a diagramming surface
//! - [`svg`]: a static preview drawn with the `svg` crate
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`PedigreeError::Export`] at the crate
//! boundary.
//!
//! [`PedigreeError::Export`]: crate::PedigreeError::Export

/// JSON export backend.
pub mod json;
/// SVG export backend.
pub mod svg;

use std::{fs, path::Path};

use log::{error, info};

use crate::layout::Layout;

/// Abstraction for layout export backends.
pub trait Exporter {
    /// Renders `layout` into the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the layout cannot be converted to the
    /// target format.
    fn export_layout(&self, layout: &Layout) -> Result<String, Error>;

    /// Renders `layout` and writes the result to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if rendering fails, or [`Error::Io`] if
    /// writing the output fails.
    fn write_layout(&self, layout: &Layout, path: &Path) -> Result<(), Error> {
        let content = self.export_layout(layout)?;
        info!(path:? = path; "Writing output file");
        fs::write(path, content).map_err(|err| {
            error!(path:? = path, err:err; "Failed to write output file");
            Error::Io(err)
        })
    }
}

/// Errors that can occur during layout export.
///
/// This type is converted into [`PedigreeError::Export`] at the crate
/// boundary via the [`From`] implementation in [`crate::error`].
///
/// [`PedigreeError::Export`]: crate::PedigreeError::Export
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
