//! Pedigree CLI library
//!
//! This module contains the core CLI logic for the pedigree layout tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Format};

use std::fs;

use log::{info, warn};

use pedigree::{
    PedigreeBuilder, PedigreeError,
    export::{Exporter, json::Json, svg::Svg},
};

/// Run the pedigree CLI application
///
/// This function reads the input snapshot, lays it out and writes the
/// resulting JSON or SVG document to the output file. Recovered data-quality
/// issues do not stop the run; the count is logged.
///
/// # Errors
///
/// Returns `PedigreeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Missing root individual
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), PedigreeError> {
    let format = args.resolved_format();
    info!(
        input_path = args.input,
        output_path = args.output,
        format:?;
        "Processing pedigree"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(direction) = args.direction {
        app_config.layout_mut().set_direction(direction);
    }

    let source = fs::read_to_string(&args.input)?;

    let builder = PedigreeBuilder::new(app_config);
    let document = builder.parse(&source)?;

    let layout = builder.layout(document.individuals(), document.root())?;
    if !layout.diagnostics().is_empty() {
        warn!(count = layout.diagnostics().len(); "Input has recovered data-quality issues");
    }

    let output = match format {
        Format::Json => Json.export_layout(&layout)?,
        Format::Svg => Svg::new().export_layout(&layout)?,
    };

    fs::write(&args.output, output)?;

    info!(output_file = args.output; "Pedigree exported successfully");

    Ok(())
}
