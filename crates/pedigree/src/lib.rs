//! Pedigree - A layout engine for genealogy diagrams.
//!
//! Given a set of individuals and their family relationships, the engine
//! assigns every individual a generation row and a non-overlapping position,
//! groups children into nuclear families, and synthesizes the parent-child,
//! spousal and sibling edges a diagramming surface needs to draw the tree.
//!
//! The [`PedigreeBuilder`] drives the whole pipeline: parse a TOML snapshot,
//! compute a [`layout::Layout`], and export it as JSON or as an SVG preview.
//! The [`editor::Editor`] applies incremental edits and recomputes the layout
//! after each one.

pub mod config;
pub mod editor;
pub mod export;
pub mod layout;
pub mod structure;

mod error;

pub use pedigree_core::{geometry, identifier, individual, store};

pub use error::PedigreeError;

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use config::{AppConfig, Direction, LayoutConfig, Spacing};
use editor::{Editor, IdGenerator};
use export::Exporter;
use identifier::Id;
use layout::Layout;
use store::RelationalStore;

/// A pedigree snapshot: the root individual and the store.
///
/// In TOML the root is a top-level key and every individual is a table
/// under `individuals`, keyed by its identifier. Table order is store order.
///
/// ```toml
/// root = "f"
///
/// [individuals.f]
/// name = "Father"
/// spouses = ["m"]
/// children = ["c"]
///
/// [individuals.m]
/// name = "Mother"
/// is_spouse = true
/// children = ["c"]
///
/// [individuals.c]
/// name = "Child"
/// parents = ["f", "m"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    root: Id,
    #[serde(default)]
    individuals: RelationalStore,
}

impl Document {
    pub fn new(root: Id, individuals: RelationalStore) -> Self {
        Self { root, individuals }
    }

    pub fn root(&self) -> Id {
        self.root
    }

    pub fn individuals(&self) -> &RelationalStore {
        &self.individuals
    }

    pub fn into_parts(self) -> (Id, RelationalStore) {
        (self.root, self.individuals)
    }
}

/// Computes the layout of `store` with default spacing.
///
/// # Errors
///
/// Returns [`PedigreeError::MissingRoot`] when `store` is not empty and does
/// not contain `root`.
///
/// # Examples
///
/// ```
/// use pedigree::{compute_layout, config::Direction};
/// use pedigree::{identifier::Id, individual::Individual, store::RelationalStore};
///
/// let store: RelationalStore = [Individual::new(Id::new("me"), "Me")].into_iter().collect();
/// let layout = compute_layout(&store, Id::new("me"), Direction::TopToBottom).unwrap();
///
/// assert_eq!(layout.nodes().len(), 1);
/// assert!(layout.edges().is_empty());
/// ```
pub fn compute_layout(
    store: &RelationalStore,
    root: Id,
    direction: Direction,
) -> Result<Layout, PedigreeError> {
    layout::compute(
        store,
        root,
        &LayoutConfig::new(direction, Spacing::default()),
    )
}

/// Builder for parsing, laying out and rendering pedigrees.
///
/// # Examples
///
/// ```rust,no_run
/// use pedigree::{PedigreeBuilder, config::AppConfig};
///
/// let source = r#"
/// root = "me"
///
/// [individuals.me]
/// name = "Me"
/// "#;
///
/// let builder = PedigreeBuilder::new(AppConfig::default());
/// let document = builder.parse(source).expect("Failed to parse");
/// let svg = builder.render_svg(&document).expect("Failed to render");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PedigreeBuilder {
    config: AppConfig,
}

impl PedigreeBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a TOML snapshot into a [`Document`].
    ///
    /// # Errors
    ///
    /// Returns [`PedigreeError::Parse`] with the byte span of the offending
    /// token when the source is not a valid snapshot.
    ///
    /// # Examples
    ///
    /// ```
    /// use pedigree::PedigreeBuilder;
    ///
    /// let document = PedigreeBuilder::default()
    ///     .parse("root = \"me\"\n[individuals.me]\nname = \"Me\"\n")
    ///     .unwrap();
    /// assert_eq!(document.individuals().len(), 1);
    /// ```
    pub fn parse(&self, source: &str) -> Result<Document, PedigreeError> {
        info!("Parsing pedigree snapshot");

        let document: Document =
            toml::from_str(source).map_err(|err| PedigreeError::new_parse_error(err, source))?;

        debug!(
            root:% = document.root(),
            individuals = document.individuals().len();
            "Snapshot parsed successfully"
        );
        trace!(document:?; "Parsed document");

        Ok(document)
    }

    /// Compute the layout of `store` with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`PedigreeError::Config`] for invalid spacing and
    /// [`PedigreeError::MissingRoot`] when `root` is not in a non-empty store.
    pub fn layout(&self, store: &RelationalStore, root: Id) -> Result<Layout, PedigreeError> {
        let config = self.config.layout();
        config.validate()?;
        layout::compute(store, root, config)
    }

    /// Lay out a document and render it as the JSON node/edge list.
    ///
    /// # Errors
    ///
    /// See [`PedigreeBuilder::layout`]; rendering failures are reported as
    /// [`PedigreeError::Export`].
    pub fn render_json(&self, document: &Document) -> Result<String, PedigreeError> {
        let layout = self.layout(document.individuals(), document.root())?;
        let json = export::json::Json.export_layout(&layout)?;
        info!("JSON rendered successfully");
        Ok(json)
    }

    /// Lay out a document and render it as an SVG preview.
    ///
    /// # Errors
    ///
    /// See [`PedigreeBuilder::render_json`].
    pub fn render_svg(&self, document: &Document) -> Result<String, PedigreeError> {
        let layout = self.layout(document.individuals(), document.root())?;
        let svg = export::svg::Svg::new().export_layout(&layout)?;
        info!("SVG rendered successfully");
        Ok(svg)
    }

    /// Start editing `document` with the configured layout options.
    pub fn editor<G: IdGenerator>(&self, document: Document, ids: G) -> Editor<G> {
        Editor::from_document(document, ids).with_config(self.config.layout().clone())
    }
}
