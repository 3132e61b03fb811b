use log::debug;

use super::{Error, Exporter};
use crate::layout::Layout;

/// Writes the layout as pretty-printed JSON.
///
/// The document has three arrays: `nodes`, `edges` and `diagnostics`. Field
/// order follows declaration order and node order follows the layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Exporter for Json {
    fn export_layout(&self, layout: &Layout) -> Result<String, Error> {
        let content =
            serde_json::to_string_pretty(layout).map_err(|err| Error::Render(err.to_string()))?;
        debug!(bytes = content.len(); "JSON document rendered");
        Ok(content)
    }
}
