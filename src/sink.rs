//! Writing rendered configuration to disk.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::DEFAULT_MANAGED_HEADER;
use crate::error::{Error, Result};
use crate::parser::Document;
use crate::renderer::ConfigRenderer;

/// Destination for rendered configuration text
pub trait ConfigSink {
    fn write(&self, path: &Path, text: &str) -> Result<()>;
}

/// Writes files prefixed with a "managed by" header line
#[derive(Debug, Clone)]
pub struct FileSink {
    header: String,
}

impl FileSink {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new(DEFAULT_MANAGED_HEADER)
    }
}

impl ConfigSink for FileSink {
    fn write(&self, path: &Path, text: &str) -> Result<()> {
        let mut content = String::with_capacity(self.header.len() + text.len() + 1);
        content.push_str(&self.header);
        content.push('\n');
        content.push_str(text);

        fs::write(path, content).map_err(|e| Error::io(path, e))?;
        info!(path = %path.display(), bytes = text.len(), "wrote config");
        Ok(())
    }
}

/// Render `document` and, when `edit` is set, hand it to `sink` for `path`.
///
/// Returns the rendered text either way.
pub fn write_config<S: ConfigSink + ?Sized>(
    renderer: &ConfigRenderer,
    path: &Path,
    document: &Document,
    sink: &S,
    edit: bool,
) -> Result<String> {
    let text = renderer.render_document(document)?;
    if edit {
        sink.write(path, &text)?;
    }
    Ok(text)
}
