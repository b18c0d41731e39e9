use tracing::debug;

use crate::error::{Error, Result};
use crate::parser::*;
use crate::renderer::components::*;
use crate::renderer::traits::*;

/// Renders directive trees into Apache configuration text.
///
/// Rendering is pure: the same tree always produces the same text, and a
/// renderer can be shared freely between threads.
#[derive(Debug, Clone, Copy)]
pub struct ConfigRenderer {
    max_depth: usize,
}

impl ConfigRenderer {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Render `tree` as one or more blocks named `block`.
    ///
    /// A mapping gives one block; a sequence gives one block per element,
    /// concatenated in order. Bare scalars and lists are rejected since
    /// they have no block structure.
    pub fn render(&self, block: &str, tree: &DirectiveTree) -> Result<String> {
        let context = RenderContext::with_max_depth(self.max_depth);

        let output = match tree {
            DirectiveTree::Mapping(mapping) => mapping.render(block, &context)?,
            DirectiveTree::Sequence(mappings) => {
                let mut output = String::new();
                for mapping in mappings {
                    output.push_str(&mapping.render(block, &context)?);
                }
                output
            }
            other => {
                return Err(Error::NotABlock {
                    block: block.to_string(),
                    shape: other.shape(),
                })
            }
        };

        debug!(block, bytes = output.len(), "rendered block");
        Ok(output)
    }

    /// Render a whole configuration file.
    ///
    /// Scalar entries become a single directive line, lists one line per
    /// value, everything else a block. Entries are separated by newlines.
    pub fn render_document(&self, document: &Document) -> Result<String> {
        let directive_renderer = DirectiveRenderer;
        let mut parts = Vec::with_capacity(document.entries.len());

        for (name, tree) in &document.entries {
            let part = match tree {
                DirectiveTree::Scalar(value) => format!("{} {}", name, value),
                DirectiveTree::ScalarList(values) => directive_renderer.render_lines(name, values),
                _ => self.render(name, tree)?,
            };
            parts.push(part);
        }

        Ok(parts.join("\n"))
    }
}

impl Default for ConfigRenderer {
    fn default() -> Self {
        Self::new()
    }
}
