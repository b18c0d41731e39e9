use crate::error::Result;

/// Default limit on how deeply blocks may nest
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration context for rendering operations
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub depth: usize,
    pub max_depth: usize,
}

impl RenderContext {
    pub fn new() -> Self {
        Self {
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
        }
    }

    /// Context for the body of a block one level down
    pub fn nested(&self) -> Self {
        Self {
            depth: self.depth + 1,
            max_depth: self.max_depth,
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Core rendering trait for directive tree values.
///
/// `name` is the directive or block name the value is bound to.
pub trait Render {
    fn render(&self, name: &str, context: &RenderContext) -> Result<String>;
}
