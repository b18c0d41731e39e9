use crate::error::{Error, Result};
use crate::parser::*;
use crate::renderer::components::*;
use crate::renderer::traits::*;

impl Render for Mapping {
    fn render(&self, name: &str, context: &RenderContext) -> Result<String> {
        if context.depth > context.max_depth {
            return Err(Error::NestingTooDeep {
                block: name.to_string(),
                limit: context.max_depth,
            });
        }

        let argument = match self.argument() {
            None => None,
            Some(DirectiveTree::Scalar(value)) => Some(value.as_str()),
            Some(other) => {
                return Err(Error::InvalidArgument {
                    block: name.to_string(),
                    shape: other.shape(),
                })
            }
        };

        let block_renderer = BlockRenderer;
        let mut output = block_renderer.render_open(name, argument);

        // `this` is never a directive line, wherever it sits in the mapping
        let body_context = context.nested();
        for (key, value) in self.directives() {
            output.push_str(&value.render(key, &body_context)?);
        }

        output.push_str(&block_renderer.render_close(name));
        Ok(output)
    }
}

impl Render for DirectiveTree {
    fn render(&self, name: &str, context: &RenderContext) -> Result<String> {
        let directive_renderer = DirectiveRenderer;

        let output = match self {
            DirectiveTree::Scalar(value) => directive_renderer.render_line(name, value),
            DirectiveTree::ScalarList(values) => {
                let mut output = directive_renderer.render_lines(name, values);
                output.push('\n');
                output
            }
            DirectiveTree::Mapping(mapping) => {
                let mut output = mapping.render(name, context)?;
                output.push('\n');
                output
            }
            DirectiveTree::Sequence(mappings) => {
                let mut output = String::new();
                for mapping in mappings {
                    output.push_str(&mapping.render(name, context)?);
                    output.push('\n');
                }
                output
            }
        };

        Ok(output)
    }
}
