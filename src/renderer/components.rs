/// Helper for rendering section container tags
pub struct BlockRenderer;

impl BlockRenderer {
    pub fn render_open(&self, name: &str, argument: Option<&str>) -> String {
        match argument {
            Some(argument) => format!("<{} {}>\n", name, argument),
            None => format!("<{}>\n", name),
        }
    }

    pub fn render_close(&self, name: &str) -> String {
        format!("</{}>\n", name)
    }
}

/// Helper for rendering plain directive lines
pub struct DirectiveRenderer;

impl DirectiveRenderer {
    pub fn render_line(&self, name: &str, value: &str) -> String {
        format!("{} {}\n", name, value)
    }

    /// One line per value, in order
    pub fn render_lines(&self, name: &str, values: &[String]) -> String {
        let mut output = String::new();
        for value in values {
            output.push_str(&self.render_line(name, value));
        }
        output
    }
}
