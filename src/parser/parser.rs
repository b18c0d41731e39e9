use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::parser::types::*;

// Parser for converting a JSON manifest into directive trees
pub struct TreeParser<'a> {
    manifest: &'a Value,
}

impl<'a> TreeParser<'a> {
    pub fn new(manifest: &'a Value) -> Self {
        Self { manifest }
    }

    /// Parse the manifest as the body of a single block named `name`.
    ///
    /// `name` only labels error paths; shape checks against the block
    /// contract happen in the renderer.
    pub fn parse_tree(&self, name: &str) -> Result<DirectiveTree> {
        parse_value(self.manifest, name)
    }

    /// Parse the manifest as a whole configuration file.
    ///
    /// Accepts either an array of objects (every key of every object is an
    /// entry, in order) or a single object.
    pub fn parse_document(&self) -> Result<Document> {
        let mut document = Document::new();

        match self.manifest {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    let Value::Object(object) = item else {
                        return Err(invalid(
                            &format!("[{}]", index),
                            format!("document entries must be objects, found {}", kind(item)),
                        ));
                    };
                    if object.is_empty() {
                        return Err(invalid(&format!("[{}]", index), "empty document entry"));
                    }
                    self.push_entries(&mut document, object)?;
                }
            }
            Value::Object(object) => self.push_entries(&mut document, object)?,
            other => {
                return Err(invalid(
                    "<document>",
                    format!("expected an array of objects or an object, found {}", kind(other)),
                ))
            }
        }

        debug!(entries = document.entries.len(), "parsed config document");
        Ok(document)
    }

    fn push_entries(&self, document: &mut Document, object: &Map<String, Value>) -> Result<()> {
        for (name, value) in object {
            let tree = parse_value(value, name)?;
            document.entries.push((name.clone(), tree));
        }
        Ok(())
    }
}

impl TryFrom<Value> for DirectiveTree {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        parse_value(&value, "<root>")
    }
}

fn parse_value(value: &Value, path: &str) -> Result<DirectiveTree> {
    if let Some(scalar) = scalar_text(value) {
        return Ok(DirectiveTree::Scalar(scalar));
    }

    match value {
        Value::Object(object) => Ok(DirectiveTree::Mapping(parse_mapping(object, path)?)),
        Value::Array(items) => parse_array(items, path),
        Value::Null => Err(invalid(path, "null is not a directive value")),
        // Strings, numbers and booleans were handled above
        _ => Err(invalid(path, format!("unsupported {}", kind(value)))),
    }
}

fn parse_mapping(object: &Map<String, Value>, path: &str) -> Result<Mapping> {
    let mut mapping = Mapping::new();
    for (key, value) in object {
        let child_path = format!("{}.{}", path, key);
        mapping.insert(key.clone(), parse_value(value, &child_path)?);
    }
    Ok(mapping)
}

fn parse_array(items: &[Value], path: &str) -> Result<DirectiveTree> {
    // An empty array is an empty run of directive lines
    let Some(first) = items.first() else {
        return Ok(DirectiveTree::ScalarList(Vec::new()));
    };

    if first.is_object() {
        let mut mappings = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let item_path = format!("{}[{}]", path, index);
            match item {
                Value::Object(object) => mappings.push(parse_mapping(object, &item_path)?),
                other => {
                    return Err(invalid(
                        &item_path,
                        format!("sequence of blocks mixes in a {}", kind(other)),
                    ))
                }
            }
        }
        return Ok(DirectiveTree::Sequence(mappings));
    }

    let mut values = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match scalar_text(item) {
            Some(text) => values.push(text),
            None => {
                return Err(invalid(
                    &format!("{}[{}]", path, index),
                    format!("list of directive values contains a {}", kind(item)),
                ))
            }
        }
    }
    Ok(DirectiveTree::ScalarList(values))
}

/// Strings as-is, numbers and booleans by their JSON text
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn invalid(path: &str, reason: impl Into<String>) -> Error {
    Error::InvalidTree {
        path: path.to_string(),
        reason: reason.into(),
    }
}
