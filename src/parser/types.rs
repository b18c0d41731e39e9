use std::collections::BTreeMap;

use serde::Serialize;

/// Key whose value becomes the opening argument of a block
pub const THIS_KEY: &str = "this";

// Directive tree - the input of the config renderer

#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveTree {
    /// `Name value`
    Scalar(String),
    /// One `Name value` line per element
    ScalarList(Vec<String>),
    /// A nested `<Name arg>` block
    Mapping(Mapping),
    /// Repeated sibling blocks sharing one name
    Sequence(Vec<Mapping>),
}

impl DirectiveTree {
    /// Short name of the variant, used in error messages
    pub fn shape(&self) -> &'static str {
        match self {
            DirectiveTree::Scalar(_) => "scalar",
            DirectiveTree::ScalarList(_) => "list of scalars",
            DirectiveTree::Mapping(_) => "mapping",
            DirectiveTree::Sequence(_) => "sequence of mappings",
        }
    }
}

impl From<&str> for DirectiveTree {
    fn from(value: &str) -> Self {
        DirectiveTree::Scalar(value.to_string())
    }
}

impl From<String> for DirectiveTree {
    fn from(value: String) -> Self {
        DirectiveTree::Scalar(value)
    }
}

impl From<Vec<&str>> for DirectiveTree {
    fn from(values: Vec<&str>) -> Self {
        DirectiveTree::ScalarList(values.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for DirectiveTree {
    fn from(values: Vec<String>) -> Self {
        DirectiveTree::ScalarList(values)
    }
}

impl From<Mapping> for DirectiveTree {
    fn from(mapping: Mapping) -> Self {
        DirectiveTree::Mapping(mapping)
    }
}

impl From<Vec<Mapping>> for DirectiveTree {
    fn from(mappings: Vec<Mapping>) -> Self {
        DirectiveTree::Sequence(mappings)
    }
}

/// Insertion-ordered map of directive name to value.
///
/// Inserting a key that is already present replaces its value and keeps
/// the original position, so keys stay unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, DirectiveTree)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DirectiveTree>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<DirectiveTree>,
    ) -> Option<DirectiveTree> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&DirectiveTree> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Value of the reserved `this` key, if any
    pub fn argument(&self) -> Option<&DirectiveTree> {
        self.get(THIS_KEY)
    }

    /// Entries in insertion order, `this` excluded
    pub fn directives(&self) -> impl Iterator<Item = (&str, &DirectiveTree)> {
        self.iter().filter(|(key, _)| *key != THIS_KEY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DirectiveTree)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, DirectiveTree)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, DirectiveTree)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

/// One configuration file: named entries in order, names may repeat
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub entries: Vec<(String, DirectiveTree)>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<DirectiveTree>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }
}

// Structures parsed from apachectl output

/// JSON key of [`FullVersion::compiled_with`]
pub const COMPILED_WITH: &str = "compiled_with";

/// `apachectl -V`
///
/// `info` is flattened next to `compiled_with` and never holds that key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FullVersion {
    pub compiled_with: Vec<String>,
    #[serde(flatten)]
    pub info: BTreeMap<String, String>,
}

/// `apachectl -M`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadedModules {
    #[serde(rename = "static")]
    pub static_modules: Vec<String>,
    pub shared: Vec<String>,
}

/// One virtual host line of `apachectl -S`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VirtualHostEntry {
    pub vhost: String,
    pub conf: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
}

/// NameVirtualHost address → (vhost name or `default`) → entry
pub type VirtualHosts = BTreeMap<String, BTreeMap<String, VirtualHostEntry>>;
