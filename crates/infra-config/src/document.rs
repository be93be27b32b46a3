//! In-memory model of a parsed infrastructure config.

use indexmap::IndexMap;
use serde::Serialize;

/// Section names the setup tool reads. Other sections are kept verbatim.
pub mod sections {
    pub const CREDENTIALS: &str = "CREDENTIALS";
    pub const PATHS: &str = "PATHS";
    pub const CORE_MCP_SERVERS: &str = "CORE_MCP_SERVERS";
    pub const EXTERNAL_MCP_SERVERS: &str = "EXTERNAL_MCP_SERVERS";
    pub const X11_CONFIG: &str = "X11_CONFIG";
}

/// A named group of key/value pairs, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Section {
    entries: IndexMap<String, String>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Insert or overwrite a key. An overwritten key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut String> {
        self.entries.values_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Ordered collection of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    sections: IndexMap<String, Section>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a section for writing.
    ///
    /// Re-opening an existing section keeps its position but discards
    /// the keys it held before.
    pub fn open_section(&mut self, name: impl Into<String>) -> &mut Section {
        let section = self.sections.entry(name.into()).or_default();
        section.clear();
        section
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub(crate) fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(name)
    }

    /// Look up `key` in `section`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key)
    }

    /// Look up `key` in `section`, treating an empty value as absent.
    pub fn get_non_empty(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key).filter(|v| !v.is_empty())
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn sections_mut(&mut self) -> impl Iterator<Item = &mut Section> {
        self.sections.values_mut()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
