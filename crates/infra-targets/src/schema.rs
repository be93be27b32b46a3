//! Service entries and the JSON shapes each target expects.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use infra_config::{ConfigDocument, sections};
use serde_json::{Map, Value, json};

use crate::error::{Error, Result};

/// File name of the Claude Desktop registry inside `PATHS.CLAUDE_CONFIG_DIR`.
pub const DESKTOP_CONFIG_FILE: &str = "claude_desktop_config.json";

/// An MCP server launched as a local process over stdio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEntry {
    pub name: String,
    pub command: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

impl ServiceEntry {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Render this entry in the JSON shape described by `spec`.
    pub fn to_json(&self, spec: &TargetSpec) -> Value {
        let mut obj = Map::new();
        if let Some(type_val) = spec.stdio_type {
            obj.insert("type".into(), json!(type_val));
        }
        obj.insert("command".into(), json!(self.command));
        obj.insert("args".into(), json!(self.args));
        if spec.emit_empty_env || !self.env.is_empty() {
            obj.insert("env".into(), json!(self.env));
        }
        Value::Object(obj)
    }
}

/// The generated services for one target, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    entries: IndexMap<String, ServiceEntry>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: ServiceEntry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&ServiceEntry> {
        self.entries.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as the `mcpServers` object for `spec`.
    pub fn to_json(&self, spec: &TargetSpec) -> Value {
        let servers: Map<String, Value> = self
            .entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.to_json(spec)))
            .collect();
        Value::Object(servers)
    }
}

/// How a target names and shapes its server entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    /// Key of the servers map.
    pub servers_key: &'static str,
    /// Value of the `"type"` discriminator, if the target wants one.
    pub stdio_type: Option<&'static str>,
    /// Whether `"env": {}` is written for entries without variables.
    pub emit_empty_env: bool,
}

/// The two documents the setup tool maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// `~/.claude.json`: global servers plus a per-project record.
    ClaudeCode,
    /// `claude_desktop_config.json`: a flat servers map.
    ClaudeDesktop,
}

impl TargetKind {
    pub const ALL: [TargetKind; 2] = [TargetKind::ClaudeCode, TargetKind::ClaudeDesktop];

    pub fn label(self) -> &'static str {
        match self {
            TargetKind::ClaudeCode => "Claude Code",
            TargetKind::ClaudeDesktop => "Claude Desktop",
        }
    }

    pub fn spec(self) -> TargetSpec {
        match self {
            TargetKind::ClaudeCode => TargetSpec {
                servers_key: "mcpServers",
                stdio_type: Some("stdio"),
                emit_empty_env: true,
            },
            TargetKind::ClaudeDesktop => TargetSpec {
                servers_key: "mcpServers",
                stdio_type: None,
                emit_empty_env: false,
            },
        }
    }

    /// Document used when the target file does not exist yet.
    pub fn skeleton(self) -> Value {
        match self {
            TargetKind::ClaudeCode => json!({ "projects": {}, "mcpServers": {} }),
            TargetKind::ClaudeDesktop => json!({ "mcpServers": {} }),
        }
    }

    /// Resolve the on-disk location of this target from the config.
    pub fn path(self, doc: &ConfigDocument) -> Result<PathBuf> {
        match self {
            TargetKind::ClaudeCode => {
                let path = require_path(doc, "CLAUDE_JSON_PATH")?;
                Ok(PathBuf::from(path))
            }
            TargetKind::ClaudeDesktop => {
                let dir = require_path(doc, "CLAUDE_CONFIG_DIR")?;
                Ok(PathBuf::from(dir).join(DESKTOP_CONFIG_FILE))
            }
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn require_path<'a>(doc: &'a ConfigDocument, key: &str) -> Result<&'a str> {
    doc.get_non_empty(sections::PATHS, key)
        .ok_or_else(|| Error::missing(sections::PATHS, key))
}
