//! JSON document merge for the target registries.
//!
//! The merger owns exactly one subtree per target and replaces it
//! wholesale: the top-level `mcpServers` map, plus (for Claude Code) the
//! `mcpServers` map of the current project record. Every other key in the
//! file is carried through unchanged, in its original order.

use std::path::{Path, PathBuf};

use infra_fs::io;
use serde_json::{Map, Value, json};

use crate::error::{Error, Result};
use crate::schema::{Fragment, TargetKind};

const PROJECTS_KEY: &str = "projects";

/// Result of merging a fragment into one target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub path: PathBuf,
    /// The file did not exist before.
    pub created: bool,
    /// The serialized document differs from what was on disk.
    pub changed: bool,
    /// Names of the services now registered.
    pub services: Vec<String>,
    /// The full document as it was (or would be) written.
    pub contents: String,
}

/// Injects generated fragments into a target document.
#[derive(Debug, Clone)]
pub struct DocumentMerger {
    kind: TargetKind,
    project: Option<String>,
}

impl DocumentMerger {
    /// Merger for `~/.claude.json`, registering servers for `project`.
    pub fn claude_code(project: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::ClaudeCode,
            project: Some(project.into()),
        }
    }

    /// Merger for `claude_desktop_config.json`.
    pub fn claude_desktop() -> Self {
        Self {
            kind: TargetKind::ClaudeDesktop,
            project: None,
        }
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    /// Compute the merged document without touching the filesystem.
    pub fn plan(&self, path: &Path, fragment: &Fragment) -> Result<MergeOutcome> {
        let existing = io::read_text_if_exists(path)?;
        let created = existing.is_none();

        let mut document = match existing.as_deref() {
            Some(text) => serde_json::from_str(text).map_err(|source| Error::Format {
                path: path.to_path_buf(),
                source,
            })?,
            None => {
                tracing::info!(path = %path.display(), kind = %self.kind, "Creating new config file");
                self.kind.skeleton()
            }
        };

        self.inject(&mut document, fragment, path)?;

        let contents = serde_json::to_string_pretty(&document)?;
        let changed = existing.as_deref() != Some(contents.as_str());

        Ok(MergeOutcome {
            path: path.to_path_buf(),
            created,
            changed,
            services: fragment.names(),
            contents,
        })
    }

    /// Merge `fragment` into the file at `path`, creating it if needed.
    ///
    /// The write is skipped when the result is byte-identical to the
    /// existing file.
    pub fn merge(&self, path: &Path, fragment: &Fragment) -> Result<MergeOutcome> {
        let outcome = self.plan(path, fragment)?;
        if outcome.changed {
            io::write_text(path, &outcome.contents)?;
        } else {
            tracing::debug!(path = %path.display(), "Config already up to date");
        }
        Ok(outcome)
    }

    fn inject(&self, document: &mut Value, fragment: &Fragment, path: &Path) -> Result<()> {
        let spec = self.kind.spec();
        let servers = fragment.to_json(&spec);
        let root = object_at(document, path, "")?;

        if let Some(project) = &self.project {
            let projects = root
                .entry(PROJECTS_KEY)
                .or_insert_with(|| json!({}));
            let projects = object_at(projects, path, "/projects")?;

            if !projects.contains_key(project) {
                tracing::info!(project = %project, "Adding project record");
                projects.insert(project.clone(), default_project_record());
            }
            let pointer = format!("/projects/{}", escape_pointer(project));
            let record = projects
                .get_mut(project)
                .ok_or_else(|| shape_error(path, &pointer))?;
            let record = object_at(record, path, &pointer)?;
            record.insert(spec.servers_key.to_string(), servers.clone());
        }

        root.insert(spec.servers_key.to_string(), servers);
        Ok(())
    }
}

/// A fresh project record as Claude Code writes it.
pub fn default_project_record() -> Value {
    json!({
        "allowedTools": [],
        "history": [],
        "mcpContextUris": [],
        "mcpServers": {},
        "enabledMcpjsonServers": [],
        "disabledMcpjsonServers": [],
        "hasTrustDialogAccepted": true
    })
}

fn object_at<'a>(value: &'a mut Value, path: &Path, pointer: &str) -> Result<&'a mut Map<String, Value>> {
    value
        .as_object_mut()
        .ok_or_else(|| shape_error(path, pointer))
}

fn shape_error(path: &Path, pointer: &str) -> Error {
    Error::UnexpectedShape {
        path: path.to_path_buf(),
        pointer: if pointer.is_empty() { "/".to_string() } else { pointer.to_string() },
    }
}

/// Escape a key for use in a JSON pointer (RFC 6901).
fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}
