//! Sectioned `KEY=value` parser.

use std::fs;
use std::path::{Path, PathBuf};

use crate::document::ConfigDocument;
use crate::env::EnvContext;
use crate::error::{Error, Result};
use crate::resolver::resolve_cross_references;

/// How the parser treats lines it cannot interpret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParsePolicy {
    /// Skip malformed lines and keep going.
    #[default]
    Lenient,
    /// Fail on the first malformed line.
    Strict,
}

/// One interpreted source line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Skip,
    Header(&'a str),
    Entry(&'a str, &'a str),
    Malformed,
}

fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return Line::Skip;
    }
    if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
        return Line::Header(name);
    }
    match line.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Line::Entry(key.trim(), value.trim()),
        _ => Line::Malformed,
    }
}

/// Parses the infrastructure config format and resolves both
/// substitution passes.
#[derive(Debug, Clone)]
pub struct ConfigParser {
    env: EnvContext,
    policy: ParsePolicy,
}

impl ConfigParser {
    pub fn new(env: EnvContext) -> Self {
        Self {
            env,
            policy: ParsePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ParsePolicy {
        self.policy
    }

    /// Read and resolve the config file at `path`.
    pub fn parse_file(&self, path: &Path) -> Result<ConfigDocument> {
        tracing::debug!(path = %path.display(), policy = ?self.policy, "Parsing config");
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_source(&content, path)
    }

    /// Resolve config text that did not come from a file.
    pub fn parse_str(&self, content: &str) -> Result<ConfigDocument> {
        self.parse_source(content, Path::new("<string>"))
    }

    fn parse_source(&self, content: &str, origin: &Path) -> Result<ConfigDocument> {
        let mut doc = ConfigDocument::new();
        let mut current: Option<String> = None;

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            match classify(raw) {
                Line::Skip => {}
                Line::Header("") => {
                    tracing::debug!(path = %origin.display(), line = line_no, "Empty section header closes the current section");
                    current = None;
                }
                Line::Header(name) => {
                    doc.open_section(name);
                    current = Some(name.to_string());
                }
                Line::Entry(key, value) => {
                    let Some(section) = current.as_deref() else {
                        self.malformed(origin, line_no, raw, "entry outside any section")?;
                        continue;
                    };
                    let value = self.env.substitute(value);
                    if let Some(target) = doc.section_mut(section) {
                        target.insert(key, value);
                    }
                }
                Line::Malformed => {
                    self.malformed(origin, line_no, raw, "unrecognised line")?;
                }
            }
        }

        resolve_cross_references(&mut doc);
        Ok(doc)
    }

    fn malformed(&self, origin: &Path, line: usize, raw: &str, reason: &str) -> Result<()> {
        match self.policy {
            ParsePolicy::Lenient => {
                tracing::debug!(path = %origin.display(), line, reason, "Skipping config line");
                Ok(())
            }
            ParsePolicy::Strict => Err(Error::Malformed {
                path: PathBuf::from(origin),
                line,
                content: raw.trim().to_string(),
            }),
        }
    }
}
