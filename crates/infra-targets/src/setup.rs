//! Runs fragment generation and merge for each selected target.
//!
//! Targets are independent units of failure. A failing Claude Code update
//! does not stop the Claude Desktop update, and nothing is rolled back.

use std::path::PathBuf;

use infra_config::{ConfigDocument, EnvContext};

use crate::error::Result;
use crate::merger::{DocumentMerger, MergeOutcome};
use crate::schema::TargetKind;
use crate::services::build_fragment;

/// Which targets a run should update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetSelection {
    #[default]
    Both,
    CodeOnly,
    DesktopOnly,
}

impl TargetSelection {
    pub fn targets(self) -> &'static [TargetKind] {
        match self {
            TargetSelection::Both => &TargetKind::ALL,
            TargetSelection::CodeOnly => &[TargetKind::ClaudeCode],
            TargetSelection::DesktopOnly => &[TargetKind::ClaudeDesktop],
        }
    }
}

/// Outcome for a single target.
#[derive(Debug)]
pub struct TargetReport {
    pub kind: TargetKind,
    pub result: Result<MergeOutcome>,
}

impl TargetReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct SetupReport {
    pub targets: Vec<TargetReport>,
}

impl SetupReport {
    /// True only if every attempted target succeeded.
    pub fn is_success(&self) -> bool {
        self.targets.iter().all(TargetReport::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &TargetReport> {
        self.targets.iter().filter(|t| !t.is_success())
    }
}

/// Updates the target registries from one resolved config.
pub struct Setup<'a> {
    doc: &'a ConfigDocument,
    env: &'a EnvContext,
    dry_run: bool,
}

impl<'a> Setup<'a> {
    pub fn new(doc: &'a ConfigDocument, env: &'a EnvContext) -> Self {
        Self {
            doc,
            env,
            dry_run: false,
        }
    }

    /// Compute the documents without writing them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run(&self, selection: TargetSelection) -> SetupReport {
        let targets = selection
            .targets()
            .iter()
            .map(|&kind| TargetReport {
                kind,
                result: self.update(kind),
            })
            .collect();
        SetupReport { targets }
    }

    /// Path the given target resolves to, if the config names it.
    pub fn target_path(&self, kind: TargetKind) -> Result<PathBuf> {
        kind.path(self.doc)
    }

    fn update(&self, kind: TargetKind) -> Result<MergeOutcome> {
        let path = kind.path(self.doc)?;
        let fragment = build_fragment(self.doc, kind)?;
        let merger = match kind {
            TargetKind::ClaudeCode => DocumentMerger::claude_code(self.env.autonomy_dir.clone()),
            TargetKind::ClaudeDesktop => DocumentMerger::claude_desktop(),
        };

        let result = if self.dry_run {
            merger.plan(&path, &fragment)
        } else {
            merger.merge(&path, &fragment)
        };

        match &result {
            Ok(outcome) => tracing::info!(
                kind = %kind,
                path = %outcome.path.display(),
                services = ?outcome.services,
                changed = outcome.changed,
                dry_run = self.dry_run,
                "Updated MCP servers"
            ),
            Err(e) => tracing::error!(kind = %kind, path = %path.display(), error = %e, "Update failed"),
        }
        result
    }
}
