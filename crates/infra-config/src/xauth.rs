//! X11 authority lookup for desktop automation under Xwayland.

use std::fs;
use std::path::Path;

use crate::document::{ConfigDocument, sections};
use crate::env::EnvContext;

const RUNTIME_ROOT: &str = "/run/user";
const MUTTER_AUTH_PREFIX: &str = ".mutter-Xwaylandauth.";
const PATTERN_KEY: &str = "XAUTH_PATTERN";

/// Find the current Xwayland authority file for the user in `env`.
///
/// Looks for `/run/user/<uid>/.mutter-Xwaylandauth.*` first and falls back
/// to `X11_CONFIG.XAUTH_PATTERN`.
pub fn detect_xauthority(doc: &ConfigDocument, env: &EnvContext) -> Option<String> {
    detect_xauthority_in(Path::new(RUNTIME_ROOT), doc, env)
}

/// Same as [`detect_xauthority`] with an explicit runtime root.
pub fn detect_xauthority_in(
    runtime_root: &Path,
    doc: &ConfigDocument,
    env: &EnvContext,
) -> Option<String> {
    let auth_dir = runtime_root.join(env.uid.to_string());

    if let Ok(entries) = fs::read_dir(&auth_dir) {
        let mut matches: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_string_lossy()
                    .starts_with(MUTTER_AUTH_PREFIX)
            })
            .map(|e| e.path())
            .collect();
        matches.sort();
        if let Some(found) = matches.into_iter().next() {
            return Some(found.to_string_lossy().into_owned());
        }
    }

    let pattern = doc.get_non_empty(sections::X11_CONFIG, PATTERN_KEY);
    tracing::debug!(dir = %auth_dir.display(), ?pattern, "No Xwayland auth file found");
    pattern.map(str::to_string)
}
