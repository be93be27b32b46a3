//! Locate the built entry point of a Node-based MCP server.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

/// Most servers build here; also the fallback guess.
pub const PRIMARY_OUTPUT: &str = "dist/index.js";
/// Used by some servers (linear-mcp, for example).
pub const SECONDARY_OUTPUT: &str = "build/index.js";
pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    main: Option<String>,
}

/// Return the best-guess path to the entry point of the server in `dir`.
///
/// Probes `dist/index.js`, then `build/index.js`, then the `main` field of
/// `package.json` (accepted only when that file exists). When nothing is
/// found a warning is logged and `dir/dist/index.js` is returned anyway,
/// since the server may simply not have been built yet.
pub fn locate_artifact(dir: impl AsRef<Path>) -> String {
    let dir = dir.as_ref();

    let primary = dir.join(PRIMARY_OUTPUT);
    if primary.exists() {
        return display(&primary);
    }

    let secondary = dir.join(SECONDARY_OUTPUT);
    if secondary.exists() {
        return display(&secondary);
    }

    if let Some(main) = manifest_entry(dir) {
        return display(&main);
    }

    tracing::warn!(
        dir = %dir.display(),
        looked_for = ?[PRIMARY_OUTPUT, SECONDARY_OUTPUT, MANIFEST_FILE],
        fallback = %primary.display(),
        "Could not find built MCP server; it may need to be built"
    );
    display(&primary)
}

fn manifest_entry(dir: &Path) -> Option<PathBuf> {
    let manifest_path = dir.join(MANIFEST_FILE);
    let content = fs::read_to_string(&manifest_path).ok()?;
    let manifest: PackageManifest = match serde_json::from_str(&content) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(path = %manifest_path.display(), error = %e, "Ignoring unreadable manifest");
            return None;
        }
    };

    let main = manifest.main.filter(|m| !m.is_empty())?;
    let candidate = join_clean(dir, &main);
    candidate.exists().then_some(candidate)
}

/// Join `rel` onto `base`, dropping `.` components.
fn join_clean(base: &Path, rel: &str) -> PathBuf {
    let mut out = base.to_path_buf();
    for component in Path::new(rel).components() {
        match component {
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
