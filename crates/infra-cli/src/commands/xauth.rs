//! Print the X11 authority path.

use infra_config::{ConfigDocument, EnvContext, detect_xauthority};

/// Returns false when no authority file could be determined.
pub fn run_xauth(doc: &ConfigDocument, env: &EnvContext) -> bool {
    match detect_xauthority(doc, env) {
        Some(path) => {
            println!("{path}");
            true
        }
        None => {
            tracing::warn!(uid = env.uid, "No X11 authority file found");
            false
        }
    }
}
