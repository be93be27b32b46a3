//! Process identity captured once at startup.
//!
//! The parser never reads the environment itself; it receives an
//! [`EnvContext`] so tests can inject a fake identity.

use std::path::PathBuf;

/// Overrides the detected user name.
pub const USER_OVERRIDE_VAR: &str = "CLAUDE_USER";
/// Overrides the detected home directory.
pub const HOME_OVERRIDE_VAR: &str = "CLAUDE_HOME";
/// Overrides the autonomy (tool install) directory.
pub const AUTONOMY_DIR_VAR: &str = "CLAP_DIR";

const FALLBACK_USER: &str = "claude";

/// Immutable identity values substituted during the environment pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvContext {
    /// Value for `$LINUX_USER` and `$(whoami)`
    pub user: String,
    /// Value for `$HOME`
    pub home: String,
    /// Value for `$AUTONOMY_DIR`; also the Claude Code project key
    pub autonomy_dir: String,
    /// Value for `$(id -u)`
    pub uid: u32,
}

impl EnvContext {
    pub fn new(
        user: impl Into<String>,
        home: impl Into<String>,
        autonomy_dir: impl Into<String>,
        uid: u32,
    ) -> Self {
        Self {
            user: user.into(),
            home: home.into(),
            autonomy_dir: autonomy_dir.into(),
            uid,
        }
    }

    /// Capture the identity of the running process.
    ///
    /// Resolution order:
    /// - user: `$CLAUDE_USER`, `$USER`, the account name for the uid, `"claude"`
    /// - home: `$CLAUDE_HOME`, the platform home directory, `/`
    /// - autonomy dir: `$CLAP_DIR`, the current working directory
    pub fn from_process() -> Self {
        let uid = current_uid();

        let user = non_empty_var(USER_OVERRIDE_VAR)
            .or_else(|| non_empty_var("USER"))
            .or_else(|| account_name(uid))
            .unwrap_or_else(|| FALLBACK_USER.to_string());

        let home = non_empty_var(HOME_OVERRIDE_VAR)
            .or_else(|| dirs::home_dir().map(path_string))
            .unwrap_or_else(|| "/".to_string());

        let autonomy_dir = non_empty_var(AUTONOMY_DIR_VAR)
            .or_else(|| std::env::current_dir().ok().map(path_string))
            .unwrap_or_else(|| ".".to_string());

        let context = Self {
            user,
            home,
            autonomy_dir,
            uid,
        };
        tracing::debug!(?context, "Captured process identity");
        context
    }

    /// Apply the environment pass to a raw value.
    ///
    /// Each token is a literal, non-recursive replacement applied in a
    /// fixed order.
    pub fn substitute(&self, value: &str) -> String {
        let uid = self.uid.to_string();
        let replacements: [(&str, &str); 5] = [
            ("$LINUX_USER", &self.user),
            ("$HOME", &self.home),
            ("$AUTONOMY_DIR", &self.autonomy_dir),
            ("$(whoami)", &self.user),
            ("$(id -u)", &uid),
        ];

        replacements
            .iter()
            .fold(value.to_string(), |acc, &(token, replacement)| {
                if acc.contains(token) {
                    acc.replace(token, replacement)
                } else {
                    acc
                }
            })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(unix)]
fn current_uid() -> u32 {
    nix::unistd::getuid().as_raw()
}

#[cfg(not(unix))]
fn current_uid() -> u32 {
    0
}

#[cfg(unix)]
fn account_name(uid: u32) -> Option<String> {
    nix::unistd::User::from_uid(nix::unistd::Uid::from_raw(uid))
        .ok()
        .flatten()
        .map(|user| user.name)
}

#[cfg(not(unix))]
fn account_name(_uid: u32) -> Option<String> {
    None
}
