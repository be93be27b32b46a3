//! Infrastructure config parsing for claude-infra.
//!
//! The input is a sectioned `KEY=value` text file. Values are resolved in
//! two passes:
//!
//! 1. **Environment pass** - identity tokens such as `$HOME` or `$(id -u)`
//!    are replaced while each line is read, using an [`EnvContext`]
//!    captured once at startup.
//! 2. **Cross-reference pass** - `$KEY` tokens naming any key in any
//!    section are replaced by that key's value. This pass runs exactly
//!    once and is not transitive.
//!
//! The crate also hosts the [`locator`] used to find built MCP server
//! entry points and the X11 authority probe in [`xauth`].

pub mod document;
pub mod env;
pub mod error;
pub mod locator;
pub mod parser;
pub mod resolver;
pub mod xauth;

pub use document::{ConfigDocument, Section, sections};
pub use env::EnvContext;
pub use error::{Error, Result};
pub use locator::locate_artifact;
pub use parser::{ConfigParser, ParsePolicy};
pub use resolver::{SubstitutionTable, resolve_cross_references};
pub use xauth::{detect_xauthority, detect_xauthority_in};
