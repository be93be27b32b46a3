//! MCP server registry generation for Claude Code and Claude Desktop.
//!
//! # Architecture
//!
//! A resolved [`ConfigDocument`](infra_config::ConfigDocument) flows through
//! three stages:
//!
//! 1. **Fragment builders** ([`services`]) - a closed table maps config keys
//!    to [`ServiceEntry`] values, per target.
//! 2. **Rendering** ([`schema`]) - each target renders entries in its own
//!    JSON shape (Claude Code adds `"type": "stdio"`).
//! 3. **Document merger** ([`merger`]) - the rendered fragment replaces the
//!    owned subtree of the on-disk JSON document, leaving every other key
//!    alone.
//!
//! [`Setup`] runs the stages for each selected target independently.

pub mod error;
pub mod logging;
pub mod merger;
pub mod schema;
pub mod services;
pub mod setup;

pub use error::{Error, Result};
pub use merger::{DocumentMerger, MergeOutcome};
pub use schema::{Fragment, ServiceEntry, TargetKind, TargetSpec};
pub use services::{SERVICES, ServiceDef, build_fragment};
pub use setup::{Setup, SetupReport, TargetReport, TargetSelection};
