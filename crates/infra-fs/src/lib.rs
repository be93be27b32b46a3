//! Filesystem helpers for claude-infra
//!
//! Provides whole-document reads and atomic writes for the JSON
//! targets maintained by the setup tool.

pub mod error;
pub mod io;

pub use error::{Error, Result};
