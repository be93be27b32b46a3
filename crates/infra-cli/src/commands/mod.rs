//! Command implementations for infra-cli

pub mod apply;
pub mod show;
pub mod xauth;

pub use apply::run_apply;
pub use show::run_show;
pub use xauth::run_xauth;
