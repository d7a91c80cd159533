//! CLI command implementations

pub mod changelog;
pub mod create;
pub mod list;
pub mod log;
pub mod restore;
pub mod setup;
