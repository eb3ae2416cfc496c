//! CLI command implementations

pub mod boxes;
pub mod cabinet;
pub mod completions;
pub mod division;
pub mod export;
pub mod folder;
pub mod init;
pub mod record;
pub mod shelf;
pub mod status;
pub mod validate;
