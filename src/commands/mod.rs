//! CLI command implementations

pub mod download;
