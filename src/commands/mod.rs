//! CLI subcommands operating directly on the content store

pub mod list;
pub mod new;
pub mod seed;
