//! Storage infrastructure: TOML configuration file load/save.

pub mod config;
