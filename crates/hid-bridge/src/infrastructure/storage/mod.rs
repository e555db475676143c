//! Storage infrastructure: configuration file loading.
//!
//! The `config` sub-module reads the TOML configuration file from an explicit
//! path or the platform-appropriate directory, falling back to built-in
//! defaults when no file exists yet.

pub mod config;
