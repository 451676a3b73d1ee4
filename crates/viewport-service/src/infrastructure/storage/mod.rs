//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML file from the platform config
//! directory (or an explicit path), writes a starter file on request, and
//! falls back to defaults when no file exists.  `seed` publishes the
//! configured viewports at startup.

pub mod config;
pub mod seed;
