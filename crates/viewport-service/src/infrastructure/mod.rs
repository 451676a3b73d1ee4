//! Infrastructure layer for the viewport service.
//!
//! Contains the process-facing adapters: the TOML configuration store, the
//! line-oriented pointer sample source, and the logging pointer sink.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `viewport_core`, but MUST NOT be imported by the `application` or domain layers.

pub mod delivery;
pub mod pointer_input;
pub mod storage;
