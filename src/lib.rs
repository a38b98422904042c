// Copyright (c) 2025 - Cowboy AI, Inc.
//! Config generation for the caches of a CDN
//!
//! Compiles a snapshot of CDN topology (servers, cache groups, delivery
//! services and profile parameters) into the literal text of Apache Traffic
//! Server config files for a single server.

pub mod atscfg;
pub mod domain;
pub mod errors;
pub mod snapshot;

// Re-export commonly used types
pub use atscfg::{Cfg, ConfigFile, Warnings};
pub use errors::{ConfigError, ConfigErrorKind, ConfigResult};
pub use snapshot::ServerSnapshot;
