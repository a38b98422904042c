// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for config generation
//!
//! A generator either returns a [`Cfg`](crate::atscfg::Cfg) (possibly carrying
//! warnings) or fails with a [`ConfigError`]. A failure still hands back every
//! warning collected before the generator gave up, so callers can log them.

use thiserror::Error;

/// Reasons a single config file cannot be generated
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// The target server lacks a field this file needs
    #[error("this server missing {0}")]
    MissingServerField(&'static str),

    /// A cache group in the input had no name
    #[error("got cachegroup with nil name")]
    UnnamedCacheGroup,

    /// A cache group referenced by name is not in the input
    #[error("cachegroup '{0}' not in cachegroups")]
    CacheGroupNotFound(String),

    /// A version string did not start with a numeric major version
    #[error("unexpected version format '{0}', expected e.g. '7.1.2.whatever'")]
    InvalidVersion(String),

    /// No generator produces a file with this name
    #[error("unknown config file '{0}'")]
    UnknownConfigFile(String),
}

/// Hard generation failure, with the warnings accumulated up to that point
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub warnings: Vec<String>,
}

impl ConfigError {
    pub fn new(kind: ConfigErrorKind, warnings: Vec<String>) -> Self {
        Self { kind, warnings }
    }
}

impl From<ConfigErrorKind> for ConfigError {
    fn from(kind: ConfigErrorKind) -> Self {
        Self::new(kind, Vec::new())
    }
}

/// Result type for config generation
pub type ConfigResult<T> = Result<T, ConfigError>;
