// Copyright (c) 2025 - Cowboy AI, Inc.
//! Profile Parameters
//!
//! Parameters carry per-profile tunables. Each one names the config file it
//! belongs to and lists, as a raw JSON array, the profiles it is assigned to.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Parameter {
    pub name: String,
    pub config_file: String,
    pub value: String,
    /// JSON array of profile names, as sent by the upstream API
    pub profiles: Value,
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        config_file: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            config_file: config_file.into(),
            value: value.into(),
            profiles: Value::Array(Vec::new()),
        }
    }

    pub fn with_profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profiles = Value::Array(
            profiles
                .into_iter()
                .map(|p| Value::String(p.into()))
                .collect(),
        );
        self
    }

    /// Decode the profile list
    ///
    /// `null` decodes as an empty list.
    pub fn profile_names(&self) -> Result<Vec<String>, serde_json::Error> {
        if self.profiles.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(self.profiles.clone())
    }

    /// Whether the parameter is assigned to `profile`
    ///
    /// An undecodable profile list matches nothing.
    pub fn in_profile(&self, profile: &str) -> bool {
        self.profile_names()
            .map(|names| names.iter().any(|name| name == profile))
            .unwrap_or(false)
    }
}
