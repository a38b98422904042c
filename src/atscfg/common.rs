// Copyright (c) 2025 - Cowboy AI, Inc.
//! Shared pieces of every generator
//!
//! The [`Cfg`] result type, the [`Warnings`] sink, header comments, parameter
//! and assignment filtering, and the small string derivations several config
//! files agree on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::domain::{DeliveryServiceServer, Parameter};
use crate::errors::{ConfigError, ConfigErrorKind, ConfigResult};

pub const CONTENT_TYPE_TEXT_ASCII: &str = "text/plain; charset=us-ascii";
pub const LINE_COMMENT_HASH: &str = "#";

pub const CONFIG_SUFFIX: &str = ".config";
pub const HEADER_REWRITE_PREFIX: &str = "hdr_rw_";
pub const REGEX_REMAP_PREFIX: &str = "regex_remap_";
pub const CACHE_URL_PREFIX: &str = "cacheurl_";

/// `strftime` form of e.g. `Mon Jan 2 15:04:05 UTC 2006`
pub const HEADER_COMMENT_DATE_FORMAT: &str = "%a %b %-d %H:%M:%S UTC %Y";

/// A generated config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cfg {
    /// Full file contents, starting with the header comment
    pub text: String,
    pub content_type: String,
    /// Comment leader of this file's syntax
    pub line_comment: String,
    /// Non-fatal diagnostics, for the caller to log
    pub warnings: Vec<String>,
}

impl Cfg {
    /// Plain-text, `#`-commented file
    pub fn text_ascii(text: String, warnings: Warnings) -> Self {
        Self {
            text,
            content_type: CONTENT_TYPE_TEXT_ASCII.to_string(),
            line_comment: LINE_COMMENT_HASH.to_string(),
            warnings: warnings.into_vec(),
        }
    }
}

/// Diagnostics sink threaded through one generator invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings(Vec<String>);

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        debug!(%warning, "config generation warning");
        self.0.push(warning);
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, warnings: I) {
        for warning in warnings {
            self.push(warning);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Abort generation, handing back everything collected so far
    pub fn fail(self, kind: ConfigErrorKind) -> ConfigError {
        ConfigError::new(kind, self.0)
    }
}

/// Header comment line for `#`-commented files
pub fn make_hdr_comment(hdr_comment: &str) -> String {
    format!("{LINE_COMMENT_HASH} {hdr_comment}\n")
}

/// The conventional header text stamped into generated files
pub fn header_comment_text(name: &str, tool: &str, at: DateTime<Utc>) -> String {
    format!(
        "DO NOT EDIT - Generated for {} by {} on {}",
        name,
        tool,
        at.format(HEADER_COMMENT_DATE_FORMAT)
    )
}

/// Per-delivery-service config file name, e.g. `hdr_rw_<xml_id>.config`
pub fn get_config_file(prefix: &str, xml_id: &str) -> String {
    format!("{prefix}{xml_id}{CONFIG_SUFFIX}")
}

/// Parameters matching every non-empty filter
///
/// An empty `config_file`, `name` or `value` does not filter; a non-empty
/// `omit_name` drops parameters with that name.
pub fn filter_params<'a>(
    params: &'a [Parameter],
    config_file: &str,
    name: &str,
    value: &str,
    omit_name: &str,
) -> Vec<&'a Parameter> {
    params
        .iter()
        .filter(|p| config_file.is_empty() || p.config_file == config_file)
        .filter(|p| name.is_empty() || p.name == name)
        .filter(|p| value.is_empty() || p.value == value)
        .filter(|p| omit_name.is_empty() || p.name != omit_name)
        .collect()
}

/// Group parameter values by name
///
/// Values are sorted per name, so the map is the same for any ordering of
/// the input.
pub fn params_to_multi_map(params: &[&Parameter]) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for param in params {
        map.entry(param.name.clone())
            .or_default()
            .push(param.value.clone());
    }
    for values in map.values_mut() {
        values.sort();
    }
    map
}

/// Assignments whose delivery service and server are in the given sets
///
/// `None` means "don't filter on this side". Rows missing the filtered side
/// are dropped.
pub fn filter_dss(
    dss: &[DeliveryServiceServer],
    ds_ids: Option<&BTreeSet<i64>>,
    server_ids: Option<&BTreeSet<i64>>,
) -> Vec<DeliveryServiceServer> {
    let keep = |id: Option<i64>, ids: Option<&BTreeSet<i64>>| match ids {
        None => true,
        Some(ids) => id.is_some_and(|id| ids.contains(&id)),
    };
    dss.iter()
        .filter(|row| keep(row.delivery_service, ds_ids) && keep(row.server, server_ids))
        .copied()
        .collect()
}

/// Split an origin URI into host and port
///
/// Strips a leading `http://` or `https://`, drops everything from the first
/// `/`, and splits on the first `:`. The port is empty when absent.
pub fn get_host_port_from_uri(uri: &str) -> (&str, &str) {
    let rest = uri.strip_prefix("http://").unwrap_or(uri);
    let rest = rest.strip_prefix("https://").unwrap_or(rest);
    let host_port = rest.split_once('/').map_or(rest, |(host_port, _)| host_port);
    host_port.split_once(':').unwrap_or((host_port, ""))
}

/// Strip a `__<digits>` suffix from a parameter name
///
/// Lets one profile carry several parameters that render under the same
/// name, e.g. `foo__1` and `foo__2` both become `foo`.
pub fn trim_param_underscore_num_suffix(name: &str) -> &str {
    match name.rfind("__") {
        Some(pos) => {
            let suffix = &name[pos + 2..];
            if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
                &name[..pos]
            } else {
                name
            }
        }
        None => name,
    }
}

/// Major version of an ATS package version string such as `7.1.2-34.el7`
pub fn get_ats_major_version(ats_version: &str) -> ConfigResult<u32> {
    let major = ats_version
        .split_once('.')
        .map_or(ats_version, |(major, _)| major);
    if major.is_empty() || !major.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConfigErrorKind::InvalidVersion(ats_version.to_string()).into());
    }
    major
        .parse::<u32>()
        .map_err(|_| ConfigErrorKind::InvalidVersion(ats_version.to_string()).into())
}
