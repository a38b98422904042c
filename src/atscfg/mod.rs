// Copyright (c) 2025 - Cowboy AI, Inc.
//! ATS Config Generators
//!
//! Each generator is a pure function from a snapshot of the CDN model to the
//! text of one Apache Traffic Server config file for one server. Generators
//! perform no I/O and keep no state between calls; the same input always
//! yields byte-identical output.
//!
//! ## Files
//!
//! - [`ip_allow`] - `ip_allow.config`, access control by source address
//! - [`cache`] - `cache.config`, never-cache rules
//! - [`ssl_multicert`] - `ssl_multicert.config`, TLS certificate bindings
//! - [`bg_fetch`] - `bg_fetch.config`, background fetch rules

pub mod bg_fetch;
pub mod cache;
pub mod common;
pub mod ip_allow;
pub mod ssl_multicert;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ConfigErrorKind;

pub use bg_fetch::{make_bg_fetch_dot_config, BG_FETCH_CONFIG_FILE_NAME};
pub use cache::{
    make_cache_dot_config, make_cache_dot_config_edge, make_cache_dot_config_mid,
    CACHE_CONFIG_FILE_NAME,
};
pub use common::{
    filter_dss, filter_params, get_ats_major_version, get_config_file, get_host_port_from_uri,
    header_comment_text, make_hdr_comment, params_to_multi_map, trim_param_underscore_num_suffix,
    Cfg, Warnings, CACHE_URL_PREFIX, HEADER_REWRITE_PREFIX, REGEX_REMAP_PREFIX,
};
pub use ip_allow::{make_ip_allow_dot_config, IpAllowEntry, IP_ALLOW_CONFIG_FILE_NAME};
pub use ssl_multicert::{
    delivery_services_to_ssl_multicert_dses, get_cert_and_key_name,
    get_ssl_multicert_delivery_services, make_ssl_multicert_dot_config, SslMultiCertDs,
    SSL_MULTICERT_CONFIG_FILE_NAME,
};

/// The config files this crate can generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ConfigFile {
    IpAllow,
    Cache,
    SslMultiCert,
    BgFetch,
}

impl ConfigFile {
    pub const ALL: [ConfigFile; 4] = [
        ConfigFile::IpAllow,
        ConfigFile::Cache,
        ConfigFile::SslMultiCert,
        ConfigFile::BgFetch,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::IpAllow => IP_ALLOW_CONFIG_FILE_NAME,
            Self::Cache => CACHE_CONFIG_FILE_NAME,
            Self::SslMultiCert => SSL_MULTICERT_CONFIG_FILE_NAME,
            Self::BgFetch => BG_FETCH_CONFIG_FILE_NAME,
        }
    }
}

impl fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

impl FromStr for ConfigFile {
    type Err = ConfigErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|file| file.file_name() == s)
            .ok_or_else(|| ConfigErrorKind::UnknownConfigFile(s.to_string()))
    }
}

impl TryFrom<String> for ConfigFile {
    type Error = ConfigErrorKind;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ConfigFile> for String {
    fn from(file: ConfigFile) -> Self {
        file.file_name().to_string()
    }
}
