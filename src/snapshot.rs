// Copyright (c) 2025 - Cowboy AI, Inc.
//! Server Snapshot
//!
//! Everything the generators need to render config for one server, in a
//! single serializable document. A snapshot is fetched once and rendered any
//! number of times; rendering never mutates it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::atscfg::{
    make_bg_fetch_dot_config, make_cache_dot_config, make_ip_allow_dot_config,
    make_ssl_multicert_dot_config, Cfg, ConfigFile,
};
use crate::domain::{CacheGroup, DeliveryService, DeliveryServiceServer, Parameter, Server};
use crate::errors::ConfigResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSnapshot {
    /// The server config is rendered for
    pub server: Server,
    pub servers: Vec<Server>,
    pub cache_groups: Vec<CacheGroup>,
    pub delivery_services: Vec<DeliveryService>,
    pub delivery_service_servers: Vec<DeliveryServiceServer>,
    /// All parameters; [`ServerSnapshot::server_params`] narrows them to the
    /// server's profile
    pub parameters: Vec<Parameter>,
}

impl ServerSnapshot {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parameters assigned to the server's profile
    ///
    /// Empty when the server has no profile.
    pub fn server_params(&self) -> Vec<Parameter> {
        let Some(profile) = self.server.profile.as_deref() else {
            return Vec::new();
        };
        self.parameters
            .iter()
            .filter(|p| p.in_profile(profile))
            .cloned()
            .collect()
    }

    /// Render `file` for this snapshot's server
    pub fn render(&self, file: ConfigFile, hdr_comment: &str) -> ConfigResult<Cfg> {
        debug!(
            server = self.server.display_name(),
            file = %file,
            "rendering config file"
        );
        match file {
            ConfigFile::IpAllow => make_ip_allow_dot_config(
                &self.server_params(),
                &self.server,
                &self.servers,
                &self.cache_groups,
                hdr_comment,
            ),
            ConfigFile::Cache => make_cache_dot_config(
                &self.server,
                &self.servers,
                &self.delivery_services,
                &self.delivery_service_servers,
                hdr_comment,
            ),
            ConfigFile::SslMultiCert => {
                make_ssl_multicert_dot_config(&self.server, &self.delivery_services, hdr_comment)
            }
            ConfigFile::BgFetch => make_bg_fetch_dot_config(&self.server, hdr_comment),
        }
    }
}
