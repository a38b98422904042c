// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cache Server Domain Model
//!
//! Servers as delivered by the upstream API. Identifying fields are optional
//! because the upstream data can be partially corrupt; generators decide per
//! field whether absence is a hard error (the target server) or a skip with a
//! warning (a related server).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::cache_group::{
    cache_groups_by_name, require_cache_group, CacheGroup, CACHE_GROUP_ORIGIN_TYPE_NAME,
    INVALID_ID,
};
use crate::errors::{ConfigError, ConfigErrorKind, ConfigResult};

/// Type name prefix of edge caches
pub const EDGE_TYPE_PREFIX: &str = "EDGE";

/// Type name prefix of mid-tier caches
pub const MID_TYPE_PREFIX: &str = "MID";

/// Type name prefix of origin servers
pub const ORIGIN_TYPE_PREFIX: &str = "ORG";

/// Type name of traffic monitors
pub const MONITOR_TYPE_NAME: &str = "RASCAL";

/// Role of a server in the CDN, inferred from its type name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerTier {
    /// Client-facing cache
    Edge,
    /// Intermediate cache between edges and origins
    Mid,
    /// Origin server
    Origin,
    /// Health monitor
    Monitor,
    /// Anything else (routers, databases, ...)
    Other,
}

impl ServerTier {
    /// Infer the tier from a server type name, ignoring ASCII case
    pub fn from_type_name(type_name: &str) -> Self {
        let upper = type_name.to_ascii_uppercase();
        if upper.starts_with(EDGE_TYPE_PREFIX) {
            Self::Edge
        } else if upper.starts_with(MID_TYPE_PREFIX) {
            Self::Mid
        } else if upper == MONITOR_TYPE_NAME {
            Self::Monitor
        } else if upper.starts_with(ORIGIN_TYPE_PREFIX) {
            Self::Origin
        } else {
            Self::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Edge => "edge",
            Self::Mid => "mid",
            Self::Origin => "origin",
            Self::Monitor => "monitor",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ServerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One address assigned to a server interface
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerIpAddress {
    /// Bare address or CIDR, as entered upstream
    pub address: String,
    pub gateway: Option<String>,
    /// Whether the address carries service traffic
    pub service_address: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerInterface {
    pub name: String,
    pub ip_addresses: Vec<ServerIpAddress>,
}

/// A server record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Server {
    pub id: Option<i64>,
    pub host_name: Option<String>,
    pub domain_name: Option<String>,
    pub cachegroup: Option<String>,
    pub profile: Option<String>,
    pub cdn_name: Option<String>,
    #[serde(rename = "type")]
    pub server_type: String,
    pub interfaces: Vec<ServerInterface>,
}

impl Server {
    pub fn tier(&self) -> ServerTier {
        ServerTier::from_type_name(&self.server_type)
    }

    pub fn is_mid(&self) -> bool {
        self.tier() == ServerTier::Mid
    }

    /// Every address string on every interface, in interface order
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.interfaces
            .iter()
            .flat_map(|iface| iface.ip_addresses.iter())
            .map(|addr| addr.address.as_str())
    }

    /// Host name for diagnostics, `<unknown>` when absent
    pub fn display_name(&self) -> &str {
        self.host_name.as_deref().unwrap_or("<unknown>")
    }
}

/// Ordering by host name (absent first), then id
///
/// Gives a total order over servers so that anything derived from a sorted
/// server list is reproducible.
pub fn cmp_by_host_name(a: &Server, b: &Server) -> Ordering {
    a.host_name
        .cmp(&b.host_name)
        .then_with(|| a.id.cmp(&b.id))
}

/// A server's position in the cache hierarchy
///
/// Parent ids use [`INVALID_ID`] when the server's cache group has no such
/// parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub host_name: String,
    pub cache_group: String,
    pub parent_cache_group_id: i64,
    pub parent_cache_group_type: String,
    pub secondary_parent_cache_group_id: i64,
    pub secondary_parent_cache_group_type: String,
}

impl ServerInfo {
    /// Resolve a server's parents through the cache-group graph
    pub fn from_server(server: &Server, cache_groups: &[CacheGroup]) -> ConfigResult<Self> {
        let host_name = server
            .host_name
            .clone()
            .ok_or(ConfigErrorKind::MissingServerField("HostName"))?;
        let cache_group = server
            .cachegroup
            .clone()
            .ok_or(ConfigErrorKind::MissingServerField("Cachegroup"))?;

        let by_name = cache_groups_by_name(cache_groups).map_err(ConfigError::from)?;
        let cg = require_cache_group(&by_name, &cache_group).map_err(ConfigError::from)?;

        let resolve = |name: Option<&str>, id: Option<i64>| -> ConfigResult<(i64, String)> {
            match name {
                Some(name) => {
                    let parent = require_cache_group(&by_name, name).map_err(ConfigError::from)?;
                    let parent_id = id.or(parent.id).unwrap_or(INVALID_ID);
                    Ok((parent_id, parent.type_name.clone().unwrap_or_default()))
                }
                None => Ok((INVALID_ID, String::new())),
            }
        };

        let (parent_cache_group_id, parent_cache_group_type) =
            resolve(cg.parent_name.as_deref(), cg.parent_cachegroup_id)?;
        let (secondary_parent_cache_group_id, secondary_parent_cache_group_type) = resolve(
            cg.secondary_parent_name.as_deref(),
            cg.secondary_parent_cachegroup_id,
        )?;

        Ok(Self {
            host_name,
            cache_group,
            parent_cache_group_id,
            parent_cache_group_type,
            secondary_parent_cache_group_id,
            secondary_parent_cache_group_type,
        })
    }

    /// Whether this server sits at the top of the cache hierarchy
    ///
    /// True iff neither the parent nor the secondary parent is a cache: each
    /// must be absent ([`INVALID_ID`]) or of the origin cache-group type.
    pub fn is_top_level_cache(&self) -> bool {
        let no_cache_parent = |id: i64, type_name: &str| {
            id == INVALID_ID || type_name == CACHE_GROUP_ORIGIN_TYPE_NAME
        };
        no_cache_parent(self.parent_cache_group_id, &self.parent_cache_group_type)
            && no_cache_parent(
                self.secondary_parent_cache_group_id,
                &self.secondary_parent_cache_group_type,
            )
    }
}
