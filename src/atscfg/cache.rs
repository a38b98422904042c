// Copyright (c) 2025 - Cowboy AI, Inc.
//! `cache.config` - never-cache rules for `HTTP_NO_CACHE` delivery services
//!
//! Edges only emit rules for delivery services assigned (directly or via a
//! topology) to some server sharing their profile. Mids emit rules for every
//! delivery service they are handed.

use std::collections::BTreeSet;
use tracing::debug;

use super::common::{filter_dss, get_host_port_from_uri, make_hdr_comment, Cfg, Warnings};
use crate::domain::{DeliveryService, DeliveryServiceServer, DsType, Server};
use crate::errors::{ConfigErrorKind, ConfigResult};

pub const CACHE_CONFIG_FILE_NAME: &str = "cache.config";

/// Build `cache.config` for `server`, picking the branch for its tier
pub fn make_cache_dot_config(
    server: &Server,
    servers: &[Server],
    delivery_services: &[DeliveryService],
    delivery_service_servers: &[DeliveryServiceServer],
    hdr_comment: &str,
) -> ConfigResult<Cfg> {
    if server.is_mid() {
        make_cache_dot_config_mid(server, delivery_services, hdr_comment)
    } else {
        make_cache_dot_config_edge(
            server,
            servers,
            delivery_services,
            delivery_service_servers,
            hdr_comment,
        )
    }
}

/// Edge (non-mid) branch of [`make_cache_dot_config`]
pub fn make_cache_dot_config_edge(
    server: &Server,
    servers: &[Server],
    delivery_services: &[DeliveryService],
    delivery_service_servers: &[DeliveryServiceServer],
    hdr_comment: &str,
) -> ConfigResult<Cfg> {
    let mut warnings = Warnings::new();

    let Some(profile) = server.profile.as_deref() else {
        return Err(warnings.fail(ConfigErrorKind::MissingServerField("Profile")));
    };

    let mut profile_server_ids = BTreeSet::new();
    for sv in servers {
        let Some(sv_profile) = sv.profile.as_deref() else {
            warnings.push("servers had server with nil profile, skipping!");
            continue;
        };
        let Some(id) = sv.id else {
            warnings.push("servers had server with nil id, skipping!");
            continue;
        };
        if sv_profile == profile {
            profile_server_ids.insert(id);
        }
    }

    let ds_ids: BTreeSet<i64> = filter_dss(delivery_service_servers, None, Some(&profile_server_ids))
        .iter()
        .filter_map(|row| row.delivery_service)
        .collect();

    let mut lines = BTreeSet::new();
    for ds in delivery_services {
        let Some(origin) = eligible_origin(ds) else {
            continue;
        };
        let assigned = ds.id.is_some_and(|id| ds_ids.contains(&id));
        if !assigned && ds.topology.is_none() {
            continue;
        }
        if ds.ds_type == Some(DsType::HttpNoCache) {
            lines.insert(never_cache_line(origin));
        }
    }

    debug!(profile, rules = lines.len(), "generated {}", CACHE_CONFIG_FILE_NAME);
    Ok(Cfg::text_ascii(render(hdr_comment, lines), warnings))
}

/// Mid branch of [`make_cache_dot_config`]
///
/// The caller hands over the delivery services this mid serves, so no
/// assignment filtering happens here.
pub fn make_cache_dot_config_mid(
    server: &Server,
    delivery_services: &[DeliveryService],
    hdr_comment: &str,
) -> ConfigResult<Cfg> {
    let mut warnings = Warnings::new();

    let Some(profile) = server.profile.as_deref() else {
        return Err(warnings.fail(ConfigErrorKind::MissingServerField("Profile")));
    };

    let mut lines = BTreeSet::new();
    for ds in delivery_services {
        if ds.org_server_fqdn.is_none() || ds.ds_type.is_none() || ds.xml_id.is_none() {
            warnings.push(format!(
                "got DS '{}' with nil values, skipping!",
                ds.xml_id.as_deref().unwrap_or("<unknown>")
            ));
            continue;
        }
        let Some(origin) = eligible_origin(ds) else {
            continue;
        };
        if ds.ds_type == Some(DsType::HttpNoCache) {
            lines.insert(never_cache_line(origin));
        }
    }

    debug!(profile, rules = lines.len(), "generated {} for mid", CACHE_CONFIG_FILE_NAME);
    Ok(Cfg::text_ascii(render(hdr_comment, lines), warnings))
}

/// Origin of a delivery service that can appear in generated config
///
/// Needs an id, a valid type and a non-empty origin; anything else is
/// dropped without a warning.
fn eligible_origin(ds: &DeliveryService) -> Option<&str> {
    let (Some(_), Some(ds_type), Some(origin)) =
        (ds.id, ds.ds_type, ds.org_server_fqdn.as_deref())
    else {
        debug!(xml_id = ?ds.xml_id, "skipping delivery service with nil fields");
        return None;
    };
    if ds_type == DsType::Invalid || origin.is_empty() {
        debug!(xml_id = ?ds.xml_id, "skipping invalid delivery service");
        return None;
    }
    Some(origin)
}

fn never_cache_line(origin: &str) -> String {
    let (host, port) = get_host_port_from_uri(origin);
    if port.is_empty() {
        format!("dest_domain={host} scheme=http action=never-cache\n")
    } else {
        format!("dest_domain={host} port={port} scheme=http action=never-cache\n")
    }
}

/// Header plus the sorted lines
///
/// An empty rule set still yields a one-newline body: the profile exists, it
/// just has nothing to never-cache.
fn render(hdr_comment: &str, lines: BTreeSet<String>) -> String {
    let mut body: String = lines.into_iter().collect();
    if body.is_empty() {
        body.push('\n');
    }
    make_hdr_comment(hdr_comment) + &body
}
