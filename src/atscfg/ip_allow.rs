// Copyright (c) 2025 - Cowboy AI, Inc.
//! `ip_allow.config` - access control for the cache's control methods
//!
//! Edges allow everything except `PUSH|PURGE|DELETE` from anywhere. Mids
//! deny by default and only allow their child caches, monitors, configured
//! purge hosts, loopback and RFC 1918 space. Entry order matters to ATS
//! (first match wins), so the list is built in a fixed sequence with a single
//! sort over the allow entries.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

use super::common::{filter_params, make_hdr_comment, params_to_multi_map, Cfg, Warnings};
use crate::domain::cache_group::{cache_groups_by_name, require_cache_group};
use crate::domain::network::{coalesce, parse_address, parse_cidr, IpNetwork};
use crate::domain::server::cmp_by_host_name;
use crate::domain::{CacheGroup, Parameter, Server, ServerTier};
use crate::errors::{ConfigErrorKind, ConfigResult};

pub const IP_ALLOW_CONFIG_FILE_NAME: &str = "ip_allow.config";

pub const PARAM_PURGE_ALLOW_IP: &str = "purge_allow_ip";
pub const PARAM_COALESCE_MASK_LEN_V4: &str = "coalesce_masklen_v4";
pub const PARAM_COALESCE_NUMBER_V4: &str = "coalesce_number_v4";
pub const PARAM_COALESCE_MASK_LEN_V6: &str = "coalesce_masklen_v6";
pub const PARAM_COALESCE_NUMBER_V6: &str = "coalesce_number_v6";

pub const DEFAULT_COALESCE_MASK_LEN_V4: u8 = 24;
pub const DEFAULT_COALESCE_NUMBER_V4: usize = 5;
pub const DEFAULT_COALESCE_MASK_LEN_V6: u8 = 48;
pub const DEFAULT_COALESCE_NUMBER_V6: usize = 5;

pub const ACTION_ALLOW: &str = "ip_allow";
pub const ACTION_DENY: &str = "ip_deny";
pub const METHOD_ALL: &str = "ALL";

const ALL_IPV4: &str = "0.0.0.0-255.255.255.255";
const ALL_IPV6: &str = "::-ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff";

const EDGE_DENY_METHODS: &str = "PUSH|PURGE|DELETE";
const MID_DENY_METHODS: &str = "PUSH|PURGE";

const RFC1918_RANGES: [&str; 3] = [
    "10.0.0.0-10.255.255.255",
    "172.16.0.0-172.31.255.255",
    "192.168.0.0-192.168.255.255",
];

/// One `ip_allow.config` rule
///
/// Ordering is `(src, action, method)`, compared as strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct IpAllowEntry {
    pub src: String,
    pub action: String,
    pub method: String,
}

impl IpAllowEntry {
    fn new(src: impl Into<String>, action: &str, method: &str) -> Self {
        Self {
            src: src.into(),
            action: action.to_string(),
            method: method.to_string(),
        }
    }

    pub fn allow_all(src: impl Into<String>) -> Self {
        Self::new(src, ACTION_ALLOW, METHOD_ALL)
    }

    pub fn deny(src: impl Into<String>, method: &str) -> Self {
        Self::new(src, ACTION_DENY, method)
    }
}

impl fmt::Display for IpAllowEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "src_ip={} action={} method={}",
            self.src, self.action, self.method
        )
    }
}

/// Prefix coalescing thresholds for child addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoalesceSettings {
    pub mask_len_v4: u8,
    pub number_v4: usize,
    pub mask_len_v6: u8,
    pub number_v6: usize,
}

impl Default for CoalesceSettings {
    fn default() -> Self {
        Self {
            mask_len_v4: DEFAULT_COALESCE_MASK_LEN_V4,
            number_v4: DEFAULT_COALESCE_NUMBER_V4,
            mask_len_v6: DEFAULT_COALESCE_MASK_LEN_V6,
            number_v6: DEFAULT_COALESCE_NUMBER_V6,
        }
    }
}

impl CoalesceSettings {
    /// Override the defaults from profile parameters
    ///
    /// The first value that parses wins; later values and unparsable ones
    /// are ignored with a warning.
    pub fn from_params(params: &BTreeMap<String, Vec<String>>, warnings: &mut Warnings) -> Self {
        let defaults = Self::default();
        Self {
            mask_len_v4: first_valid(params, PARAM_COALESCE_MASK_LEN_V4, warnings, |v| {
                v.parse::<u8>().ok().filter(|len| *len <= 32)
            })
            .unwrap_or(defaults.mask_len_v4),
            number_v4: first_valid(params, PARAM_COALESCE_NUMBER_V4, warnings, |v| {
                v.parse::<usize>().ok()
            })
            .unwrap_or(defaults.number_v4),
            mask_len_v6: first_valid(params, PARAM_COALESCE_MASK_LEN_V6, warnings, |v| {
                v.parse::<u8>().ok().filter(|len| *len <= 128)
            })
            .unwrap_or(defaults.mask_len_v6),
            number_v6: first_valid(params, PARAM_COALESCE_NUMBER_V6, warnings, |v| {
                v.parse::<usize>().ok()
            })
            .unwrap_or(defaults.number_v6),
        }
    }
}

fn first_valid<T>(
    params: &BTreeMap<String, Vec<String>>,
    name: &str,
    warnings: &mut Warnings,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let mut chosen = None;
    for val in params.get(name).into_iter().flatten() {
        match parse(val.as_str()) {
            None => warnings.push(format!(
                "got param '{name}' val '{val}' not a valid number, ignoring!"
            )),
            Some(_) if chosen.is_some() => warnings.push(format!(
                "got multiple param '{name}' - ignoring val '{val}'!"
            )),
            Some(parsed) => chosen = Some(parsed),
        }
    }
    chosen
}

/// Build `ip_allow.config` for `server`
///
/// `server_params` are the parameters of the server's profile; only those
/// belonging to `ip_allow.config` are read. `servers` and `cache_groups` are
/// only consulted for mids.
pub fn make_ip_allow_dot_config(
    server_params: &[Parameter],
    server: &Server,
    servers: &[Server],
    cache_groups: &[CacheGroup],
    hdr_comment: &str,
) -> ConfigResult<Cfg> {
    let mut warnings = Warnings::new();

    let Some(server_cache_group) = server.cachegroup.as_deref() else {
        return Err(warnings.fail(ConfigErrorKind::MissingServerField("Cachegroup")));
    };
    let Some(host_name) = server.host_name.as_deref() else {
        return Err(warnings.fail(ConfigErrorKind::MissingServerField("HostName")));
    };

    let params = params_to_multi_map(&filter_params(
        server_params,
        IP_ALLOW_CONFIG_FILE_NAME,
        "",
        "",
        "",
    ));

    // localhost is trusted
    let mut entries = vec![
        IpAllowEntry::allow_all("127.0.0.1"),
        IpAllowEntry::allow_all("::1"),
    ];
    for ip in params.get(PARAM_PURGE_ALLOW_IP).into_iter().flatten() {
        entries.push(IpAllowEntry::allow_all(ip.as_str()));
    }

    let settings = CoalesceSettings::from_params(&params, &mut warnings);

    if server.is_mid() {
        let child_entries = match child_allow_entries(
            server_cache_group,
            servers,
            cache_groups,
            &settings,
            &mut warnings,
        ) {
            Ok(child_entries) => child_entries,
            Err(kind) => return Err(warnings.fail(kind)),
        };
        entries.extend(child_entries);
        entries.extend(RFC1918_RANGES.iter().map(|r| IpAllowEntry::allow_all(*r)));

        // the only sort; every allow is known, and the denies go around it
        entries.sort();

        let mut denied = vec![
            IpAllowEntry::deny(ALL_IPV4, MID_DENY_METHODS),
            IpAllowEntry::deny(ALL_IPV6, MID_DENY_METHODS),
        ];
        denied.append(&mut entries);
        entries = denied;
        entries.push(IpAllowEntry::deny(ALL_IPV4, METHOD_ALL));
        entries.push(IpAllowEntry::deny(ALL_IPV6, METHOD_ALL));
    } else {
        entries.push(IpAllowEntry::deny(ALL_IPV4, EDGE_DENY_METHODS));
        entries.push(IpAllowEntry::deny(ALL_IPV6, EDGE_DENY_METHODS));
    }

    debug!(
        server = host_name,
        tier = %server.tier(),
        entries = entries.len(),
        "generated {}",
        IP_ALLOW_CONFIG_FILE_NAME
    );

    let mut text = make_hdr_comment(hdr_comment);
    for entry in &entries {
        text.push_str(&entry.to_string());
        text.push('\n');
    }

    Ok(Cfg::text_ascii(text, warnings))
}

/// Allow entries for the children (and monitors) of a mid's cache group
fn child_allow_entries(
    server_cache_group: &str,
    servers: &[Server],
    cache_groups: &[CacheGroup],
    settings: &CoalesceSettings,
    warnings: &mut Warnings,
) -> Result<Vec<IpAllowEntry>, ConfigErrorKind> {
    let by_name = cache_groups_by_name(cache_groups)?;
    require_cache_group(&by_name, server_cache_group)?;

    let child_cache_groups: BTreeSet<&str> = by_name
        .iter()
        .filter(|(_, cg)| cg.is_child_of(server_cache_group))
        .map(|(name, _)| *name)
        .collect();

    // coalescing must see servers in a reproducible order
    let mut candidates: Vec<&Server> = servers.iter().collect();
    candidates.sort_by(|a, b| cmp_by_host_name(a, b));

    let mut ips = Vec::new();
    let mut ip6s = Vec::new();

    for candidate in candidates {
        let Some(cache_group) = candidate.cachegroup.as_deref() else {
            warnings.push("servers had server with nil Cachegroup, skipping!");
            continue;
        };
        let Some(candidate_name) = candidate.host_name.as_deref() else {
            warnings.push("servers had server with nil HostName, skipping!");
            continue;
        };

        // children of this mid, plus every monitor
        let is_child = child_cache_groups.contains(cache_group);
        if !is_child && candidate.tier() != ServerTier::Monitor {
            continue;
        }

        for address in candidate.addresses() {
            match parse_server_address(address) {
                Some(net) if net.is_ipv4() => ips.push(net),
                Some(net) => ip6s.push(net),
                None => warnings.push(format!(
                    "server '{candidate_name}' IP '{address}' is not an IP address or CIDR - skipping!"
                )),
            }
        }
    }

    let cidrs = coalesce(&ips, settings.number_v4, settings.mask_len_v4);
    let cidr6s = coalesce(&ip6s, settings.number_v6, settings.mask_len_v6);

    Ok(cidrs
        .iter()
        .chain(cidr6s.iter())
        .map(|net| IpAllowEntry::allow_all(net.range_string()))
        .collect())
}

fn parse_server_address(address: &str) -> Option<IpNetwork> {
    parse_address(address)
        .or_else(|_| parse_cidr(address))
        .ok()
}
