// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cdn-atscfg
//!
//! Provides deterministic CDN topologies for generator tests.
//!
//! # Design Principles
//! - All test data is deterministic (no `Utc::now()`)
//! - Every fixture builds a complete, valid record; tests knock fields out
//!   to exercise failure paths
#![allow(dead_code)]

use chrono::{DateTime, Utc};

use cdn_atscfg::domain::{
    CacheGroup, DeliveryService, DeliveryServiceServer, DsType, Parameter, Server,
    ServerInterface, ServerIpAddress,
};
use cdn_atscfg::ServerSnapshot;

pub const HDR: &str = "DO NOT EDIT - Generated for test by test on Mon Jan 2 15:04:05 UTC 2006";

pub const EDGE_PROFILE: &str = "EDGE_PROFILE";
pub const MID_PROFILE: &str = "MID_PROFILE";

pub const MID_CACHE_GROUP: &str = "mid-cg";
pub const EDGE_CACHE_GROUP: &str = "edge-cg";
pub const OTHER_EDGE_CACHE_GROUP: &str = "edge-cg-other";

// Fixed test timestamp (2006-01-02T15:04:05Z)
pub const FIXED_TIMESTAMP: &str = "2006-01-02T15:04:05Z";

/// Parse the fixed timestamp
pub fn fixed_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(FIXED_TIMESTAMP)
        .expect("Invalid timestamp in test fixture")
        .with_timezone(&Utc)
}

/// A complete edge server with one IPv4 and one IPv6 service address
pub fn make_generic_server() -> Server {
    Server {
        id: Some(1),
        host_name: Some("edge01".to_string()),
        domain_name: Some("example.net".to_string()),
        cachegroup: Some(EDGE_CACHE_GROUP.to_string()),
        profile: Some(EDGE_PROFILE.to_string()),
        cdn_name: Some("cdn0".to_string()),
        server_type: "EDGE".to_string(),
        interfaces: vec![make_interface(&["192.0.2.1", "2001:db8::1/64"])],
    }
}

pub fn make_interface(addresses: &[&str]) -> ServerInterface {
    ServerInterface {
        name: "eth0".to_string(),
        ip_addresses: addresses
            .iter()
            .enumerate()
            .map(|(i, address)| ServerIpAddress {
                address: address.to_string(),
                gateway: None,
                service_address: i == 0,
            })
            .collect(),
    }
}

pub fn make_server(id: i64, host: &str, cache_group: &str, server_type: &str, addresses: &[&str]) -> Server {
    let profile = if server_type.starts_with("MID") {
        MID_PROFILE
    } else {
        EDGE_PROFILE
    };
    Server {
        id: Some(id),
        host_name: Some(host.to_string()),
        cachegroup: Some(cache_group.to_string()),
        profile: Some(profile.to_string()),
        server_type: server_type.to_string(),
        interfaces: vec![make_interface(addresses)],
        ..make_generic_server()
    }
}

/// A mid, its two child edge groups, and an unrelated group
pub fn make_cache_groups() -> Vec<CacheGroup> {
    vec![
        CacheGroup {
            id: Some(1),
            type_name: Some("MID_LOC".to_string()),
            ..CacheGroup::new(MID_CACHE_GROUP)
        },
        CacheGroup {
            id: Some(2),
            type_name: Some("EDGE_LOC".to_string()),
            ..CacheGroup::new(EDGE_CACHE_GROUP).with_parent(MID_CACHE_GROUP)
        },
        CacheGroup {
            id: Some(3),
            type_name: Some("EDGE_LOC".to_string()),
            ..CacheGroup::new(OTHER_EDGE_CACHE_GROUP).with_secondary_parent(MID_CACHE_GROUP)
        },
        CacheGroup {
            id: Some(4),
            type_name: Some("EDGE_LOC".to_string()),
            ..CacheGroup::new("unrelated-cg")
        },
    ]
}

/// The mid under test plus its children, a monitor and an unrelated edge
pub fn make_mid_topology() -> (Server, Vec<Server>) {
    let mid = make_server(100, "mid01", MID_CACHE_GROUP, "MID", &["198.51.100.1"]);
    let servers = vec![
        mid.clone(),
        make_server(1, "edge01", EDGE_CACHE_GROUP, "EDGE", &["192.0.2.1", "2001:db8::1"]),
        make_server(2, "edge02", EDGE_CACHE_GROUP, "EDGE", &["192.0.2.2"]),
        make_server(3, "edge03", OTHER_EDGE_CACHE_GROUP, "EDGE", &["203.0.113.7/32"]),
        make_server(4, "rascal01", "unrelated-cg", "RASCAL", &["198.51.100.200"]),
        make_server(5, "edge99", "unrelated-cg", "EDGE", &["192.0.2.99"]),
    ];
    (mid, servers)
}

pub fn make_generic_ds(id: i64, xml_id: &str, ds_type: DsType, origin: &str) -> DeliveryService {
    DeliveryService {
        id: Some(id),
        xml_id: Some(xml_id.to_string()),
        ds_type: Some(ds_type),
        org_server_fqdn: Some(origin.to_string()),
        protocol: Some(1),
        example_urls: vec![format!("https://{xml_id}.example.net")],
        topology: None,
    }
}

pub fn make_dss(pairs: &[(i64, i64)]) -> Vec<DeliveryServiceServer> {
    pairs
        .iter()
        .map(|&(server, ds)| DeliveryServiceServer::new(server, ds))
        .collect()
}

pub fn make_ip_allow_param(name: &str, value: &str) -> Parameter {
    Parameter::new(name, "ip_allow.config", value).with_profiles([EDGE_PROFILE, MID_PROFILE])
}

/// A full snapshot centred on the generic edge
pub fn make_edge_snapshot() -> ServerSnapshot {
    let server = make_generic_server();
    ServerSnapshot {
        servers: vec![
            server.clone(),
            make_server(2, "edge02", EDGE_CACHE_GROUP, "EDGE", &["192.0.2.2"]),
        ],
        cache_groups: make_cache_groups(),
        delivery_services: vec![
            make_generic_ds(10, "ds1", DsType::HttpNoCache, "http://origin1.example.net:8080"),
            make_generic_ds(11, "ds2", DsType::Http, "http://origin2.example.net"),
        ],
        delivery_service_servers: make_dss(&[(1, 10), (2, 11)]),
        parameters: vec![make_ip_allow_param("purge_allow_ip", "10.10.10.10")],
        server,
    }
}
