// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Generator Determinism
//!
//! The same topology must compile to byte-identical files however its
//! servers, delivery services and parameters happen to be ordered.

use cdn_atscfg::atscfg::{make_cache_dot_config, make_ip_allow_dot_config};
use cdn_atscfg::domain::{DeliveryService, DsType, Parameter, Server};
use proptest::prelude::*;

use crate::fixtures::*;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Child edges with addresses drawn from two /24s
fn child_servers() -> impl Strategy<Value = Vec<Server>> {
    prop::collection::vec((0u8..2, 1u8..255, any::<bool>()), 0..20).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (net, host, other_group))| {
                let cache_group = if other_group {
                    OTHER_EDGE_CACHE_GROUP
                } else {
                    EDGE_CACHE_GROUP
                };
                let address = format!("192.0.{net}.{host}");
                make_server(
                    i as i64 + 1,
                    &format!("edge{i:02}"),
                    cache_group,
                    "EDGE",
                    &[address.as_str()],
                )
            })
            .collect()
    })
}

fn ip_allow_params() -> impl Strategy<Value = Vec<Parameter>> {
    prop::collection::vec(
        prop_oneof![
            (1u8..=254).prop_map(|o| make_ip_allow_param("purge_allow_ip", &format!("10.0.0.{o}"))),
            (0u8..6).prop_map(|n| make_ip_allow_param("coalesce_number_v4", &n.to_string())),
            (16u8..=32).prop_map(|n| make_ip_allow_param("coalesce_masklen_v4", &n.to_string())),
            Just(make_ip_allow_param("coalesce_number_v4", "not-a-number")),
        ],
        0..8,
    )
}

fn delivery_services() -> impl Strategy<Value = Vec<DeliveryService>> {
    prop::collection::vec((0u8..5, any::<bool>(), prop::option::of(1u16..9000)), 0..15).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (origin, no_cache, port))| {
                    let ds_type = if no_cache {
                        DsType::HttpNoCache
                    } else {
                        DsType::Http
                    };
                    let origin = match port {
                        Some(port) => format!("http://origin{origin}.example.net:{port}"),
                        None => format!("http://origin{origin}.example.net"),
                    };
                    make_generic_ds(i as i64 + 10, &format!("ds{i}"), ds_type, &origin)
                })
                .collect()
        },
    )
}

fn shuffled<T: Clone + std::fmt::Debug + 'static>(
    items: impl Strategy<Value = Vec<T>>,
) -> impl Strategy<Value = (Vec<T>, Vec<T>)> {
    items.prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Mid ip_allow.config ignores server and parameter order
    #[test]
    fn prop_ip_allow_is_order_independent(
        (servers, servers_shuffled) in shuffled(child_servers()),
        (params, params_shuffled) in shuffled(ip_allow_params()),
    ) {
        let (mid, _) = make_mid_topology();
        let cache_groups = make_cache_groups();

        let a = make_ip_allow_dot_config(&params, &mid, &servers, &cache_groups, HDR);
        let b = make_ip_allow_dot_config(&params_shuffled, &mid, &servers_shuffled, &cache_groups, HDR);
        prop_assert_eq!(a, b);
    }

    /// Property: Edge cache.config ignores delivery service and assignment order
    #[test]
    fn prop_cache_is_order_independent(
        (dses, dses_shuffled) in shuffled(delivery_services()),
        assigned in prop::collection::vec(10i64..25, 0..15),
    ) {
        let server = make_generic_server();
        let servers = vec![server.clone()];
        let pairs: Vec<(i64, i64)> = assigned.iter().map(|ds| (1, *ds)).collect();
        let dss = make_dss(&pairs);
        let mut dss_reversed = dss.clone();
        dss_reversed.reverse();

        let a = make_cache_dot_config(&server, &servers, &dses, &dss, HDR);
        let b = make_cache_dot_config(&server, &servers, &dses_shuffled, &dss_reversed, HDR);
        prop_assert_eq!(a, b);
    }

    /// Property: Rendering twice yields the same bytes, with rules in sorted order
    #[test]
    fn prop_cache_lines_are_sorted_and_unique(dses in delivery_services()) {
        let server = make_generic_server();
        let mut with_topology = dses.clone();
        for ds in &mut with_topology {
            ds.topology = Some("t1".to_string());
        }
        let cfg = make_cache_dot_config(&server, &[server.clone()], &with_topology, &[], HDR)
            .expect("render failed");
        let again = make_cache_dot_config(&server, &[server.clone()], &with_topology, &[], HDR)
            .expect("render failed");
        prop_assert_eq!(&cfg.text, &again.text);

        let lines: Vec<&str> = cfg.text.lines().skip(1).filter(|l| !l.is_empty()).collect();
        prop_assert!(lines.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
