// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Prefix Coalescing
//!
//! Coalescing may widen what a rule admits but must never drop an address,
//! and its result is a canonical, sorted set.

use cdn_atscfg::domain::{coalesce, IpNetwork};
use proptest::prelude::*;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// IPv4 hosts clustered in a few /24s so groups actually form
fn clustered_v4_host() -> impl Strategy<Value = IpNetwork> {
    (0u8..4, any::<u8>()).prop_map(|(net, host)| {
        IpNetwork::host(IpAddr::V4(Ipv4Addr::new(192, 0, net, host)))
    })
}

/// IPv4 networks of any prefix length
fn any_v4_network() -> impl Strategy<Value = IpNetwork> {
    (any::<u32>(), 0u8..=32).prop_map(|(bits, len)| {
        IpNetwork::new(IpAddr::V4(Ipv4Addr::from(bits)), len).expect("valid prefix length")
    })
}

fn clustered_v6_host() -> impl Strategy<Value = IpNetwork> {
    (0u16..3, any::<u16>()).prop_map(|(net, host)| {
        IpNetwork::host(IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, net, 0, 0, 0, 0, host)))
    })
}

fn ranges() -> impl Strategy<Value = Vec<IpNetwork>> {
    prop::collection::vec(
        prop_oneof![clustered_v4_host(), any_v4_network(), clustered_v6_host()],
        0..40,
    )
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Every input address stays admitted
    #[test]
    fn prop_coalesce_covers_every_input(
        input in ranges(),
        threshold in 0usize..8,
        mask_len in 0u8..=32,
    ) {
        let output = coalesce(&input, threshold, mask_len);
        for range in &input {
            prop_assert!(
                output.iter().any(|net| net.contains(&range.first()) && net.contains(&range.last())),
                "{} not covered by {:?}", range, output
            );
        }
    }

    /// Property: Output is sorted with no duplicates
    #[test]
    fn prop_coalesce_is_sorted_and_unique(
        input in ranges(),
        threshold in 0usize..8,
        mask_len in 0u8..=32,
    ) {
        let output = coalesce(&input, threshold, mask_len);
        prop_assert!(output.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// Property: Input order is irrelevant
    #[test]
    fn prop_coalesce_ignores_order(
        (input, shuffled) in ranges().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
        threshold in 0usize..8,
    ) {
        prop_assert_eq!(coalesce(&input, threshold, 24), coalesce(&shuffled, threshold, 24));
    }

    /// Property: A group coalesces exactly when it exceeds the threshold
    #[test]
    fn prop_coalesce_threshold_boundary(threshold in 1usize..20, net in 0u8..=255) {
        let hosts = |n: usize| -> Vec<IpNetwork> {
            (0..n)
                .map(|i| IpNetwork::host(IpAddr::V4(Ipv4Addr::new(10, net, 0, i as u8))))
                .collect()
        };

        let at = coalesce(&hosts(threshold), threshold, 24);
        prop_assert_eq!(at.len(), threshold);

        let over = coalesce(&hosts(threshold + 1), threshold, 24);
        prop_assert_eq!(over.len(), 1);
        prop_assert_eq!(over[0].to_string(), format!("10.{}.0.0/24", net));
    }
}
