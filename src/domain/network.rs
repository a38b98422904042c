// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Value Objects and CIDR Utilities
//!
//! Address and CIDR parsing, prefix coalescing and `start-end` range
//! rendering used by the access-control generators.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use thiserror::Error;

/// Network validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Invalid prefix length: {0} (must be 0-32 for IPv4, 0-128 for IPv6)")]
    InvalidPrefixLength(u8),
}

/// An IPv4 or IPv6 network in CIDR form
///
/// Invariants:
/// - Prefix length within the address family's width
/// - Host bits of `address` are zero, so equal networks compare equal
///
/// Ordering is by address (every IPv4 network sorts before every IPv6
/// network), then by prefix length.
///
/// # Examples
///
/// ```rust
/// use cdn_atscfg::domain::IpNetwork;
///
/// let net: IpNetwork = "192.168.1.10/24".parse().unwrap();
/// assert_eq!(net.to_string(), "192.168.1.0/24");
/// assert_eq!(net.range_string(), "192.168.1.0-192.168.1.255");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IpNetwork {
    address: IpAddr,
    prefix_length: u8,
}

impl IpNetwork {
    /// Create a network, clearing any host bits in `address`
    pub fn new(address: IpAddr, prefix_length: u8) -> Result<Self, NetworkError> {
        let width = family_width(&address);
        if prefix_length > width {
            return Err(NetworkError::InvalidPrefixLength(prefix_length));
        }
        let bits = to_bits(&address) & mask(width, prefix_length);
        Ok(Self {
            address: from_bits(bits, address.is_ipv4()),
            prefix_length,
        })
    }

    /// Single-address network (/32 or /128)
    pub fn host(address: IpAddr) -> Self {
        Self {
            prefix_length: family_width(&address),
            address,
        }
    }

    /// Network address
    pub fn address(&self) -> IpAddr {
        self.address
    }

    pub fn prefix_length(&self) -> u8 {
        self.prefix_length
    }

    pub fn is_ipv4(&self) -> bool {
        self.address.is_ipv4()
    }

    pub fn is_ipv6(&self) -> bool {
        self.address.is_ipv6()
    }

    /// First address in the network
    pub fn first(&self) -> IpAddr {
        self.address
    }

    /// Last address in the network
    pub fn last(&self) -> IpAddr {
        let width = family_width(&self.address);
        let host_bits = !mask(width, self.prefix_length) & mask(width, width);
        from_bits(to_bits(&self.address) | host_bits, self.is_ipv4())
    }

    /// Whether `address` falls inside this network
    pub fn contains(&self, address: &IpAddr) -> bool {
        if address.is_ipv4() != self.is_ipv4() {
            return false;
        }
        let width = family_width(&self.address);
        to_bits(address) & mask(width, self.prefix_length) == to_bits(&self.address)
    }

    /// The `/mask_len` network covering this one
    ///
    /// `None` when `mask_len` exceeds the family width or this network is
    /// already wider than `mask_len`.
    pub fn supernet(&self, mask_len: u8) -> Option<Self> {
        if mask_len > family_width(&self.address) || self.prefix_length < mask_len {
            return None;
        }
        Self::new(self.address, mask_len).ok()
    }

    /// `first-last` form, as written into access-control rules
    pub fn range_string(&self) -> String {
        format!("{}-{}", self.first(), self.last())
    }
}

impl fmt::Display for IpNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_length)
    }
}

impl FromStr for IpNetwork {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('/') {
            parse_cidr(s)
        } else {
            parse_address(s)
        }
    }
}

/// Parse a bare address into its host network
///
/// IPv4-mapped IPv6 addresses are treated as IPv4.
pub fn parse_address(s: &str) -> Result<IpNetwork, NetworkError> {
    let address = IpAddr::from_str(s)
        .map_err(|_| NetworkError::InvalidIpAddress(s.to_string()))?
        .to_canonical();
    Ok(IpNetwork::host(address))
}

/// Parse `address/prefix` notation into its network
///
/// An IPv4-mapped IPv6 network of at least /96 is treated as the IPv4
/// network it maps, with the prefix shortened by 96.
pub fn parse_cidr(s: &str) -> Result<IpNetwork, NetworkError> {
    let (addr_str, prefix_str) = s
        .split_once('/')
        .ok_or_else(|| NetworkError::InvalidCidr(s.to_string()))?;

    let address = IpAddr::from_str(addr_str)
        .map_err(|_| NetworkError::InvalidIpAddress(addr_str.to_string()))?;

    if prefix_str.is_empty() || !prefix_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NetworkError::InvalidCidr(s.to_string()));
    }
    let prefix_length = prefix_str
        .parse::<u8>()
        .map_err(|_| NetworkError::InvalidCidr(s.to_string()))?;

    let network = IpNetwork::new(address, prefix_length)?;
    match network.address.to_canonical() {
        v4 @ IpAddr::V4(_) if network.is_ipv6() && prefix_length >= V4_MAPPED_PREFIX => {
            IpNetwork::new(v4, prefix_length - V4_MAPPED_PREFIX)
        }
        _ => Ok(network),
    }
}

/// Length of the `::ffff:0:0/96` prefix carrying IPv4-mapped addresses
const V4_MAPPED_PREFIX: u8 = 96;

/// Coalesce networks sharing a `/mask_len` prefix
///
/// Networks at least as long as `mask_len` are grouped by their covering
/// `/mask_len` network. A group with more than `threshold` distinct members is
/// replaced by the covering network; smaller groups pass through as they are.
/// Networks wider than `mask_len` always pass through. The result is sorted
/// and free of duplicates, so it does not depend on input order.
pub fn coalesce(ranges: &[IpNetwork], threshold: usize, mask_len: u8) -> Vec<IpNetwork> {
    let mut groups: BTreeMap<IpNetwork, BTreeSet<IpNetwork>> = BTreeMap::new();
    let mut coalesced = BTreeSet::new();

    for range in ranges {
        match range.supernet(mask_len) {
            Some(cover) => {
                groups.entry(cover).or_default().insert(*range);
            }
            None => {
                coalesced.insert(*range);
            }
        }
    }

    for (cover, members) in groups {
        if members.len() > threshold {
            coalesced.insert(cover);
        } else {
            coalesced.extend(members);
        }
    }

    coalesced.into_iter().collect()
}

/// `first-last` form of a network
pub fn range_string(range: &IpNetwork) -> String {
    range.range_string()
}

fn family_width(address: &IpAddr) -> u8 {
    match address {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

fn mask(width: u8, prefix_length: u8) -> u128 {
    let full = if width == 128 {
        u128::MAX
    } else {
        (1u128 << width) - 1
    };
    if prefix_length == 0 {
        return 0;
    }
    (full << (width - prefix_length)) & full
}

fn to_bits(address: &IpAddr) -> u128 {
    match address {
        IpAddr::V4(v4) => u128::from(u32::from(*v4)),
        IpAddr::V6(v6) => u128::from(*v6),
    }
}

fn from_bits(bits: u128, ipv4: bool) -> IpAddr {
    if ipv4 {
        IpAddr::V4(Ipv4Addr::from(bits as u32))
    } else {
        IpAddr::V6(Ipv6Addr::from(bits))
    }
}
