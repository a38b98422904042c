// Copyright (c) 2025 - Cowboy AI, Inc.
//! Delivery Service Domain Model
//!
//! Delivery services and their assignment to servers. A delivery service is
//! assigned either directly through [`DeliveryServiceServer`] rows or through a
//! topology, in which case the direct assignments are not consulted.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Delivery service routing type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DsType {
    Http,
    HttpNoCache,
    HttpLive,
    HttpLiveNational,
    Dns,
    DnsLive,
    DnsLiveNational,
    AnyMap,
    Steering,
    ClientSteering,
    Invalid,
}

impl DsType {
    /// Wire name used by the upstream API
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "HTTP",
            Self::HttpNoCache => "HTTP_NO_CACHE",
            Self::HttpLive => "HTTP_LIVE",
            Self::HttpLiveNational => "HTTP_LIVE_NATNL",
            Self::Dns => "DNS",
            Self::DnsLive => "DNS_LIVE",
            Self::DnsLiveNational => "DNS_LIVE_NATNL",
            Self::AnyMap => "ANY_MAP",
            Self::Steering => "STEERING",
            Self::ClientSteering => "CLIENT_STEERING",
            Self::Invalid => "INVALID",
        }
    }

    /// Parse a wire name; unknown names are `Invalid`
    pub fn from_wire_name(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "HTTP" => Self::Http,
            "HTTP_NO_CACHE" => Self::HttpNoCache,
            "HTTP_LIVE" => Self::HttpLive,
            "HTTP_LIVE_NATNL" => Self::HttpLiveNational,
            "DNS" => Self::Dns,
            "DNS_LIVE" => Self::DnsLive,
            "DNS_LIVE_NATNL" => Self::DnsLiveNational,
            "ANY_MAP" => Self::AnyMap,
            "STEERING" => Self::Steering,
            "CLIENT_STEERING" => Self::ClientSteering,
            _ => Self::Invalid,
        }
    }

    pub fn is_steering(&self) -> bool {
        matches!(self, Self::Steering | Self::ClientSteering)
    }

}

impl fmt::Display for DsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DsType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DsType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_wire_name(&s))
    }
}

/// A delivery service record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryService {
    pub id: Option<i64>,
    #[serde(rename = "xmlId")]
    pub xml_id: Option<String>,
    #[serde(rename = "type")]
    pub ds_type: Option<DsType>,
    #[serde(rename = "orgServerFqdn")]
    pub org_server_fqdn: Option<String>,
    /// 0 = HTTP only, anything else serves HTTPS
    pub protocol: Option<i64>,
    #[serde(rename = "exampleURLs", alias = "exampleUrls")]
    pub example_urls: Vec<String>,
    pub topology: Option<String>,
}

/// Direct assignment of a delivery service to a server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryServiceServer {
    pub server: Option<i64>,
    pub delivery_service: Option<i64>,
}

impl DeliveryServiceServer {
    pub fn new(server: i64, delivery_service: i64) -> Self {
        Self {
            server: Some(server),
            delivery_service: Some(delivery_service),
        }
    }
}
