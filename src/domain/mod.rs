// Copyright (c) 2025 - Cowboy AI, Inc.
//! CDN Domain Models
//!
//! Read-only snapshots of the CDN topology handed to the generators:
//!
//! - [`Server`] - cache servers with their interfaces and addresses
//! - [`CacheGroup`] - named tiers and their parent relationships
//! - [`DeliveryService`] - hosted content services and their assignments
//! - [`Parameter`] - per-profile tunables
//! - [`IpNetwork`] - address/CIDR value object and coalescing utilities

pub mod cache_group;
pub mod delivery_service;
pub mod network;
pub mod parameter;
pub mod server;

pub use cache_group::{CacheGroup, CACHE_GROUP_ORIGIN_TYPE_NAME, INVALID_ID};
pub use delivery_service::{DeliveryService, DeliveryServiceServer, DsType};
pub use network::{coalesce, parse_address, parse_cidr, range_string, IpNetwork, NetworkError};
pub use parameter::Parameter;
pub use server::{Server, ServerInfo, ServerInterface, ServerIpAddress, ServerTier};
