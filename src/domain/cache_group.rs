// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cache Group Domain Model
//!
//! A cache group is a named set of caches sharing one position in the
//! request-routing hierarchy. Parents are referenced by name (for graph
//! traversal) and by id, where [`INVALID_ID`] means "no parent".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::ConfigErrorKind;

/// Id sentinel for "no parent cache group"
///
/// Part of the wire contract with the upstream API; keep it `-1`.
pub const INVALID_ID: i64 = -1;

/// Type name of cache groups holding origins
pub const CACHE_GROUP_ORIGIN_TYPE_NAME: &str = "ORG_LOC";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheGroup {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(rename = "typeName")]
    pub type_name: Option<String>,
    pub parent_cachegroup_id: Option<i64>,
    #[serde(rename = "parentCachegroupName")]
    pub parent_name: Option<String>,
    pub secondary_parent_cachegroup_id: Option<i64>,
    #[serde(rename = "secondaryParentCachegroupName")]
    pub secondary_parent_name: Option<String>,
}

impl CacheGroup {
    /// Named cache group with no parents
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_name = Some(parent.into());
        self
    }

    pub fn with_secondary_parent(mut self, parent: impl Into<String>) -> Self {
        self.secondary_parent_name = Some(parent.into());
        self
    }

    /// Whether this group is a (primary or secondary) child of `parent`
    pub fn is_child_of(&self, parent: &str) -> bool {
        self.parent_name.as_deref() == Some(parent)
            || self.secondary_parent_name.as_deref() == Some(parent)
    }
}

/// Index cache groups by name
///
/// Fails on the first group without a name; the graph can't be walked
/// reliably once a node is anonymous.
pub fn cache_groups_by_name(
    cache_groups: &[CacheGroup],
) -> Result<BTreeMap<&str, &CacheGroup>, ConfigErrorKind> {
    let mut by_name = BTreeMap::new();
    for cg in cache_groups {
        let name = cg.name.as_deref().ok_or(ConfigErrorKind::UnnamedCacheGroup)?;
        by_name.insert(name, cg);
    }
    Ok(by_name)
}

/// Look up a cache group by name, as a hard error when it is absent
pub fn require_cache_group<'a>(
    by_name: &BTreeMap<&str, &'a CacheGroup>,
    name: &str,
) -> Result<&'a CacheGroup, ConfigErrorKind> {
    by_name
        .get(name)
        .copied()
        .ok_or_else(|| ConfigErrorKind::CacheGroupNotFound(name.to_string()))
}
