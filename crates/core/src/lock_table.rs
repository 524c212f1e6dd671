// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reentrant holder counts per resource
//!
//! A `LockTable` only records who holds what and how many times. It has no
//! opinion on who may acquire; the manager decides that before calling
//! [`LockTable::add_holder`].

use crate::id::Address;
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct LockTable {
    /// resource -> holder -> reentrancy count (always >= 1)
    holders: HashMap<String, HashMap<Address, u32>>,
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more acquisition by `holder`
    pub fn add_holder(&mut self, resource: &str, holder: &Address) {
        *self
            .holders
            .entry(resource.to_string())
            .or_default()
            .entry(holder.clone())
            .or_insert(0) += 1;
    }

    /// Undo one acquisition by `holder`; returns false if it held nothing
    pub fn remove_holder(&mut self, resource: &str, holder: &Address) -> bool {
        let Some(counts) = self.holders.get_mut(resource) else {
            return false;
        };
        let Some(count) = counts.get_mut(holder) else {
            return false;
        };

        *count -= 1;
        if *count == 0 {
            counts.remove(holder);
        }
        if counts.is_empty() {
            self.holders.remove(resource);
        }
        true
    }

    pub fn has_holders(&self, resource: &str) -> bool {
        self.holders.get(resource).is_some_and(|c| !c.is_empty())
    }

    pub fn has_holder(&self, resource: &str, holder: &Address) -> bool {
        self.holders
            .get(resource)
            .is_some_and(|c| c.contains_key(holder))
    }

    pub fn is_only_holder(&self, resource: &str, holder: &Address) -> bool {
        self.holders
            .get(resource)
            .is_some_and(|c| c.len() == 1 && c.contains_key(holder))
    }

    /// Number of distinct holders
    pub fn holder_count(&self, resource: &str) -> usize {
        self.holders.get(resource).map_or(0, HashMap::len)
    }

    /// Reentrancy count of `holder`, zero when absent
    pub fn count(&self, resource: &str, holder: &Address) -> u32 {
        self.holders
            .get(resource)
            .and_then(|c| c.get(holder))
            .copied()
            .unwrap_or(0)
    }

    /// Holders of `resource`, sorted for stable output
    pub fn holders(&self, resource: &str) -> Vec<Address> {
        let mut holders: Vec<Address> = self
            .holders
            .get(resource)
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default();
        holders.sort();
        holders
    }

    /// Drop every holder of `resource`
    pub fn clear(&mut self, resource: &str) {
        self.holders.remove(resource);
    }
}

#[cfg(test)]
#[path = "lock_table_tests.rs"]
mod tests;
