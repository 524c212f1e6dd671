// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Where non-local resources live, and who to broadcast to

use crate::id::Address;
use std::collections::{BTreeSet, HashMap};

/// Maps a non-local resource name to the peer believed to own it
#[derive(Clone, Debug, Default)]
pub struct ResourceDirectory {
    owners: HashMap<String, Address>,
}

impl ResourceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<&Address> {
        self.owners.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.owners.contains_key(name)
    }

    /// Record `owner` for `name`, returning the previous owner if it changed
    pub fn insert(&mut self, name: impl Into<String>, owner: Address) -> Option<Address> {
        self.owners.insert(name.into(), owner)
    }

    pub fn remove(&mut self, name: &str) -> Option<Address> {
        self.owners.remove(name)
    }

    /// Drop every entry pointing at `peer`; returns the forgotten names
    pub fn forget_owner(&mut self, peer: &Address) -> Vec<String> {
        let mut forgotten: Vec<String> = self
            .owners
            .iter()
            .filter(|(_, owner)| *owner == peer)
            .map(|(name, _)| name.clone())
            .collect();
        forgotten.sort();
        for name in &forgotten {
            self.owners.remove(name);
        }
        forgotten
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.owners.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Known sibling managers, never including the owning manager itself
#[derive(Clone, Debug)]
pub struct PeerSet {
    me: Address,
    peers: BTreeSet<Address>,
}

impl PeerSet {
    pub fn new(me: Address) -> Self {
        Self {
            me,
            peers: BTreeSet::new(),
        }
    }

    /// Returns true if `peer` is new and not ourselves
    pub fn register(&mut self, peer: Address) -> bool {
        if peer == self.me {
            return false;
        }
        self.peers.insert(peer)
    }

    pub fn remove(&mut self, peer: &Address) -> bool {
        self.peers.remove(peer)
    }

    pub fn contains(&self, peer: &Address) -> bool {
        self.peers.contains(peer)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.peers.iter()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
