// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-resource FIFO of blocked requests
//!
//! A queue exists for a resource exactly while the resource is local.
//! Operations on a resource without a queue are no-ops.

use crate::id::Address;
use crate::message::{AccessRequest, ManagementKind, ManagementRequest};
use std::collections::{HashMap, VecDeque};

/// A request waiting for a lock or an administrative transition
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingEntry {
    Access {
        request: AccessRequest,
        reply_to: Address,
    },
    Management {
        request: ManagementRequest,
        reply_to: Address,
    },
}

impl PendingEntry {
    pub fn reply_to(&self) -> &Address {
        match self {
            PendingEntry::Access { reply_to, .. } | PendingEntry::Management { reply_to, .. } => {
                reply_to
            }
        }
    }

    pub fn is_management(&self) -> bool {
        matches!(self, PendingEntry::Management { .. })
    }

    pub fn is_disable(&self) -> bool {
        matches!(
            self,
            PendingEntry::Management { request, .. } if request.kind == ManagementKind::Disable
        )
    }
}

#[derive(Clone, Debug, Default)]
pub struct PendingQueues {
    queues: HashMap<String, VecDeque<PendingEntry>>,
}

impl PendingQueues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `resource`; an existing queue is left untouched
    pub fn create_for(&mut self, resource: &str) {
        self.queues.entry(resource.to_string()).or_default();
    }

    /// Stop tracking `resource`, returning whatever was still queued
    pub fn destroy_for(&mut self, resource: &str) -> Vec<PendingEntry> {
        self.queues
            .remove(resource)
            .map(Vec::from)
            .unwrap_or_default()
    }

    pub fn exists(&self, resource: &str) -> bool {
        self.queues.contains_key(resource)
    }

    /// Append to the tail; returns the new queue length, or None if untracked
    pub fn enqueue(&mut self, resource: &str, entry: PendingEntry) -> Option<usize> {
        let queue = self.queues.get_mut(resource)?;
        queue.push_back(entry);
        Some(queue.len())
    }

    pub fn dequeue_front(&mut self, resource: &str) -> Option<PendingEntry> {
        self.queues.get_mut(resource)?.pop_front()
    }

    pub fn peek_front(&self, resource: &str) -> Option<&PendingEntry> {
        self.queues.get(resource)?.front()
    }

    pub fn size(&self, resource: &str) -> usize {
        self.queues.get(resource).map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self, resource: &str) -> bool {
        self.size(resource) == 0
    }

    /// Swap the whole queue for `entries`, returning the previous contents in order
    pub fn replace(&mut self, resource: &str, entries: Vec<PendingEntry>) -> Vec<PendingEntry> {
        match self.queues.get_mut(resource) {
            Some(queue) => {
                let previous = std::mem::replace(queue, VecDeque::from(entries));
                Vec::from(previous)
            }
            None => Vec::new(),
        }
    }

    pub fn iter(&self, resource: &str) -> impl Iterator<Item = &PendingEntry> {
        self.queues.get(resource).into_iter().flatten()
    }
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
