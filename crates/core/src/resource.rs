// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Locally owned resources

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceStatus {
    Enabled,
    Disabled,
}

/// Lifecycle phase of a local resource, derived from its status and queue head
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourcePhase {
    /// Enabled and accepting grants
    Active,
    /// A Disable entry heads the queue; waiting for current holders to release
    DrainPending,
    Disabled,
}

/// A named resource owned by this manager
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    name: String,
    pub status: ResourceStatus,
}

impl Resource {
    /// New resources start out enabled
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ResourceStatus::Enabled,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.status == ResourceStatus::Enabled
    }

    pub fn enable(&mut self) {
        self.status = ResourceStatus::Enabled;
    }

    pub fn disable(&mut self) {
        self.status = ResourceStatus::Disabled;
    }
}
