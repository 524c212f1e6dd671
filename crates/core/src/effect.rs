// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects and events produced by the resource manager
//!
//! The manager never touches the network. Every call returns the list of
//! effects the runtime must carry out, in order.

use crate::id::Address;
use crate::message::{AccessKind, AccessMode, Message};
use serde::{Deserialize, Serialize};

/// Side effects requested by the manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver a message the manager authored
    Send { to: Address, message: Message },
    /// Relay a request to the owning peer, keeping its original reply-to.
    /// Delivery failure is reported back via `ResourceManager::forward_failed`.
    Forward { to: Address, message: Message },
    /// Emit an event for observability
    Emit(Event),
}

impl Effect {
    pub fn send(to: &Address, message: Message) -> Self {
        Effect::Send {
            to: to.clone(),
            message,
        }
    }
}

/// State changes worth observing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    // Resource lifecycle
    ResourceAdded {
        name: String,
    },
    ResourceRemoved {
        name: String,
    },
    ResourceEnabled {
        name: String,
    },
    DisableRequested {
        name: String,
        denied: usize,
    },
    ResourceDisabled {
        name: String,
    },
    DuplicateResourceSkipped {
        name: String,
    },

    // Access
    AccessGranted {
        resource: String,
        holder: Address,
        mode: AccessMode,
    },
    AccessQueued {
        resource: String,
        requester: Address,
        position: usize,
    },
    AccessReleased {
        resource: String,
        holder: Address,
        kind: AccessKind,
    },
    ReleaseIgnored {
        resource: String,
        holder: Address,
    },

    // Directory and peers
    PeerRegistered {
        peer: Address,
    },
    DirectoryUpdated {
        name: String,
        owner: Option<Address>,
    },
    PeerUnreachable {
        peer: Address,
        forgotten: Vec<String>,
    },

    // Inbound messages the manager has no use for
    MessageIgnored {
        from: Address,
        message: String,
    },
}

impl Event {
    /// Stable name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Event::ResourceAdded { .. } => "resource:added",
            Event::ResourceRemoved { .. } => "resource:removed",
            Event::ResourceEnabled { .. } => "resource:enabled",
            Event::DisableRequested { .. } => "resource:disable_requested",
            Event::ResourceDisabled { .. } => "resource:disabled",
            Event::DuplicateResourceSkipped { .. } => "resource:duplicate_skipped",
            Event::AccessGranted { .. } => "access:granted",
            Event::AccessQueued { .. } => "access:queued",
            Event::AccessReleased { .. } => "access:released",
            Event::ReleaseIgnored { .. } => "access:release_ignored",
            Event::PeerRegistered { .. } => "peer:registered",
            Event::DirectoryUpdated { .. } => "directory:updated",
            Event::PeerUnreachable { .. } => "peer:unreachable",
            Event::MessageIgnored { .. } => "message:ignored",
        }
    }
}
