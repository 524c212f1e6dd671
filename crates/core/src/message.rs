// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-level message set exchanged between users and resource managers
//!
//! [`Message`] is a closed enum: adding a message kind forces every `match`
//! in the manager and runtime to handle it.

use crate::id::Address;
use serde::{Deserialize, Serialize};

/// How a requester wants to access a resource
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessMode {
    WriteBlocking,
    WriteNonBlocking,
    ReadBlocking,
    ReadNonBlocking,
}

impl AccessMode {
    pub fn kind(self) -> AccessKind {
        match self {
            AccessMode::WriteBlocking | AccessMode::WriteNonBlocking => AccessKind::Write,
            AccessMode::ReadBlocking | AccessMode::ReadNonBlocking => AccessKind::Read,
        }
    }

    /// Blocking requests are queued instead of denied when the resource is busy
    pub fn is_blocking(self) -> bool {
        matches!(self, AccessMode::WriteBlocking | AccessMode::ReadBlocking)
    }
}

/// Lock flavour held on a resource
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessKind {
    Write,
    Read,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    pub resource: String,
    pub mode: AccessMode,
}

impl AccessRequest {
    pub fn new(resource: impl Into<String>, mode: AccessMode) -> Self {
        Self {
            resource: resource.into(),
            mode,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRelease {
    pub resource: String,
    pub kind: AccessKind,
    pub holder: Address,
}

impl AccessRelease {
    pub fn new(resource: impl Into<String>, kind: AccessKind, holder: Address) -> Self {
        Self {
            resource: resource.into(),
            kind,
            holder,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessDenialReason {
    Busy,
    Disabled,
    NotFound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManagementKind {
    Add,
    Enable,
    Disable,
    Remove,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagementRequest {
    pub resource: String,
    pub kind: ManagementKind,
}

impl ManagementRequest {
    pub fn new(resource: impl Into<String>, kind: ManagementKind) -> Self {
        Self {
            resource: resource.into(),
            kind,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManagementDenialReason {
    NotLocal,
    NotFound,
    AccessHeld,
    NotDisabled,
    NameClash,
}

/// Direction of a directory delta broadcast
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectoryUpdateKind {
    Add,
    Remove,
}

/// Which administrative request an [`Message::Ack`] answers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckKind {
    InitialLocalResources,
    LocalUsers,
    RemoteManagers,
}

/// Every message a manager sends or receives
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    AccessRequest {
        request: AccessRequest,
        reply_to: Address,
    },
    AccessGranted {
        request: AccessRequest,
    },
    AccessDenied {
        request: AccessRequest,
        reason: AccessDenialReason,
    },
    AccessRelease {
        release: AccessRelease,
    },
    ManagementRequest {
        request: ManagementRequest,
        reply_to: Address,
    },
    ManagementGranted {
        request: ManagementRequest,
    },
    ManagementDenied {
        request: ManagementRequest,
        reason: ManagementDenialReason,
    },
    AddInitialLocalResources {
        resources: Vec<String>,
    },
    AddLocalUsers {
        users: Vec<Address>,
    },
    AddRemoteManagers {
        managers: Vec<Address>,
    },
    Ack(AckKind),
    DirectoryUpdate {
        kind: DirectoryUpdateKind,
        names: Vec<String>,
    },
    ResourceListRequest,
    ResourceListResponse {
        resources: Vec<String>,
    },
}

impl Message {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Message::AccessRequest { .. } => "access_request",
            Message::AccessGranted { .. } => "access_granted",
            Message::AccessDenied { .. } => "access_denied",
            Message::AccessRelease { .. } => "access_release",
            Message::ManagementRequest { .. } => "management_request",
            Message::ManagementGranted { .. } => "management_granted",
            Message::ManagementDenied { .. } => "management_denied",
            Message::AddInitialLocalResources { .. } => "add_initial_local_resources",
            Message::AddLocalUsers { .. } => "add_local_users",
            Message::AddRemoteManagers { .. } => "add_remote_managers",
            Message::Ack(_) => "ack",
            Message::DirectoryUpdate { .. } => "directory_update",
            Message::ResourceListRequest => "resource_list_request",
            Message::ResourceListResponse { .. } => "resource_list_response",
        }
    }

    pub fn access_request(
        resource: impl Into<String>,
        mode: AccessMode,
        reply_to: Address,
    ) -> Self {
        Message::AccessRequest {
            request: AccessRequest::new(resource, mode),
            reply_to,
        }
    }

    pub fn release(resource: impl Into<String>, kind: AccessKind, holder: Address) -> Self {
        Message::AccessRelease {
            release: AccessRelease::new(resource, kind, holder),
        }
    }

    pub fn management_request(
        resource: impl Into<String>,
        kind: ManagementKind,
        reply_to: Address,
    ) -> Self {
        Message::ManagementRequest {
            request: ManagementRequest::new(resource, kind),
            reply_to,
        }
    }

    /// Resource name the message is about, if any
    pub fn resource(&self) -> Option<&str> {
        match self {
            Message::AccessRequest { request, .. }
            | Message::AccessGranted { request }
            | Message::AccessDenied { request, .. } => Some(&request.resource),
            Message::AccessRelease { release } => Some(&release.resource),
            Message::ManagementRequest { request, .. }
            | Message::ManagementGranted { request }
            | Message::ManagementDenied { request, .. } => Some(&request.resource),
            _ => None,
        }
    }
}

/// A message in flight between two addresses
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub from: Address,
    pub to: Address,
    pub message: Message,
}

impl Envelope {
    pub fn new(from: Address, to: Address, message: Message) -> Self {
        Self { from, to, message }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
