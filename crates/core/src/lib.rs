// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rm-core: per-node resource manager state
//!
//! This crate provides:
//! - Reentrant read/write lock tables and per-resource pending queues
//! - The resource directory and peer set used for discovery
//! - The `ResourceManager` state machine, which turns one inbound message
//!   into a list of effects
//!
//! Nothing here performs I/O; see `rm-adapters` and `rm-node`.

pub mod id;
pub mod message;

pub mod directory;
pub mod lock_table;
pub mod pending;
pub mod resource;

pub mod effect;
pub mod manager;

pub use directory::{PeerSet, ResourceDirectory};
pub use effect::{Effect, Event};
pub use id::{Address, IdGen, SequentialIdGen};
pub use lock_table::LockTable;
pub use manager::ResourceManager;
pub use message::{
    AccessDenialReason, AccessKind, AccessMode, AccessRelease, AccessRequest, AckKind,
    DirectoryUpdateKind, Envelope, ManagementDenialReason, ManagementKind, ManagementRequest,
    Message,
};
pub use pending::{PendingEntry, PendingQueues};
pub use resource::{Resource, ResourcePhase, ResourceStatus};
