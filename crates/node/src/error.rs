// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for running nodes

use crate::config::ConfigError;
use rm_adapters::TransportError;
use rm_core::{AckKind, Address};
use thiserror::Error;

/// Errors that can occur while booting or talking to a cluster
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("{node} did not acknowledge {kind:?}")]
    MissingAck { node: Address, kind: AckKind },
    #[error("unexpected {reply} from {node}")]
    UnexpectedReply { node: Address, reply: &'static str },
    #[error("timed out waiting for a reply at {0}")]
    Timeout(Address),
    #[error("mailbox for {0} closed")]
    MailboxClosed(Address),
    #[error("node task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
