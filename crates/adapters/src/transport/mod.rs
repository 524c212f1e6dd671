// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message delivery between addresses
//!
//! A transport delivers envelopes asynchronously and preserves order per
//! (sender, recipient) pair. It makes no promise that the recipient is
//! still listening.

mod channel;
#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use channel::{ChannelTransport, Mailbox};
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTransport;

use async_trait::async_trait;
use rm_core::{Address, Envelope};
use thiserror::Error;

/// Errors from transport operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("no mailbox registered for {0}")]
    UnknownAddress(Address),
    #[error("address {0} is already registered")]
    AddressInUse(Address),
    #[error("mailbox for {0} is closed")]
    MailboxClosed(Address),
}

/// Adapter for delivering envelopes
#[async_trait]
pub trait Transport: Clone + Send + Sync + 'static {
    async fn send(&self, envelope: Envelope) -> Result<(), TransportError>;
}
