// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process transport over tokio channels

use super::{Transport, TransportError};
use async_trait::async_trait;
use rm_core::{Address, Envelope};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Routes envelopes to per-address unbounded mailboxes.
///
/// Each mailbox is a single FIFO channel, so envelopes from one sender to one
/// recipient arrive in the order they were sent.
#[derive(Clone, Default)]
pub struct ChannelTransport {
    mailboxes: Arc<Mutex<HashMap<Address, mpsc::UnboundedSender<Envelope>>>>,
}

impl ChannelTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a mailbox for `address`.
    ///
    /// Fails while another live mailbox holds the address; a mailbox whose
    /// receiver was dropped may be replaced.
    pub fn register(&self, address: Address) -> Result<Mailbox, TransportError> {
        let mut mailboxes = self.mailboxes.lock().unwrap_or_else(|e| e.into_inner());
        if mailboxes.get(&address).is_some_and(|tx| !tx.is_closed()) {
            return Err(TransportError::AddressInUse(address));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        mailboxes.insert(address.clone(), tx);
        Ok(Mailbox { address, rx })
    }

    /// Close the mailbox for `address`; its receiver drains then ends
    pub fn deregister(&self, address: &Address) -> bool {
        self.mailboxes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(address)
            .is_some()
    }

    pub fn is_registered(&self, address: &Address) -> bool {
        self.mailboxes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(address)
    }

    /// Registered addresses, sorted
    pub fn addresses(&self) -> Vec<Address> {
        let mut addresses: Vec<Address> = self
            .mailboxes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        addresses.sort();
        addresses
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&self, envelope: Envelope) -> Result<(), TransportError> {
        let tx = self
            .mailboxes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&envelope.to)
            .cloned()
            .ok_or_else(|| TransportError::UnknownAddress(envelope.to.clone()))?;

        let to = envelope.to.clone();
        tx.send(envelope)
            .map_err(|_| TransportError::MailboxClosed(to))
    }
}

/// Receiving end for one address
pub struct Mailbox {
    address: Address,
    rx: mpsc::UnboundedReceiver<Envelope>,
}

impl Mailbox {
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Wait for the next envelope; `None` once the mailbox is deregistered and drained
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.rx.recv().await
    }

    /// Next envelope if one is already waiting
    pub fn try_recv(&mut self) -> Option<Envelope> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
