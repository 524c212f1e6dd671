// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User endpoint for talking to resource managers

use crate::error::NodeError;
use rm_adapters::{Mailbox, Transport};
use rm_core::{AccessKind, AccessMode, Address, Envelope, ManagementKind, Message};
use std::time::Duration;

/// How long a client waits for a single reply by default
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(5);

/// A user with its own mailbox.
///
/// Blocking access requests may stay queued for a long time; callers that
/// expect that should use [`Client::send`] and [`Client::recv_timeout`].
pub struct Client<T> {
    mailbox: Mailbox,
    transport: T,
    timeout: Duration,
}

impl<T: Transport> Client<T> {
    pub fn new(mailbox: Mailbox, transport: T) -> Self {
        Self {
            mailbox,
            transport,
            timeout: DEFAULT_REPLY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn address(&self) -> &Address {
        self.mailbox.address()
    }

    /// Send `message` to `to` without waiting
    pub async fn send(&self, to: &Address, message: Message) -> Result<(), NodeError> {
        let envelope = Envelope::new(self.address().clone(), to.clone(), message);
        self.transport.send(envelope).await?;
        Ok(())
    }

    /// Wait for the next reply
    pub async fn recv(&mut self) -> Result<Message, NodeError> {
        self.recv_timeout(self.timeout).await
    }

    pub async fn recv_timeout(&mut self, timeout: Duration) -> Result<Message, NodeError> {
        match tokio::time::timeout(timeout, self.mailbox.recv()).await {
            Ok(Some(envelope)) => Ok(envelope.message),
            Ok(None) => Err(NodeError::MailboxClosed(self.address().clone())),
            Err(_) => Err(NodeError::Timeout(self.address().clone())),
        }
    }

    /// Next reply if one has already arrived
    pub fn try_recv(&mut self) -> Option<Message> {
        self.mailbox.try_recv().map(|e| e.message)
    }

    /// Ask `manager` for access and wait for the grant or denial
    pub async fn access(
        &mut self,
        manager: &Address,
        resource: &str,
        mode: AccessMode,
    ) -> Result<Message, NodeError> {
        let reply_to = self.address().clone();
        self.send(manager, Message::access_request(resource, mode, reply_to))
            .await?;
        self.recv().await
    }

    /// Release one hold; no reply is expected
    pub async fn release(
        &self,
        manager: &Address,
        resource: &str,
        kind: AccessKind,
    ) -> Result<(), NodeError> {
        let holder = self.address().clone();
        self.send(manager, Message::release(resource, kind, holder))
            .await
    }

    /// Issue a management request and wait for the outcome
    pub async fn manage(
        &mut self,
        manager: &Address,
        resource: &str,
        kind: ManagementKind,
    ) -> Result<Message, NodeError> {
        let reply_to = self.address().clone();
        self.send(
            manager,
            Message::management_request(resource, kind, reply_to),
        )
        .await?;
        self.recv().await
    }
}
