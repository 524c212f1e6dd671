// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives one resource manager over a transport

use rm_adapters::{LogRecord, Logger, Mailbox, Transport, TransportError};
use rm_core::{Address, Effect, Envelope, Event, Message, ResourceManager};
use std::collections::VecDeque;
use tracing::Instrument;

/// Owns a manager and carries out the effects it returns.
///
/// Envelopes are processed one at a time; every effect of one envelope is
/// executed before the next envelope is looked at.
pub struct NodeRuntime<T, L> {
    manager: ResourceManager,
    transport: T,
    logger: L,
}

impl<T: Transport, L: Logger> NodeRuntime<T, L> {
    pub fn new(manager: ResourceManager, transport: T, logger: L) -> Self {
        Self {
            manager,
            transport,
            logger,
        }
    }

    pub fn address(&self) -> &Address {
        self.manager.address()
    }

    pub fn manager(&self) -> &ResourceManager {
        &self.manager
    }

    /// Process envelopes until the mailbox closes, then hand back the manager
    pub async fn run(mut self, mut mailbox: Mailbox) -> ResourceManager {
        tracing::info!(node = %self.address(), "manager started");
        while let Some(envelope) = mailbox.recv().await {
            self.process(envelope).await;
        }
        tracing::info!(node = %self.address(), "manager stopped");
        self.manager
    }

    /// Handle one inbound envelope and execute its effects
    pub async fn process(&mut self, envelope: Envelope) {
        let span = tracing::info_span!(
            "manager.handle",
            node = %envelope.to,
            from = %envelope.from,
            kind = envelope.message.name(),
        );

        async move {
            self.logger.record(LogRecord::received(
                &envelope.from,
                &envelope.message,
                &envelope.to,
            ));
            let effects = self.manager.handle(&envelope.from, envelope.message);
            self.execute_all(effects).await;
        }
        .instrument(span)
        .await
    }

    /// Execute effects in order.
    ///
    /// Follow-up effects from a failed forward run before the remaining ones.
    async fn execute_all(&mut self, effects: Vec<Effect>) {
        let mut pending: VecDeque<Effect> = effects.into();

        while let Some(effect) = pending.pop_front() {
            match effect {
                Effect::Send { to, message } => {
                    tracing::debug!(to = %to, kind = message.name(), "send");
                    if let Err(e) = self.deliver(to, message).await {
                        // Replies to departed users are dropped
                        tracing::warn!(error = %e, "send failed");
                    }
                }
                Effect::Forward { to, message } => {
                    tracing::debug!(to = %to, kind = message.name(), "forward");
                    if let Err(e) = self.deliver(to.clone(), message.clone()).await {
                        tracing::warn!(peer = %to, error = %e, "forward failed");
                        let follow_ups = self.manager.forward_failed(&to, message);
                        for effect in follow_ups.into_iter().rev() {
                            pending.push_front(effect);
                        }
                    }
                }
                Effect::Emit(event) => emit(&event),
            }
        }
    }

    async fn deliver(&self, to: Address, message: Message) -> Result<(), TransportError> {
        let from = self.manager.address().clone();
        self.logger.record(LogRecord::sent(&from, &message, &to));
        self.transport.send(Envelope::new(from, to, message)).await
    }
}

fn emit(event: &Event) {
    match event {
        Event::MessageIgnored { .. } | Event::ReleaseIgnored { .. } => {
            tracing::warn!(event = event.name(), details = ?event, "event")
        }
        Event::AccessQueued { .. } | Event::DirectoryUpdated { .. } => {
            tracing::debug!(event = event.name(), details = ?event, "event")
        }
        _ => tracing::info!(event = event.name(), details = ?event, "event"),
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
