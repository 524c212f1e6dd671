// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message trace records
//!
//! Every message a manager receives or sends is handed to a [`Logger`] as a
//! [`LogRecord`]. Where the records end up is the logger's business.

#[cfg(any(test, feature = "test-support"))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeLogger;

use rm_core::{Address, Message};
use serde::Serialize;

/// Whether the manager received or sent the message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Receive,
    Send,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Receive => "receive",
            Direction::Send => "send",
        }
    }
}

/// One traced message
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub direction: Direction,
    pub sender: Address,
    pub message: Message,
    pub recipient: Address,
}

impl LogRecord {
    pub fn received(sender: &Address, message: &Message, recipient: &Address) -> Self {
        Self {
            direction: Direction::Receive,
            sender: sender.clone(),
            message: message.clone(),
            recipient: recipient.clone(),
        }
    }

    pub fn sent(sender: &Address, message: &Message, recipient: &Address) -> Self {
        Self {
            direction: Direction::Send,
            sender: sender.clone(),
            message: message.clone(),
            recipient: recipient.clone(),
        }
    }
}

/// Sink for message trace records
pub trait Logger: Clone + Send + Sync + 'static {
    fn record(&self, record: LogRecord);
}

/// Writes each record as a `tracing` event with the message as JSON
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn record(&self, record: LogRecord) {
        let body = match serde_json::to_string(&record.message) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, kind = record.message.name(), "message not serializable");
                record.message.name().to_string()
            }
        };
        tracing::info!(
            target: "rm::trace",
            direction = record.direction.as_str(),
            sender = %record.sender,
            recipient = %record.recipient,
            kind = record.message.name(),
            body = %body,
            "message"
        );
    }
}

/// Drops every record
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpLogger;

impl NoOpLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for NoOpLogger {
    fn record(&self, _record: LogRecord) {}
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
