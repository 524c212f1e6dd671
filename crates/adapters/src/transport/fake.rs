// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake transport for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Transport, TransportError};
use async_trait::async_trait;
use rm_core::{Address, Envelope};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Records every envelope instead of delivering it
#[derive(Clone, Default)]
pub struct FakeTransport {
    sent: Arc<Mutex<Vec<Envelope>>>,
    unreachable: Arc<Mutex<HashSet<Address>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sends to `address` fail with `UnknownAddress`
    pub fn set_unreachable(&self, address: Address) {
        self.unreachable
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(address);
    }

    /// Envelopes successfully sent, in order
    pub fn sent(&self) -> Vec<Envelope> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Envelopes sent to `address`, in order
    pub fn sent_to(&self, address: &Address) -> Vec<Envelope> {
        self.sent()
            .into_iter()
            .filter(|e| &e.to == address)
            .collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, envelope: Envelope) -> Result<(), TransportError> {
        if self
            .unreachable
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&envelope.to)
        {
            return Err(TransportError::UnknownAddress(envelope.to));
        }
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(envelope);
        Ok(())
    }
}
