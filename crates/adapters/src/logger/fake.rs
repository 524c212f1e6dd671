// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake logger for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Direction, LogRecord, Logger};
use std::sync::{Arc, Mutex};

/// Keeps every record in memory
#[derive(Clone, Default)]
pub struct FakeLogger {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl FakeLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, in order
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Records in one direction, in order
    pub fn in_direction(&self, direction: Direction) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.direction == direction)
            .collect()
    }
}

impl Logger for FakeLogger {
    fn record(&self, record: LogRecord) {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record);
    }
}
