// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rm-node: runs resource managers over a transport
//!
//! - [`NodeRuntime`] drives one `ResourceManager`, one envelope at a time
//! - [`LocalCluster`] boots every configured node in-process and wires peers
//! - [`Client`] is a user endpoint for issuing requests and awaiting replies

pub mod client;
pub mod cluster;
pub mod config;
pub mod error;
pub mod runtime;

pub use client::Client;
pub use cluster::{ClusterTransport, LocalCluster, BOOTSTRAP_ADDRESS};
pub use config::{ClusterConfig, ConfigError, LogConfig, NodeConfig};
pub use error::NodeError;
pub use runtime::NodeRuntime;
