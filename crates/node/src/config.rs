// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cluster configuration loaded from TOML

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading or validating a cluster file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid cluster file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cluster file declares no nodes")]
    NoNodes,
    #[error("node name must not be empty")]
    EmptyNodeName,
    #[error("node {0} is declared more than once")]
    DuplicateNode(String),
    #[error("resource {resource} is listed on both {first} and {second}")]
    DuplicateResource {
        resource: String,
        first: String,
        second: String,
    },
}

/// Logging settings for the daemon
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// EnvFilter directive; `RUST_LOG` takes precedence
    pub level: Option<String>,
    /// Write logs to this file instead of stderr
    pub file: Option<PathBuf>,
}

/// One resource manager and what it starts with
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    pub name: String,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub users: Vec<String>,
}

/// Whole-cluster configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(rename = "node", default)]
    pub nodes: Vec<NodeConfig>,
}

impl ClusterConfig {
    /// Read, parse and validate a cluster file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate a cluster file's contents
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ClusterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nodes.is_empty() {
            return Err(ConfigError::NoNodes);
        }

        let mut owners: HashMap<&str, &str> = HashMap::new();
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if node.name.trim().is_empty() {
                return Err(ConfigError::EmptyNodeName);
            }
            if !seen.insert(node.name.as_str()) {
                return Err(ConfigError::DuplicateNode(node.name.clone()));
            }
            for resource in &node.resources {
                // Repeats within one node are skipped at startup, not an error
                if let Some(first) = owners.insert(resource.as_str(), node.name.as_str()) {
                    if first != node.name {
                        return Err(ConfigError::DuplicateResource {
                            resource: resource.clone(),
                            first: first.to_string(),
                            second: node.name.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Every node name, in file order
    pub fn node_names(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.name.clone()).collect()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
