//! Shared helpers for behavioral specs

#![allow(dead_code)]

use std::time::Duration;

pub use rm_adapters::NoOpLogger;
pub use rm_core::{
    AccessDenialReason, AccessKind, AccessMode, Address, ManagementDenialReason, ManagementKind,
    Message,
};
pub use rm_node::{Client, ClusterConfig, ClusterTransport, LocalCluster};

/// How long to wait before concluding a queued request got no reply
pub const QUIET: Duration = Duration::from_millis(100);

pub type User = Client<ClusterTransport>;

/// Boot a cluster from `(node, resources)` pairs
pub async fn cluster(nodes: &[(&str, &[&str])]) -> LocalCluster {
    let mut toml = String::new();
    for (name, resources) in nodes {
        let list: Vec<String> = resources.iter().map(|r| format!("{r:?}")).collect();
        toml.push_str(&format!(
            "[[node]]\nname = {name:?}\nresources = [{}]\n\n",
            list.join(", ")
        ));
    }
    let config = ClusterConfig::parse(&toml).unwrap();
    LocalCluster::start(&config, NoOpLogger::new()).await.unwrap()
}

/// A single node `m0` owning `resources`
pub async fn single_node(resources: &[&str]) -> LocalCluster {
    cluster(&[("m0", resources)]).await
}

pub fn addr(s: &str) -> Address {
    Address::new(s)
}

pub fn is_granted(reply: &Message) -> bool {
    matches!(reply, Message::AccessGranted { .. })
}

pub fn access_denial(reply: &Message) -> Option<AccessDenialReason> {
    match reply {
        Message::AccessDenied { reason, .. } => Some(*reason),
        _ => None,
    }
}

pub fn management_denial(reply: &Message) -> Option<ManagementDenialReason> {
    match reply {
        Message::ManagementDenied { reason, .. } => Some(*reason),
        _ => None,
    }
}

pub fn is_management_granted(reply: &Message) -> bool {
    matches!(reply, Message::ManagementGranted { .. })
}

/// Send an access request without waiting for the reply
pub async fn request(user: &User, manager: &str, resource: &str, mode: AccessMode) {
    let reply_to = user.address().clone();
    user.send(&addr(manager), Message::access_request(resource, mode, reply_to))
        .await
        .unwrap();
}

/// Send a management request without waiting for the reply
pub async fn request_management(user: &User, manager: &str, resource: &str, kind: ManagementKind) {
    let reply_to = user.address().clone();
    user.send(
        &addr(manager),
        Message::management_request(resource, kind, reply_to),
    )
    .await
    .unwrap();
}

/// Assert `user` has received nothing after a quiet period
pub async fn assert_waiting(user: &mut User) {
    tokio::time::sleep(QUIET).await;
    if let Some(reply) = user.try_recv() {
        panic!("{} should still be waiting, got {reply:?}", user.address());
    }
}
