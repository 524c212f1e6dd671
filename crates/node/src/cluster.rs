// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process cluster bootstrap
//!
//! Every configured node gets its own manager task on a shared
//! [`ChannelTransport`]. Bootstrap hands each manager its resources and users,
//! then introduces the managers to each other and waits for discovery to
//! settle.

use crate::client::Client;
use crate::config::ClusterConfig;
use crate::error::NodeError;
use crate::runtime::NodeRuntime;
use rm_adapters::{ChannelTransport, Logger, Mailbox, TracedTransport, Transport};
use rm_core::{AckKind, Address, Envelope, IdGen, Message, ResourceManager};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Address the bootstrapper sends from and receives acks on
pub const BOOTSTRAP_ADDRESS: &str = "rmd.bootstrap";

const BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport shared by every node and client in a local cluster
pub type ClusterTransport = TracedTransport<ChannelTransport>;

/// A running set of resource managers in this process
pub struct LocalCluster {
    channels: ChannelTransport,
    transport: ClusterTransport,
    bootstrap: Mailbox,
    nodes: Vec<(Address, JoinHandle<ResourceManager>)>,
}

impl LocalCluster {
    /// Start every node from `config` and wait until discovery has settled
    pub async fn start<L: Logger>(config: &ClusterConfig, logger: L) -> Result<Self, NodeError> {
        Self::start_on(ChannelTransport::new(), config, logger).await
    }

    /// Start on an existing transport.
    ///
    /// On failure every mailbox opened here is closed again, so node tasks
    /// that were already spawned drain and exit.
    pub(crate) async fn start_on<L: Logger>(
        channels: ChannelTransport,
        config: &ClusterConfig,
        logger: L,
    ) -> Result<Self, NodeError> {
        config.validate()?;

        let transport = TracedTransport::new(channels.clone());
        let bootstrap = channels.register(Address::new(BOOTSTRAP_ADDRESS))?;
        let mut cluster = Self {
            channels,
            transport,
            bootstrap,
            nodes: Vec::with_capacity(config.nodes.len()),
        };

        if let Err(e) = cluster.boot(config, logger).await {
            tracing::error!(error = %e, "cluster bootstrap failed");
            cluster.abandon();
            return Err(e);
        }
        tracing::info!(nodes = cluster.nodes.len(), "cluster ready");
        Ok(cluster)
    }

    async fn boot<L: Logger>(&mut self, config: &ClusterConfig, logger: L) -> Result<(), NodeError> {
        for node in &config.nodes {
            let address = Address::new(node.name.as_str());
            let mailbox = self.channels.register(address.clone())?;
            let runtime = NodeRuntime::new(
                ResourceManager::new(address.clone()),
                self.transport.clone(),
                logger.clone(),
            );
            self.nodes.push((address, tokio::spawn(runtime.run(mailbox))));
        }

        for node in &config.nodes {
            let address = Address::new(node.name.as_str());
            self.provision(
                &address,
                Message::AddInitialLocalResources {
                    resources: node.resources.clone(),
                },
                AckKind::InitialLocalResources,
            )
            .await?;
            self.provision(
                &address,
                Message::AddLocalUsers {
                    users: node.users.iter().map(|u| Address::new(u.as_str())).collect(),
                },
                AckKind::LocalUsers,
            )
            .await?;
        }

        let all = self.addresses();
        for address in &all {
            let managers = all.iter().filter(|a| *a != address).cloned().collect();
            self.provision(
                address,
                Message::AddRemoteManagers { managers },
                AckKind::RemoteManagers,
            )
            .await?;
        }

        self.settle().await
    }

    /// Close the bootstrap mailbox and every node mailbox
    fn abandon(&self) {
        for (address, _) in &self.nodes {
            self.channels.deregister(address);
        }
        self.channels.deregister(self.bootstrap.address());
    }

    /// Node addresses in configuration order
    pub fn addresses(&self) -> Vec<Address> {
        self.nodes.iter().map(|(a, _)| a.clone()).collect()
    }

    pub fn transport(&self) -> &ClusterTransport {
        &self.transport
    }

    /// Open a user endpoint named `name`.
    ///
    /// Users and managers share one address space, so a name already held by
    /// a node, the bootstrapper or another live client is refused.
    pub fn client(&self, name: &str) -> Result<Client<ClusterTransport>, NodeError> {
        let mailbox = self.channels.register(Address::new(name))?;
        Ok(Client::new(mailbox, self.transport.clone()))
    }

    /// Open a user endpoint under a freshly generated address
    pub fn anonymous_client(&self, ids: &impl IdGen) -> Result<Client<ClusterTransport>, NodeError> {
        let mailbox = self.channels.register(ids.next_address())?;
        Ok(Client::new(mailbox, self.transport.clone()))
    }

    /// Wait until every message already sent between nodes has been handled.
    ///
    /// Each round trips a `ResourceListRequest` through every node. Mailboxes
    /// are FIFO, so after the first round every reply a node owed a peer is
    /// queued at that peer, and after the second round it has been handled.
    pub async fn settle(&mut self) -> Result<(), NodeError> {
        for _ in 0..2 {
            for address in self.addresses() {
                self.round_trip(&address).await?;
            }
        }
        Ok(())
    }

    /// Close every node mailbox and collect the final manager states
    pub async fn shutdown(self) -> Result<Vec<ResourceManager>, NodeError> {
        for (address, _) in &self.nodes {
            self.channels.deregister(address);
        }
        let mut managers = Vec::with_capacity(self.nodes.len());
        for (address, handle) in self.nodes {
            let manager = handle.await?;
            tracing::debug!(node = %address, "node joined");
            managers.push(manager);
        }
        tracing::info!("cluster stopped");
        Ok(managers)
    }

    async fn provision(
        &mut self,
        node: &Address,
        message: Message,
        kind: AckKind,
    ) -> Result<(), NodeError> {
        self.send(node, message).await?;
        match self.next_reply(node).await? {
            Message::Ack(got) if got == kind => Ok(()),
            other => {
                tracing::error!(node = %node, reply = other.name(), "unexpected bootstrap reply");
                Err(NodeError::MissingAck {
                    node: node.clone(),
                    kind,
                })
            }
        }
    }

    async fn round_trip(&mut self, node: &Address) -> Result<(), NodeError> {
        self.send(node, Message::ResourceListRequest).await?;
        match self.next_reply(node).await? {
            Message::ResourceListResponse { .. } => Ok(()),
            other => Err(NodeError::UnexpectedReply {
                node: node.clone(),
                reply: other.name(),
            }),
        }
    }

    async fn send(&self, node: &Address, message: Message) -> Result<(), NodeError> {
        let envelope = Envelope::new(self.bootstrap.address().clone(), node.clone(), message);
        self.transport.send(envelope).await?;
        Ok(())
    }

    async fn next_reply(&mut self, node: &Address) -> Result<Message, NodeError> {
        let address = self.bootstrap.address().clone();
        match tokio::time::timeout(BOOTSTRAP_TIMEOUT, self.bootstrap.recv()).await {
            Ok(Some(envelope)) if &envelope.from == node => Ok(envelope.message),
            Ok(Some(envelope)) => Err(NodeError::UnexpectedReply {
                node: envelope.from,
                reply: envelope.message.name(),
            }),
            Ok(None) => Err(NodeError::MailboxClosed(address)),
            Err(_) => Err(NodeError::Timeout(address)),
        }
    }
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;
