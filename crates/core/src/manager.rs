// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-node resource manager
//!
//! Owns the local resources, their write/read lock tables and pending queues,
//! the directory of remote resources and the set of known peers. Each call to
//! [`ResourceManager::handle`] processes exactly one inbound message and
//! returns the effects to carry out.
//!
//! A local resource is always in one of three phases (see [`ResourcePhase`]):
//! `Active`, `DrainPending` while a Disable entry heads its queue, and
//! `Disabled`. The sweep ([`ResourceManager::sweep`]) is the only place
//! that moves a resource between them once a Disable has been accepted.

use crate::directory::{PeerSet, ResourceDirectory};
use crate::effect::{Effect, Event};
use crate::id::Address;
use crate::lock_table::LockTable;
use crate::message::{
    AccessDenialReason, AccessKind, AccessRelease, AccessRequest, AckKind, DirectoryUpdateKind,
    ManagementDenialReason, ManagementKind, ManagementRequest, Message,
};
use crate::pending::{PendingEntry, PendingQueues};
use crate::resource::{Resource, ResourcePhase, ResourceStatus};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug)]
pub struct ResourceManager {
    me: Address,
    resources: BTreeMap<String, Resource>,
    writers: LockTable,
    readers: LockTable,
    pending: PendingQueues,
    directory: ResourceDirectory,
    peers: PeerSet,
    users: BTreeSet<Address>,
}

impl ResourceManager {
    pub fn new(me: Address) -> Self {
        Self {
            peers: PeerSet::new(me.clone()),
            me,
            resources: BTreeMap::new(),
            writers: LockTable::new(),
            readers: LockTable::new(),
            pending: PendingQueues::new(),
            directory: ResourceDirectory::new(),
            users: BTreeSet::new(),
        }
    }

    pub fn address(&self) -> &Address {
        &self.me
    }

    /// Process one inbound message from `from`
    pub fn handle(&mut self, from: &Address, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::AccessRequest { request, reply_to } => {
                self.on_access_request(request, reply_to, &mut effects)
            }
            Message::AccessRelease { release } => self.on_access_release(release, &mut effects),
            Message::ManagementRequest { request, reply_to } => {
                self.on_management_request(request, reply_to, &mut effects)
            }
            Message::AddInitialLocalResources { resources } => {
                self.add_initial_resources(resources, &mut effects);
                effects.push(Effect::send(from, Message::Ack(AckKind::InitialLocalResources)));
            }
            Message::AddLocalUsers { users } => {
                self.users.extend(users);
                effects.push(Effect::send(from, Message::Ack(AckKind::LocalUsers)));
            }
            Message::AddRemoteManagers { managers } => {
                self.add_remote_managers(managers, &mut effects);
                effects.push(Effect::send(from, Message::Ack(AckKind::RemoteManagers)));
            }
            Message::DirectoryUpdate { kind, names } => {
                self.apply_directory_update(from, kind, names, &mut effects)
            }
            Message::ResourceListRequest => {
                let resources = self.resources.keys().cloned().collect();
                effects.push(Effect::send(
                    from,
                    Message::ResourceListResponse { resources },
                ));
            }
            Message::ResourceListResponse { resources } => {
                self.apply_directory_update(from, DirectoryUpdateKind::Add, resources, &mut effects)
            }
            other @ (Message::AccessGranted { .. }
            | Message::AccessDenied { .. }
            | Message::ManagementGranted { .. }
            | Message::ManagementDenied { .. }
            | Message::Ack(_)) => {
                effects.push(Effect::Emit(Event::MessageIgnored {
                    from: from.clone(),
                    message: other.name().to_string(),
                }));
            }
        }

        effects
    }

    /// A `Forward` effect could not be delivered to `peer`.
    ///
    /// The directory forgets everything it believed `peer` owned, and the
    /// original requester is told the resource was not found.
    pub fn forward_failed(&mut self, peer: &Address, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        let forgotten = self.directory.forget_owner(peer);
        effects.push(Effect::Emit(Event::PeerUnreachable {
            peer: peer.clone(),
            forgotten,
        }));

        match message {
            Message::AccessRequest { request, reply_to } => {
                deny_access(&reply_to, request, AccessDenialReason::NotFound, &mut effects)
            }
            Message::ManagementRequest { request, reply_to } => deny_management(
                &reply_to,
                request,
                ManagementDenialReason::NotFound,
                &mut effects,
            ),
            Message::AccessRelease { release } => {
                effects.push(Effect::Emit(Event::ReleaseIgnored {
                    resource: release.resource,
                    holder: release.holder,
                }));
            }
            _ => {}
        }

        effects
    }

    // === Access ===

    fn on_access_request(
        &mut self,
        request: AccessRequest,
        reply_to: Address,
        effects: &mut Vec<Effect>,
    ) {
        let name = request.resource.clone();

        if !self.is_local(&name) {
            match self.directory.lookup(&name) {
                Some(owner) => effects.push(Effect::Forward {
                    to: owner.clone(),
                    message: Message::AccessRequest { request, reply_to },
                }),
                None => deny_access(&reply_to, request, AccessDenialReason::NotFound, effects),
            }
            return;
        }

        // A Disable entry left with no holders resolves here rather than
        // waiting for an unrelated release
        self.sweep(&name, effects);

        let mode = request.mode;
        if !self.pending.is_empty(&name) {
            if mode.is_blocking() {
                self.enqueue_access(request, reply_to, effects);
            } else {
                deny_access(&reply_to, request, AccessDenialReason::Busy, effects);
            }
            return;
        }

        if self.status(&name) == Some(ResourceStatus::Disabled) {
            deny_access(&reply_to, request, AccessDenialReason::Disabled, effects);
            return;
        }

        if self.try_acquire(&name, mode.kind(), &reply_to) {
            grant_access(&reply_to, request, effects);
        } else if mode.is_blocking() {
            self.enqueue_access(request, reply_to, effects);
        } else {
            deny_access(&reply_to, request, AccessDenialReason::Busy, effects);
        }
    }

    /// Acquisition rule shared by fresh requests and the sweep
    fn try_acquire(&mut self, resource: &str, kind: AccessKind, who: &Address) -> bool {
        let write_free =
            !self.writers.has_holders(resource) || self.writers.is_only_holder(resource, who);

        match kind {
            AccessKind::Write => {
                let read_free = !self.readers.has_holders(resource)
                    || self.readers.is_only_holder(resource, who);
                if read_free && write_free {
                    self.writers.add_holder(resource, who);
                    return true;
                }
            }
            AccessKind::Read => {
                if write_free {
                    self.readers.add_holder(resource, who);
                    return true;
                }
            }
        }
        false
    }

    fn enqueue_access(
        &mut self,
        request: AccessRequest,
        reply_to: Address,
        effects: &mut Vec<Effect>,
    ) {
        let resource = request.resource.clone();
        let requester = reply_to.clone();
        if let Some(position) = self
            .pending
            .enqueue(&resource, PendingEntry::Access { request, reply_to })
        {
            effects.push(Effect::Emit(Event::AccessQueued {
                resource,
                requester,
                position,
            }));
        }
    }

    fn on_access_release(&mut self, release: AccessRelease, effects: &mut Vec<Effect>) {
        let name = release.resource.clone();

        if !self.is_local(&name) {
            match self.directory.lookup(&name) {
                Some(owner) => effects.push(Effect::Forward {
                    to: owner.clone(),
                    message: Message::AccessRelease { release },
                }),
                None => effects.push(Effect::Emit(Event::ReleaseIgnored {
                    resource: release.resource,
                    holder: release.holder,
                })),
            }
            return;
        }

        let table = match release.kind {
            AccessKind::Write => &mut self.writers,
            AccessKind::Read => &mut self.readers,
        };
        if table.remove_holder(&name, &release.holder) {
            effects.push(Effect::Emit(Event::AccessReleased {
                resource: release.resource,
                holder: release.holder,
                kind: release.kind,
            }));
        } else {
            effects.push(Effect::Emit(Event::ReleaseIgnored {
                resource: release.resource,
                holder: release.holder,
            }));
        }

        self.sweep(&name, effects);
    }

    // === Management ===

    fn on_management_request(
        &mut self,
        request: ManagementRequest,
        reply_to: Address,
        effects: &mut Vec<Effect>,
    ) {
        let name = request.resource.clone();
        let local = self.is_local(&name);

        match request.kind {
            ManagementKind::Add => {
                if local || self.directory.contains(&name) {
                    deny_management(&reply_to, request, ManagementDenialReason::NameClash, effects);
                    return;
                }
                self.create_local(&name, effects);
                grant_management(&reply_to, request, effects);
                self.broadcast_update(DirectoryUpdateKind::Add, name, effects);
            }
            ManagementKind::Remove => {
                if !local {
                    deny_management(&reply_to, request, ManagementDenialReason::NotLocal, effects);
                    return;
                }
                self.sweep(&name, effects);
                if self.status(&name) != Some(ResourceStatus::Disabled) {
                    deny_management(
                        &reply_to,
                        request,
                        ManagementDenialReason::NotDisabled,
                        effects,
                    );
                    return;
                }
                self.remove_local(&name, effects);
                grant_management(&reply_to, request, effects);
                self.broadcast_update(DirectoryUpdateKind::Remove, name, effects);
            }
            ManagementKind::Enable | ManagementKind::Disable if !local => {
                match self.directory.lookup(&name) {
                    Some(owner) => effects.push(Effect::Forward {
                        to: owner.clone(),
                        message: Message::ManagementRequest { request, reply_to },
                    }),
                    None => deny_management(
                        &reply_to,
                        request,
                        ManagementDenialReason::NotFound,
                        effects,
                    ),
                }
            }
            ManagementKind::Disable => self.disable(request, reply_to, effects),
            ManagementKind::Enable => self.enable(request, reply_to, effects),
        }
    }

    fn disable(&mut self, request: ManagementRequest, reply_to: Address, effects: &mut Vec<Effect>) {
        let name = request.resource.clone();

        if self.status(&name) == Some(ResourceStatus::Disabled) && self.pending.is_empty(&name) {
            grant_management(&reply_to, request, effects);
            return;
        }

        if self.writers.has_holder(&name, &reply_to) || self.readers.has_holder(&name, &reply_to) {
            deny_management(&reply_to, request, ManagementDenialReason::AccessHeld, effects);
            return;
        }

        let sentinel = PendingEntry::Management {
            request: request.clone(),
            reply_to: reply_to.clone(),
        };
        let previous = self.pending.replace(&name, vec![sentinel]);

        let mut denied = 0;
        for entry in previous {
            if matches!(entry, PendingEntry::Access { .. }) {
                denied += 1;
            }
            resolve_superseded(entry, effects);
        }

        effects.push(Effect::Emit(Event::DisableRequested { name, denied }));
        grant_management(&reply_to, request, effects);
    }

    fn enable(&mut self, request: ManagementRequest, reply_to: Address, effects: &mut Vec<Effect>) {
        let name = request.resource.clone();

        let behind_management = self
            .pending
            .peek_front(&name)
            .is_some_and(PendingEntry::is_management);

        if behind_management {
            // Granted once the sweep reaches it
            self.pending
                .enqueue(&name, PendingEntry::Management { request, reply_to });
        } else {
            if let Some(resource) = self.resources.get_mut(&name) {
                if !resource.is_enabled() {
                    resource.enable();
                    effects.push(Effect::Emit(Event::ResourceEnabled { name: name.clone() }));
                }
            }
            grant_management(&reply_to, request, effects);
        }

        self.sweep(&name, effects);
    }

    /// Re-evaluate the pending queue of `name` from the head.
    ///
    /// Grants proceed in arrival order; the first entry that still cannot be
    /// satisfied stops the sweep and stays at the head.
    pub fn sweep(&mut self, name: &str, effects: &mut Vec<Effect>) {
        while let Some(head) = self.pending.peek_front(name).cloned() {
            match head {
                PendingEntry::Access { request, reply_to } => {
                    if self.status(name) == Some(ResourceStatus::Disabled) {
                        self.pending.dequeue_front(name);
                        deny_access(&reply_to, request, AccessDenialReason::Disabled, effects);
                        continue;
                    }
                    if !self.try_acquire(name, request.mode.kind(), &reply_to) {
                        break;
                    }
                    self.pending.dequeue_front(name);
                    grant_access(&reply_to, request, effects);
                }
                PendingEntry::Management { request, reply_to } => {
                    if self.writers.has_holders(name) || self.readers.has_holders(name) {
                        break;
                    }
                    self.pending.dequeue_front(name);
                    self.resolve_management(request, reply_to, effects);
                }
            }
        }
    }

    fn resolve_management(
        &mut self,
        request: ManagementRequest,
        reply_to: Address,
        effects: &mut Vec<Effect>,
    ) {
        let Some(resource) = self.resources.get_mut(&request.resource) else {
            return;
        };

        match request.kind {
            // Its requester was granted when the Disable was accepted
            ManagementKind::Disable => {
                resource.disable();
                effects.push(Effect::Emit(Event::ResourceDisabled {
                    name: request.resource,
                }));
            }
            ManagementKind::Enable => {
                if !resource.is_enabled() {
                    resource.enable();
                    effects.push(Effect::Emit(Event::ResourceEnabled {
                        name: request.resource.clone(),
                    }));
                }
                grant_management(&reply_to, request, effects);
            }
            ManagementKind::Add | ManagementKind::Remove => {}
        }
    }

    fn create_local(&mut self, name: &str, effects: &mut Vec<Effect>) {
        self.resources.insert(name.to_string(), Resource::new(name));
        self.pending.create_for(name);
        effects.push(Effect::Emit(Event::ResourceAdded {
            name: name.to_string(),
        }));
    }

    fn remove_local(&mut self, name: &str, effects: &mut Vec<Effect>) {
        self.resources.remove(name);
        for entry in self.pending.destroy_for(name) {
            resolve_superseded(entry, effects);
        }
        self.writers.clear(name);
        self.readers.clear(name);
        effects.push(Effect::Emit(Event::ResourceRemoved {
            name: name.to_string(),
        }));
    }

    // === Provisioning and discovery ===

    fn add_initial_resources(&mut self, names: Vec<String>, effects: &mut Vec<Effect>) {
        for name in names {
            if self.is_local(&name) {
                effects.push(Effect::Emit(Event::DuplicateResourceSkipped { name }));
                continue;
            }
            if self.directory.remove(&name).is_some() {
                effects.push(Effect::Emit(Event::DirectoryUpdated {
                    name: name.clone(),
                    owner: None,
                }));
            }
            self.create_local(&name, effects);
        }
    }

    fn add_remote_managers(&mut self, managers: Vec<Address>, effects: &mut Vec<Effect>) {
        for peer in managers {
            if self.peers.register(peer.clone()) {
                effects.push(Effect::Emit(Event::PeerRegistered { peer }));
            }
        }
        for peer in self.peers.iter() {
            effects.push(Effect::send(peer, Message::ResourceListRequest));
        }
    }

    fn broadcast_update(&self, kind: DirectoryUpdateKind, name: String, effects: &mut Vec<Effect>) {
        for peer in self.peers.iter() {
            effects.push(Effect::send(
                peer,
                Message::DirectoryUpdate {
                    kind,
                    names: vec![name.clone()],
                },
            ));
        }
    }

    fn apply_directory_update(
        &mut self,
        from: &Address,
        kind: DirectoryUpdateKind,
        names: Vec<String>,
        effects: &mut Vec<Effect>,
    ) {
        for name in names {
            match kind {
                DirectoryUpdateKind::Add => {
                    // Local ownership wins; a resource is never in both places
                    if self.is_local(&name) {
                        continue;
                    }
                    if self.directory.insert(name.clone(), from.clone()).as_ref() != Some(from) {
                        effects.push(Effect::Emit(Event::DirectoryUpdated {
                            name,
                            owner: Some(from.clone()),
                        }));
                    }
                }
                DirectoryUpdateKind::Remove => {
                    if self.directory.remove(&name).is_some() {
                        effects.push(Effect::Emit(Event::DirectoryUpdated { name, owner: None }));
                    }
                }
            }
        }
    }

    // === Inspection ===

    pub fn is_local(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    pub fn status(&self, name: &str) -> Option<ResourceStatus> {
        self.resources.get(name).map(|r| r.status)
    }

    pub fn phase(&self, name: &str) -> Option<ResourcePhase> {
        let resource = self.resources.get(name)?;
        let phase = if !resource.is_enabled() {
            ResourcePhase::Disabled
        } else if self
            .pending
            .peek_front(name)
            .is_some_and(PendingEntry::is_disable)
        {
            ResourcePhase::DrainPending
        } else {
            ResourcePhase::Active
        };
        Some(phase)
    }

    /// Local resource names, sorted
    pub fn local_resources(&self) -> Vec<String> {
        self.resources.keys().cloned().collect()
    }

    pub fn owner_of(&self, name: &str) -> Option<&Address> {
        self.directory.lookup(name)
    }

    pub fn directory(&self) -> &ResourceDirectory {
        &self.directory
    }

    pub fn peers(&self) -> &PeerSet {
        &self.peers
    }

    pub fn local_users(&self) -> &BTreeSet<Address> {
        &self.users
    }

    pub fn queue_len(&self, name: &str) -> usize {
        self.pending.size(name)
    }

    pub fn pending(&self) -> &PendingQueues {
        &self.pending
    }

    pub fn write_holders(&self) -> &LockTable {
        &self.writers
    }

    pub fn read_holders(&self) -> &LockTable {
        &self.readers
    }
}

fn grant_access(to: &Address, request: AccessRequest, effects: &mut Vec<Effect>) {
    effects.push(Effect::Emit(Event::AccessGranted {
        resource: request.resource.clone(),
        holder: to.clone(),
        mode: request.mode,
    }));
    effects.push(Effect::send(to, Message::AccessGranted { request }));
}

fn deny_access(
    to: &Address,
    request: AccessRequest,
    reason: AccessDenialReason,
    effects: &mut Vec<Effect>,
) {
    effects.push(Effect::send(to, Message::AccessDenied { request, reason }));
}

fn grant_management(to: &Address, request: ManagementRequest, effects: &mut Vec<Effect>) {
    effects.push(Effect::send(to, Message::ManagementGranted { request }));
}

fn deny_management(
    to: &Address,
    request: ManagementRequest,
    reason: ManagementDenialReason,
    effects: &mut Vec<Effect>,
) {
    effects.push(Effect::send(to, Message::ManagementDenied { request, reason }));
}

/// Give a terminal answer to an entry dropped from a queue by Disable or Remove
fn resolve_superseded(entry: PendingEntry, effects: &mut Vec<Effect>) {
    match entry {
        PendingEntry::Access { request, reply_to } => {
            deny_access(&reply_to, request, AccessDenialReason::Disabled, effects)
        }
        // An Enable overtaken by a newer Disable still happened, it just
        // no longer has any effect
        PendingEntry::Management { request, reply_to } => {
            if request.kind == ManagementKind::Enable {
                grant_management(&reply_to, request, effects);
            }
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
