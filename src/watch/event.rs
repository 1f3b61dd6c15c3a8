// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Change notifications delivered by a watch session

use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet};
use k8s_openapi::api::core::v1::{Event as CoreEvent, Pod};
use kube::ResourceExt;

/// The object carried by a change notification
#[derive(Clone, Debug)]
pub enum Payload {
    Deployment(Deployment),
    ReplicaSet(ReplicaSet),
    Pod(Pod),
    Event(CoreEvent),
}

impl Payload {
    pub fn name(&self) -> String {
        match self {
            Payload::Deployment(d) => d.name_any(),
            Payload::ReplicaSet(rs) => rs.name_any(),
            Payload::Pod(p) => p.name_any(),
            Payload::Event(e) => e.name_any(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Payload::Deployment(_) => ResourceKind::Deployment,
            Payload::ReplicaSet(_) => ResourceKind::ReplicaSet,
            Payload::Pod(_) => ResourceKind::Pod,
            Payload::Event(_) => ResourceKind::Event,
        }
    }
}

impl From<Deployment> for Payload {
    fn from(d: Deployment) -> Self {
        Payload::Deployment(d)
    }
}

impl From<ReplicaSet> for Payload {
    fn from(rs: ReplicaSet) -> Self {
        Payload::ReplicaSet(rs)
    }
}

impl From<Pod> for Payload {
    fn from(p: Pod) -> Self {
        Payload::Pod(p)
    }
}

impl From<CoreEvent> for Payload {
    fn from(e: CoreEvent) -> Self {
        Payload::Event(e)
    }
}

/// The resource kinds a watch session can be opened for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Deployment,
    ReplicaSet,
    Pod,
    Event,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            ResourceKind::Deployment => "deployments",
            ResourceKind::ReplicaSet => "replicasets",
            ResourceKind::Pod => "pods",
            ResourceKind::Event => "events",
        };
        f.write_str(kind)
    }
}

/// One notification from a watch session
#[derive(Clone, Debug)]
pub enum ChangeEvent {
    Added(Payload),
    Modified(Payload),
    Deleted(Payload),
    /// The server reported a problem in-band, e.g. an expired resource version
    Error {
        code: u16,
        reason: String,
        message: String,
    },
}

impl ChangeEvent {
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            ChangeEvent::Added(p) | ChangeEvent::Modified(p) | ChangeEvent::Deleted(p) => Some(p),
            ChangeEvent::Error { .. } => None,
        }
    }

    pub fn into_payload(self) -> Option<Payload> {
        match self {
            ChangeEvent::Added(p) | ChangeEvent::Modified(p) | ChangeEvent::Deleted(p) => Some(p),
            ChangeEvent::Error { .. } => None,
        }
    }
}
