// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Predicates over change events, one per condition the harness waits on

use crate::constants::{DEFAULT_REPLICAS, FAILED_CREATE_REASON};
use crate::watch::event::{ChangeEvent, Payload};
use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet};
use k8s_openapi::api::core::v1::Event as CoreEvent;
use std::collections::BTreeSet;

/// Check if every desired replica of a deployment reports ready
pub fn is_deployment_ready(deployment: &Deployment) -> bool {
    let desired = deployment
        .spec
        .as_ref()
        .and_then(|s| s.replicas)
        .unwrap_or(DEFAULT_REPLICAS);
    let ready = deployment
        .status
        .as_ref()
        .and_then(|s| s.ready_replicas)
        .unwrap_or(0);

    ready == desired
}

/// Check if a ReplicaSet is owned by the object with `owner_uid`
pub fn is_owned_by(replica_set: &ReplicaSet, owner_uid: &str) -> bool {
    replica_set
        .metadata
        .owner_references
        .as_ref()
        .is_some_and(|refs| refs.iter().any(|r| r.uid == owner_uid))
}

/// Check if an event reports that pods could not be created for the object with `involved_uid`
pub fn is_failed_create(event: &CoreEvent, involved_uid: &str) -> bool {
    event.reason.as_deref() == Some(FAILED_CREATE_REASON)
        && event.involved_object.uid.as_deref() == Some(involved_uid)
}

/// Matches a live deployment whose ready replicas equal its desired replicas
pub fn deployment_ready() -> impl Fn(&ChangeEvent) -> bool {
    |event| match event {
        ChangeEvent::Added(Payload::Deployment(d))
        | ChangeEvent::Modified(Payload::Deployment(d)) => is_deployment_ready(d),
        _ => false,
    }
}

/// Matches the first ReplicaSet that shows up for the deployment with `owner_uid`
pub fn replica_set_created(owner_uid: String) -> impl Fn(&ChangeEvent) -> bool {
    move |event| match event {
        ChangeEvent::Added(Payload::ReplicaSet(rs))
        | ChangeEvent::Modified(Payload::ReplicaSet(rs)) => is_owned_by(rs, &owner_uid),
        _ => false,
    }
}

/// Matches a `FailedCreate` event about the object with `involved_uid`
pub fn failed_create(involved_uid: String) -> impl Fn(&ChangeEvent) -> bool {
    move |event| match event {
        ChangeEvent::Added(Payload::Event(e)) | ChangeEvent::Modified(Payload::Event(e)) => {
            is_failed_create(e, &involved_uid)
        }
        _ => false,
    }
}

/// Tracks pods still present in the namespace; matches once none are left.
///
/// Seeded from a list snapshot, then kept current from the watch that follows it.
#[derive(Debug, Default)]
pub struct PodsDrained {
    remaining: BTreeSet<String>,
}

impl PodsDrained {
    pub fn new(pods: impl IntoIterator<Item = String>) -> Self {
        Self {
            remaining: pods.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn observe(&mut self, event: &ChangeEvent) -> bool {
        match event {
            ChangeEvent::Added(pod @ Payload::Pod(_))
            | ChangeEvent::Modified(pod @ Payload::Pod(_)) => {
                self.remaining.insert(pod.name());
            }
            ChangeEvent::Deleted(pod @ Payload::Pod(_)) => {
                self.remaining.remove(&pod.name());
            }
            _ => {}
        }
        self.remaining.is_empty()
    }
}
