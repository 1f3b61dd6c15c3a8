// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The waits tests need: readiness, failure detection and deletion confirmation

use crate::error::{HarnessError, Result};
use crate::lifecycle::ResourceLifecycleClient;
use crate::watch::conditions::{self, PodsDrained};
use crate::watch::{
    ConditionWatcher, Payload, ResourceKind, Selector, WatchScope, FROM_CURRENT_STATE,
};
use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet};
use k8s_openapi::api::core::v1::{Event as CoreEvent, Pod};
use kube::ResourceExt;
use tracing::{info, instrument};

/// Wait until every desired replica of `deployment` is ready
#[instrument(skip(watcher, deployment), fields(deployment = %deployment.name_any()))]
pub async fn wait_for_deployment_ready(
    watcher: &ConditionWatcher,
    deployment: &Deployment,
) -> Result<Deployment> {
    let name = deployment.name_any();
    info!("Waiting for deployment {} to be ready", name);

    let scope = WatchScope::new(ResourceKind::Deployment, Selector::Name(name.clone()));
    let payload = watcher
        .await_condition(scope, FROM_CURRENT_STATE, conditions::deployment_ready())
        .await
        .into_result(&format!("deployment {} to be ready", name))?;

    match payload {
        Payload::Deployment(ready) => {
            info!("Deployment {} is ready", name);
            Ok(ready)
        }
        other => Err(unexpected_payload("deployment", &other)),
    }
}

/// Wait for the ReplicaSet the deployment controller generates for `deployment`.
///
/// `deployment` must be the object returned by the cluster, since the
/// ReplicaSet is correlated through its owner reference uid.
#[instrument(skip(watcher, deployment), fields(deployment = %deployment.name_any()))]
pub async fn wait_for_replica_set(
    watcher: &ConditionWatcher,
    deployment: &Deployment,
) -> Result<ReplicaSet> {
    let name = deployment.name_any();
    let uid = deployment.uid().ok_or_else(|| {
        HarnessError::ConditionNotMet(format!(
            "deployment {} has no uid; use the object returned on creation",
            name
        ))
    })?;

    let selector = match deployment
        .spec
        .as_ref()
        .and_then(|s| s.selector.match_labels.clone())
    {
        Some(labels) if !labels.is_empty() => Selector::Labels(labels),
        _ => Selector::All,
    };

    let scope = WatchScope::new(ResourceKind::ReplicaSet, selector);
    let payload = watcher
        .await_condition(scope, FROM_CURRENT_STATE, conditions::replica_set_created(uid))
        .await
        .into_result(&format!("replicaset of deployment {} to be created", name))?;

    match payload {
        Payload::ReplicaSet(rs) => {
            info!("Replicaset {} created", rs.name_any());
            Ok(rs)
        }
        other => Err(unexpected_payload("replicaset", &other)),
    }
}

/// Wait for a `FailedCreate` event about `replica_set`
#[instrument(skip(watcher, replica_set), fields(replicaset = %replica_set.name_any()))]
pub async fn wait_for_failed_create(
    watcher: &ConditionWatcher,
    replica_set: &ReplicaSet,
) -> Result<CoreEvent> {
    let name = replica_set.name_any();
    let uid = replica_set.uid().ok_or_else(|| {
        HarnessError::ConditionNotMet(format!("replicaset {} has no uid", name))
    })?;

    let scope = WatchScope::new(ResourceKind::Event, Selector::InvolvedObject(uid.clone()));
    let payload = watcher
        .await_condition(scope, FROM_CURRENT_STATE, conditions::failed_create(uid))
        .await
        .into_result(&format!("replicaset {} to fail creating pods", name))?;

    match payload {
        Payload::Event(event) => Ok(event),
        other => Err(unexpected_payload("event", &other)),
    }
}

/// Wait until `deployment` is known to be unable to start its pods.
///
/// First waits for its ReplicaSet, then for that ReplicaSet's `FailedCreate` event.
#[instrument(skip(watcher, deployment), fields(deployment = %deployment.name_any()))]
pub async fn wait_for_deployment_failure(
    watcher: &ConditionWatcher,
    deployment: &Deployment,
) -> Result<CoreEvent> {
    info!("Waiting for deployment {} to fail", deployment.name_any());

    let replica_set = wait_for_replica_set(watcher, deployment).await?;
    let event = wait_for_failed_create(watcher, &replica_set).await?;

    info!(
        "Deployment {} failed: {}",
        deployment.name_any(),
        event.message.as_deref().unwrap_or_default()
    );
    Ok(event)
}

/// Wait until the namespace holds no pods at all
#[instrument(skip(watcher, lifecycle), fields(namespace = %lifecycle.namespace()))]
pub async fn wait_for_pods_drained(
    watcher: &ConditionWatcher,
    lifecycle: &ResourceLifecycleClient,
) -> Result<()> {
    let (pods, version) = lifecycle.snapshot::<Pod>().await?;
    if pods.is_empty() {
        info!("All pods are deleted");
        return Ok(());
    }

    info!("Waiting for {} pods to be deleted", pods.len());
    let mut drained = PodsDrained::new(pods.iter().map(|p| p.name_any()));

    watcher
        .await_condition(
            WatchScope::new(ResourceKind::Pod, Selector::All),
            &version,
            |event| drained.observe(event),
        )
        .await
        .into_result(&format!(
            "pods in namespace {} to be deleted",
            lifecycle.namespace()
        ))?;

    info!("All pods are deleted");
    Ok(())
}

fn unexpected_payload(expected: &str, payload: &Payload) -> HarnessError {
    HarnessError::ConditionNotMet(format!(
        "expected a {} but the watch matched {} {}",
        expected,
        payload.kind(),
        payload.name()
    ))
}
