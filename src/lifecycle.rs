// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace-scoped create, list and delete of workload resources.
//!
//! Nothing here waits for the cluster to act on a request, and nothing is retried.

use crate::error::{HarnessError, Result};
use k8s_openapi::NamespaceResourceScope;
use kube::{
    api::{DeleteParams, ListParams, PostParams},
    Api, Client, Resource, ResourceExt,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use tracing::{debug, info, instrument};

/// Any namespaced object the harness can manage
pub trait NamespacedResource:
    Resource<Scope = NamespaceResourceScope, DynamicType = ()>
    + Clone
    + Debug
    + DeserializeOwned
    + Serialize
{
}

impl<K> NamespacedResource for K where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Clone
        + Debug
        + DeserializeOwned
        + Serialize
{
}

#[derive(Clone)]
pub struct ResourceLifecycleClient {
    client: Client,
    namespace: String,
}

impl ResourceLifecycleClient {
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            client,
            namespace: namespace.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn api<K: NamespacedResource>(&self) -> Api<K> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    /// Submit a new object and return the cluster's copy of it
    #[instrument(
        skip(self, resource),
        fields(namespace = %self.namespace, name = %resource.name_any())
    )]
    pub async fn create<K: NamespacedResource>(&self, resource: &K) -> Result<K> {
        let kind = K::kind(&());
        let name = resource.name_any();
        info!("Creating {} {}", kind, name);

        let created = self
            .api::<K>()
            .create(&PostParams::default(), resource)
            .await
            .map_err(|source| HarnessError::CreateFailed {
                kind: kind.to_string(),
                name: name.clone(),
                source,
            })?;

        info!("Created {} {}", kind, created.name_any());
        Ok(created)
    }

    pub async fn list<K: NamespacedResource>(&self) -> Result<Vec<K>> {
        Ok(self.snapshot::<K>().await?.0)
    }

    /// List objects together with the collection's resource version, so a
    /// watch can pick up exactly where the snapshot ends
    #[instrument(skip(self), fields(namespace = %self.namespace, kind = %K::kind(&())))]
    pub async fn snapshot<K: NamespacedResource>(&self) -> Result<(Vec<K>, String)> {
        let list = self
            .api::<K>()
            .list(&ListParams::default())
            .await
            .map_err(|source| HarnessError::ListFailed {
                kind: K::plural(&()).to_string(),
                source,
            })?;

        let version = list.metadata.resource_version.unwrap_or_default();
        debug!("Listed {} {} at version {:?}", list.items.len(), K::plural(&()), version);
        Ok((list.items, version))
    }

    /// Request removal. Returns once the request is accepted, not once the object is gone.
    #[instrument(skip(self), fields(namespace = %self.namespace, kind = %K::kind(&())))]
    pub async fn delete<K: NamespacedResource>(&self, name: &str) -> Result<()> {
        self.api::<K>()
            .delete(name, &DeleteParams::background())
            .await
            .map_err(|source| HarnessError::DeleteFailed {
                kind: K::kind(&()).to_string(),
                name: name.to_string(),
                source,
            })?;

        info!("Deleted {} {}", K::kind(&()), name);
        Ok(())
    }
}
