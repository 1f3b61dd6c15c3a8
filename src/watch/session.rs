// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Watch sessions: one filtered event subscription with exactly one consumer

use crate::lifecycle::NamespacedResource;
use crate::watch::event::{ChangeEvent, Payload, ResourceKind};
use futures::stream::BoxStream;
use futures::StreamExt;
use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet};
use k8s_openapi::api::core::v1::{Event as CoreEvent, Pod};
use kube::api::{WatchEvent, WatchParams};
use kube::{Api, Client};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, instrument};

/// Resource version that starts a watch from the current state of the collection
pub const FROM_CURRENT_STATE: &str = "0";

pub type ChangeStream = BoxStream<'static, kube::Result<ChangeEvent>>;

/// Which objects of a collection a session reports on
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    All,
    /// A single object, by `metadata.name`
    Name(String),
    /// Objects carrying all of these labels
    Labels(BTreeMap<String, String>),
    /// Events about the object with this uid
    InvolvedObject(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchScope {
    pub kind: ResourceKind,
    pub selector: Selector,
}

impl WatchScope {
    pub fn new(kind: ResourceKind, selector: Selector) -> Self {
        Self { kind, selector }
    }

    pub fn watch_params(&self) -> WatchParams {
        let params = WatchParams::default();
        match &self.selector {
            Selector::All => params,
            Selector::Name(name) => params.fields(&format!("metadata.name={}", name)),
            Selector::Labels(labels) => params.labels(&label_selector(labels)),
            Selector::InvolvedObject(uid) => params.fields(&format!("involvedObject.uid={}", uid)),
        }
    }
}

impl fmt::Display for WatchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selector {
            Selector::All => write!(f, "{}", self.kind),
            Selector::Name(name) => write!(f, "{} named {}", self.kind, name),
            Selector::Labels(labels) => {
                write!(f, "{} labelled {}", self.kind, label_selector(labels))
            }
            Selector::InvolvedObject(uid) => write!(f, "{} about {}", self.kind, uid),
        }
    }
}

fn label_selector(labels: &BTreeMap<String, String>) -> String {
    labels
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}

/// An open subscription. Dropping or closing it releases the server-side watch.
pub struct WatchSession {
    scope: WatchScope,
    stream: ChangeStream,
}

impl WatchSession {
    /// Open a session against the cluster, starting after `resource_version`
    #[instrument(skip(client), fields(scope = %scope))]
    pub async fn open(
        client: &Client,
        namespace: &str,
        scope: WatchScope,
        resource_version: &str,
    ) -> kube::Result<Self> {
        let params = scope.watch_params();
        let stream = match scope.kind {
            ResourceKind::Deployment => {
                watch_typed::<Deployment>(client, namespace, &params, resource_version).await?
            }
            ResourceKind::ReplicaSet => {
                watch_typed::<ReplicaSet>(client, namespace, &params, resource_version).await?
            }
            ResourceKind::Pod => {
                watch_typed::<Pod>(client, namespace, &params, resource_version).await?
            }
            ResourceKind::Event => {
                watch_typed::<CoreEvent>(client, namespace, &params, resource_version).await?
            }
        };

        debug!("Opened watch session for {}", scope);
        Ok(Self::from_stream(scope, stream))
    }

    /// Wrap an already-open stream of change events
    pub fn from_stream(scope: WatchScope, stream: ChangeStream) -> Self {
        Self { scope, stream }
    }

    pub fn scope(&self) -> &WatchScope {
        &self.scope
    }

    /// The next event, or `None` once the underlying channel has closed
    pub async fn next(&mut self) -> Option<kube::Result<ChangeEvent>> {
        self.stream.next().await
    }

    pub fn close(self) {
        debug!("Closing watch session for {}", self.scope);
    }
}

async fn watch_typed<K>(
    client: &Client,
    namespace: &str,
    params: &WatchParams,
    resource_version: &str,
) -> kube::Result<ChangeStream>
where
    K: NamespacedResource + Into<Payload> + Send + 'static,
{
    let api: Api<K> = Api::namespaced(client.clone(), namespace);
    let stream = api.watch(params, resource_version).await?;

    Ok(stream
        .filter_map(|event| async move { into_change_event(event) })
        .boxed())
}

/// Bookmarks only advance the resource version and are not surfaced
fn into_change_event<K: Into<Payload>>(
    event: kube::Result<WatchEvent<K>>,
) -> Option<kube::Result<ChangeEvent>> {
    match event {
        Ok(WatchEvent::Added(obj)) => Some(Ok(ChangeEvent::Added(obj.into()))),
        Ok(WatchEvent::Modified(obj)) => Some(Ok(ChangeEvent::Modified(obj.into()))),
        Ok(WatchEvent::Deleted(obj)) => Some(Ok(ChangeEvent::Deleted(obj.into()))),
        Ok(WatchEvent::Bookmark(_)) => None,
        Ok(WatchEvent::Error(err)) => Some(Ok(ChangeEvent::Error {
            code: err.code,
            reason: err.reason,
            message: err.message,
        })),
        Err(e) => Some(Err(e)),
    }
}
