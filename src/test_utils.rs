// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

type Key = (String, String, bool);

#[derive(Clone)]
enum Reply {
    Respond(u16, String),
    /// Never answer, like a watch on which nothing ever happens
    Stall,
}

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// Several responses registered for the same request are served in order; the
/// last one keeps being served once the others are used up. Every request is
/// recorded so tests can assert on what was sent to the cluster.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<Key, VecDeque<Reply>>>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn on(self, method: &str, path: &str, watch: bool, reply: Reply) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string(), watch))
            .or_default()
            .push_back(reply);
        self
    }

    /// Add a response for GET requests matching the path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, false, Reply::Respond(status, body.to_string()))
    }

    /// Add a response for POST requests matching the path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, false, Reply::Respond(status, body.to_string()))
    }

    /// Add a response for DELETE requests matching the path
    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, false, Reply::Respond(status, body.to_string()))
    }

    /// Add a watch stream for `?watch=true` requests; it ends after the last event
    pub fn on_watch(self, path: &str, events: &[String]) -> Self {
        let body = events.iter().map(|e| format!("{}\n", e)).collect();
        self.on("GET", path, true, Reply::Respond(200, body))
    }

    /// Add a watch for `?watch=true` requests that stays open without ever sending an event
    pub fn on_stalled_watch(self, path: &str) -> Self {
        self.on("GET", path, true, Reply::Stall)
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "https://kubernetes.default.svc")
    }

    /// All requests seen so far, as (method, path)
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests that could have changed cluster state
    pub fn mutating_requests(&self) -> usize {
        self.requests()
            .iter()
            .filter(|(method, _)| method != "GET")
            .count()
    }

    fn find_response(&self, method: &str, path: &str, watch: bool) -> Option<Reply> {
        let mut responses = self.responses.lock().unwrap();

        // Exact match first, then the longest registered prefix
        let key = responses
            .keys()
            .filter(|(m, p, w)| m == method && *w == watch && path.starts_with(p.as_str()))
            .max_by_key(|(_, p, _)| (p == path, p.len()))
            .cloned()?;

        let queue = responses.get_mut(&key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let watch = req
            .uri()
            .query()
            .is_some_and(|q| q.split('&').any(|kv| kv == "watch=true"));

        self.requests
            .lock()
            .unwrap()
            .push((method.clone(), path.clone()));
        let response = self.find_response(&method, &path, watch);

        Box::pin(async move {
            match response {
                Some(Reply::Stall) => std::future::pending().await,
                Some(Reply::Respond(status, body)) => Ok(Response::builder()
                    .status(status)
                    .header("content-type", "application/json")
                    .body(Body::from(body.into_bytes()))
                    .unwrap()),
                None => {
                    // Default 404 for unmatched requests
                    let body = r#"{"kind":"Status","apiVersion":"v1","status":"Failure","message":"not found","reason":"NotFound","code":404}"#;
                    Ok(Response::builder()
                        .status(404)
                        .header("content-type", "application/json")
                        .body(Body::from(body.as_bytes().to_vec()))
                        .unwrap())
                }
            }
        })
    }
}

pub const NAMESPACE: &str = "test-cases";

pub fn secrets_path() -> String {
    format!("/api/v1/namespaces/{}/secrets", NAMESPACE)
}

pub fn pods_path() -> String {
    format!("/api/v1/namespaces/{}/pods", NAMESPACE)
}

pub fn events_path() -> String {
    format!("/api/v1/namespaces/{}/events", NAMESPACE)
}

pub fn deployments_path() -> String {
    format!("/apis/apps/v1/namespaces/{}/deployments", NAMESPACE)
}

pub fn replica_sets_path() -> String {
    format!("/apis/apps/v1/namespaces/{}/replicasets", NAMESPACE)
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

/// Create a failure `Status` body
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a list response for `kind` (e.g. "Secret") holding `items`
pub fn list_json(api_version: &str, kind: &str, items: &[serde_json::Value]) -> String {
    serde_json::json!({
        "apiVersion": api_version,
        "kind": format!("{}List", kind),
        "metadata": { "resourceVersion": "100" },
        "items": items
    })
    .to_string()
}

/// Create one line of a watch stream
pub fn watch_event_json(event_type: &str, object: &serde_json::Value) -> String {
    serde_json::json!({ "type": event_type, "object": object }).to_string()
}

pub fn secret_value(name: &str) -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": { "name": name, "namespace": NAMESPACE, "uid": format!("{}-uid", name) },
        "type": "Opaque"
    })
}

pub fn pod_value(name: &str) -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": { "name": name, "namespace": NAMESPACE, "uid": format!("{}-uid", name) }
    })
}

pub fn deployment_value(name: &str, ready_replicas: Option<i32>) -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": { "name": name, "namespace": NAMESPACE, "uid": format!("{}-uid", name) },
        "spec": {
            "replicas": 1,
            "selector": { "matchLabels": { "app": name } },
            "template": {
                "metadata": { "labels": { "app": name } },
                "spec": { "containers": [{ "name": name, "image": "busybox" }] }
            }
        },
        "status": { "readyReplicas": ready_replicas }
    })
}

pub fn replica_set_value(name: &str, owner_uid: &str) -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "apps/v1",
        "kind": "ReplicaSet",
        "metadata": {
            "name": name,
            "namespace": NAMESPACE,
            "uid": format!("{}-uid", name),
            "ownerReferences": [{
                "apiVersion": "apps/v1",
                "kind": "Deployment",
                "name": "owner",
                "uid": owner_uid,
                "controller": true
            }]
        },
        "spec": { "selector": { "matchLabels": { "app": "owner" } } }
    })
}

pub fn event_value(name: &str, involved_uid: &str, reason: &str) -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Event",
        "metadata": { "name": name, "namespace": NAMESPACE },
        "involvedObject": { "kind": "ReplicaSet", "uid": involved_uid },
        "reason": reason,
        "message": format!("{} for {}", reason, involved_uid),
        "type": "Warning"
    })
}
