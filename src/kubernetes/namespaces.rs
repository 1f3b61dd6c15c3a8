// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace management utilities

use crate::error::{HarnessError, Result};
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client,
};
use tracing::{debug, info, instrument};

/// Ensure the test namespace exists in the cluster, create if it doesn't
#[instrument(skip(client))]
pub async fn ensure_namespace_exists(client: &Client, namespace: &str) -> Result<()> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    match namespaces.get(namespace).await {
        Ok(_) => {
            debug!("Namespace {} already exists", namespace);
            Ok(())
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            info!("Creating namespace {}", namespace);
            let ns = Namespace {
                metadata: ObjectMeta {
                    name: Some(namespace.to_string()),
                    ..Default::default()
                },
                ..Default::default()
            };
            namespaces
                .create(&PostParams::default(), &ns)
                .await
                .map_err(|e| {
                    HarnessError::NamespaceError(format!(
                        "Failed to create namespace {}: {}",
                        namespace, e
                    ))
                })?;
            info!("Namespace {} created successfully", namespace);
            Ok(())
        }
        Err(e) => Err(HarnessError::NamespaceError(format!(
            "Failed to check namespace {}: {}",
            namespace, e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{namespace_json, not_found_json, status_json, MockService};

    #[tokio::test]
    async fn test_existing_namespace_is_left_alone() {
        let mock = MockService::new().on_get(
            "/api/v1/namespaces/test-cases",
            200,
            &namespace_json("test-cases"),
        );
        let client = mock.clone().into_client();

        ensure_namespace_exists(&client, "test-cases").await.unwrap();

        assert_eq!(mock.mutating_requests(), 0);
    }

    #[tokio::test]
    async fn test_missing_namespace_is_created() {
        let mock = MockService::new()
            .on_get(
                "/api/v1/namespaces/test-cases",
                404,
                &not_found_json("namespaces", "test-cases"),
            )
            .on_post("/api/v1/namespaces", 201, &namespace_json("test-cases"));
        let client = mock.clone().into_client();

        ensure_namespace_exists(&client, "test-cases").await.unwrap();

        assert_eq!(
            mock.requests().last().unwrap(),
            &("POST".to_string(), "/api/v1/namespaces".to_string())
        );
    }

    #[tokio::test]
    async fn test_forbidden_namespace_lookup_fails() {
        let mock = MockService::new().on_get(
            "/api/v1/namespaces/test-cases",
            403,
            &status_json(403, "Forbidden", "namespaces \"test-cases\" is forbidden"),
        );
        let client = mock.into_client();

        let err = ensure_namespace_exists(&client, "test-cases")
            .await
            .unwrap_err();

        assert!(matches!(err, HarnessError::NamespaceError(_)));
    }
}
