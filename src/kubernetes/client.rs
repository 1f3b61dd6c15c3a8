// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation from a kubeconfig file

use crate::config::Config;
use crate::error::{HarnessError, Result};
use kube::{
    config::{KubeConfigOptions, Kubeconfig},
    Client,
};
use std::path::Path;
use tracing::{info, instrument};

/// Create a Kubernetes client for the cluster under test
#[instrument(skip(config), fields(kubeconfig = %config.kubeconfig.display()))]
pub async fn create_client(config: &Config) -> Result<Client> {
    let kubeconfig = read_kubeconfig(&config.kubeconfig)?;
    let client = create_client_from_kubeconfig(&kubeconfig).await?;

    info!("Connected to cluster using {}", config.kubeconfig.display());
    Ok(client)
}

fn read_kubeconfig(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        HarnessError::KubeconfigError(format!(
            "Failed to read kubeconfig {}: {}",
            path.display(),
            e
        ))
    })
}

/// Create a Kubernetes client from a kubeconfig string
async fn create_client_from_kubeconfig(kubeconfig: &str) -> Result<Client> {
    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig)
        .map_err(|e| HarnessError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e)))?;

    let client_config =
        kube::Config::from_custom_kubeconfig(kubeconfig_parsed, &KubeConfigOptions::default())
            .await
            .map_err(|e| {
                HarnessError::KubeconfigError(format!("Failed to create config: {}", e))
            })?;

    Client::try_from(client_config)
        .map_err(|e| HarnessError::KubeconfigError(format!("Failed to create client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_create_client_missing_kubeconfig() {
        let config = Config {
            kubeconfig: PathBuf::from("/nonexistent/clusterwait/kubeconfig"),
            ..Config::default()
        };

        let err = create_client(&config)
            .await
            .err()
            .expect("a missing kubeconfig should be rejected");

        assert!(matches!(err, HarnessError::KubeconfigError(_)));
        assert!(err.to_string().contains("/nonexistent/clusterwait/kubeconfig"));
    }

    #[tokio::test]
    async fn test_create_client_from_invalid_yaml() {
        let err = create_client_from_kubeconfig("clusters: [: not yaml")
            .await
            .err()
            .expect("malformed yaml should be rejected");

        assert!(err.to_string().contains("Failed to parse kubeconfig"));
    }
}
