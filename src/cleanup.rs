// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace teardown, and the single place where an error ends a test.
//!
//! Teardown is one linear pass: every step runs even if an earlier one failed,
//! and all failures are reported together with the error that triggered it.

use crate::error::{HarnessError, Result};
use crate::lifecycle::ResourceLifecycleClient;
use crate::waits::wait_for_pods_drained;
use crate::watch::ConditionWatcher;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Secret;
use kube::ResourceExt;
use tracing::{error, info, instrument, warn};

#[derive(Clone)]
pub struct CleanupCoordinator {
    lifecycle: ResourceLifecycleClient,
    watcher: ConditionWatcher,
}

impl CleanupCoordinator {
    pub fn new(lifecycle: ResourceLifecycleClient, watcher: ConditionWatcher) -> Self {
        Self { lifecycle, watcher }
    }

    /// Remove all workload resources, then end the test if anything went wrong.
    ///
    /// # Panics
    ///
    /// Panics with the aggregate error when `observed` is set or a teardown step fails.
    pub async fn cleanup(&self, observed: Option<HarnessError>) {
        if let Err(e) = self.teardown(observed).await {
            error!("{}", e);
            panic!("{}", e);
        }
    }

    /// Remove all workload resources and report what went wrong, if anything.
    ///
    /// Returns [`HarnessError::Aborted`] carrying `observed` first and every
    /// failed teardown step after it.
    #[instrument(skip(self, observed), fields(namespace = %self.lifecycle.namespace()))]
    pub async fn teardown(&self, observed: Option<HarnessError>) -> Result<()> {
        if let Some(e) = &observed {
            warn!("Cleaning up after failure: {}", e);
        }

        let mut failures = Vec::new();
        self.cleanup_secrets(&mut failures).await;
        self.cleanup_deployments(&mut failures).await;

        if observed.is_none() && failures.is_empty() {
            return Ok(());
        }

        Err(HarnessError::Aborted {
            cause: observed.map(Box::new),
            cleanup: failures,
        })
    }

    async fn cleanup_secrets(&self, failures: &mut Vec<HarnessError>) {
        info!("Cleaning up secrets");
        let secrets = match self.lifecycle.list::<Secret>().await {
            Ok(secrets) => secrets,
            Err(e) => {
                warn!("{}", e);
                failures.push(e);
                return;
            }
        };

        for secret in secrets {
            if let Err(e) = self.lifecycle.delete::<Secret>(&secret.name_any()).await {
                warn!("{}", e);
                failures.push(e);
            }
        }
    }

    /// Deployments are gone once their pods are; that is what gets awaited
    async fn cleanup_deployments(&self, failures: &mut Vec<HarnessError>) {
        info!("Cleaning up deployments");
        match self.lifecycle.list::<Deployment>().await {
            Ok(deployments) => {
                for deployment in deployments {
                    let name = deployment.name_any();
                    if let Err(e) = self.lifecycle.delete::<Deployment>(&name).await {
                        warn!("{}", e);
                        failures.push(e);
                    }
                }
            }
            Err(e) => {
                warn!("{}", e);
                failures.push(e);
            }
        }

        if let Err(e) = wait_for_pods_drained(&self.watcher, &self.lifecycle).await {
            warn!("{}", e);
            failures.push(e);
        }
    }
}
