// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The handle test functions work through.
//!
//! Every operation here is guarded: on failure it tears the namespace down and
//! ends the test with the error, so tests read as a straight line of steps.

use crate::cleanup::CleanupCoordinator;
use crate::config::Config;
use crate::error::{HarnessError, Result};
use crate::kubernetes::{create_client, ensure_namespace_exists};
use crate::lifecycle::ResourceLifecycleClient;
use crate::logging;
use crate::waits;
use crate::watch::{ConditionWatcher, WaitPolicy};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Event as CoreEvent, Secret};
use kube::Client;
use tracing::info;

#[derive(Clone)]
pub struct TestEnvironment {
    config: Config,
    lifecycle: ResourceLifecycleClient,
    watcher: ConditionWatcher,
    coordinator: CleanupCoordinator,
}

impl TestEnvironment {
    /// Connect using configuration from the environment and make sure the namespace exists
    pub async fn connect() -> anyhow::Result<Self> {
        logging::init();

        let config = Config::from_env()?;
        info!(
            "Configuration loaded: namespace={}, wait_timeout={:?}",
            config.namespace, config.wait_timeout
        );

        let client = create_client(&config).await?;
        ensure_namespace_exists(&client, &config.namespace).await?;

        Ok(Self::new(client, config))
    }

    pub fn new(client: Client, config: Config) -> Self {
        let policy = WaitPolicy {
            timeout: config.wait_timeout,
            cooldown: config.cooldown,
        };
        let lifecycle = ResourceLifecycleClient::new(client.clone(), &config.namespace);
        let watcher = ConditionWatcher::new(client, &config.namespace, policy);
        let coordinator = CleanupCoordinator::new(lifecycle.clone(), watcher.clone());

        Self {
            config,
            lifecycle,
            watcher,
            coordinator,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.config.namespace
    }

    pub fn lifecycle(&self) -> &ResourceLifecycleClient {
        &self.lifecycle
    }

    pub fn watcher(&self) -> &ConditionWatcher {
        &self.watcher
    }

    /// Drain the namespace between test cases without ending the test
    pub async fn reset(&self) -> Result<()> {
        self.coordinator.teardown(None).await
    }

    /// Tear everything down; ends the test if `observed` is set or teardown fails
    pub async fn cleanup(&self, observed: Option<HarnessError>) {
        self.coordinator.cleanup(observed).await
    }

    /// Unwrap `result`, or clean up and end the test with its error
    pub async fn ensure<T>(&self, result: Result<T>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                self.coordinator.cleanup(Some(e)).await;
                unreachable!("cleanup with an error always ends the test")
            }
        }
    }

    pub async fn create_deployment(&self, deployment: &Deployment) -> Deployment {
        let created = self.lifecycle.create(deployment).await;
        self.ensure(created).await
    }

    /// Block until the deployment's replicas are ready
    pub async fn wait_for_deployment(&self, deployment: &Deployment) -> Deployment {
        let ready = waits::wait_for_deployment_ready(&self.watcher, deployment).await;
        self.ensure(ready).await
    }

    pub async fn create_secret(&self, secret: &Secret) -> Secret {
        let created = self.lifecycle.create(secret).await;
        self.ensure(created).await
    }

    pub async fn list_secrets(&self) -> Vec<Secret> {
        let secrets = self.lifecycle.list::<Secret>().await;
        self.ensure(secrets).await
    }

    /// Block until the deployment is known to be unable to start, returning the
    /// `FailedCreate` event that proves it.
    ///
    /// `deployment` must be the object returned by [`Self::create_deployment`].
    pub async fn assert_deployment_failed(&self, deployment: &Deployment) -> CoreEvent {
        let failed = waits::wait_for_deployment_failure(&self.watcher, deployment).await;
        self.ensure(failed).await
    }
}
