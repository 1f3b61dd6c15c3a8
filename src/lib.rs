// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Harness for tests that run against a live Kubernetes cluster.
//!
//! Tests create workloads in a single namespace through a [`TestEnvironment`],
//! block until the cluster reports a condition, and rely on the environment to
//! clean the namespace up and fail the test when anything goes wrong.
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use clusterwait::TestEnvironment;
//! use k8s_openapi::api::apps::v1::Deployment;
//!
//! let env = TestEnvironment::connect().await?;
//! let created = env.create_deployment(&Deployment::default()).await;
//! env.wait_for_deployment(&created).await;
//! env.cleanup(None).await;
//! # Ok(())
//! # }
//! ```

pub mod cleanup;
pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
pub mod kubernetes;
pub mod lifecycle;
pub mod logging;
pub mod waits;
pub mod watch;

#[cfg(test)]
mod test_utils;

pub use environment::TestEnvironment;
pub use error::{HarnessError, Result};
