// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{defaults, env_vars};
use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Harness configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the kubeconfig used to reach the cluster under test
    pub kubeconfig: PathBuf,
    /// Namespace every resource and watch is scoped to
    pub namespace: String,
    /// Wall-clock budget for a single wait
    pub wait_timeout: Duration,
    /// Pause after each event that did not satisfy a condition
    pub cooldown: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let kubeconfig = match env::var_os(env_vars::KUBECONFIG) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_kubeconfig_path()?,
        };

        let namespace = env::var(env_vars::NAMESPACE)
            .unwrap_or_else(|_| defaults::NAMESPACE.to_string());

        let wait_timeout = secs_from_env(env_vars::TIMEOUT_SECS, defaults::WAIT_TIMEOUT_SECS)?;
        let cooldown = secs_from_env(env_vars::COOLDOWN_SECS, defaults::COOLDOWN_SECS)?;

        Ok(Config {
            kubeconfig,
            namespace,
            wait_timeout,
            cooldown,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            kubeconfig: home_kubeconfig()
                .unwrap_or_else(|| PathBuf::from(defaults::KUBECONFIG_RELATIVE_PATH)),
            namespace: defaults::NAMESPACE.to_string(),
            wait_timeout: Duration::from_secs(defaults::WAIT_TIMEOUT_SECS),
            cooldown: Duration::from_secs(defaults::COOLDOWN_SECS),
        }
    }
}

/// `~/.kube/config` for the invoking user
fn default_kubeconfig_path() -> Result<PathBuf> {
    home_kubeconfig().ok_or(anyhow!("could not compute home dir"))
}

fn home_kubeconfig() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(defaults::KUBECONFIG_RELATIVE_PATH))
}

fn secs_from_env(var: &str, default: u64) -> Result<Duration> {
    let secs = match env::var(var) {
        Ok(value) => value.parse::<u64>().with_context(|| {
            format!("{} must be a whole number of seconds, got {:?}", var, value)
        })?,
        Err(_) => default,
    };
    Ok(Duration::from_secs(secs))
}
