// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Environment variables read by [`crate::config::Config::from_env`]
pub mod env_vars {
    /// Path to the kubeconfig file
    pub const KUBECONFIG: &str = "KUBECONFIG";
    pub const NAMESPACE: &str = "CLUSTERWAIT_NAMESPACE";
    pub const TIMEOUT_SECS: &str = "CLUSTERWAIT_TIMEOUT_SECS";
    pub const COOLDOWN_SECS: &str = "CLUSTERWAIT_COOLDOWN_SECS";
}

/// Fixed policy used when the environment does not override it
pub mod defaults {
    /// Namespace every test resource lives in
    pub const NAMESPACE: &str = "test-cases";
    /// Kubeconfig location relative to the user's home directory
    pub const KUBECONFIG_RELATIVE_PATH: &str = ".kube/config";
    /// Budget for a single wait, in seconds
    pub const WAIT_TIMEOUT_SECS: u64 = 30;
    /// Pause after an event that did not satisfy the condition, in seconds
    pub const COOLDOWN_SECS: u64 = 5;
}

/// Event reason the ReplicaSet controller reports when it cannot create pods
pub const FAILED_CREATE_REASON: &str = "FailedCreate";

/// Replica count assumed when a deployment does not set one
pub const DEFAULT_REPLICAS: i32 = 1;
