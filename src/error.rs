// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Failed to create {kind} {name}: {source}")]
    CreateFailed {
        kind: String,
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("Failed to list {kind}: {source}")]
    ListFailed {
        kind: String,
        #[source]
        source: kube::Error,
    },

    #[error("Failed to delete {kind} {name}: {source}")]
    DeleteFailed {
        kind: String,
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("Timeout reached after {after:?} while waiting for {what}")]
    TimedOut { what: String, after: Duration },

    #[error("Watch stream failed while waiting for {what}: {reason}")]
    StreamError { what: String, reason: String },

    #[error("Condition not met: {0}")]
    ConditionNotMet(String),

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Namespace setup failed: {0}")]
    NamespaceError(String),

    #[error("{}", render_aborted(.cause, .cleanup))]
    Aborted {
        cause: Option<Box<HarnessError>>,
        cleanup: Vec<HarnessError>,
    },
}

pub type Result<T> = std::result::Result<T, HarnessError>;

/// Renders the fatal message: the originating error first, cleanup failures after it.
fn render_aborted(cause: &Option<Box<HarnessError>>, cleanup: &[HarnessError]) -> String {
    let mut message = match cause {
        Some(cause) => format!("test failed: {}", cause),
        None => "test failed during cleanup".to_string(),
    };
    for (i, err) in cleanup.iter().enumerate() {
        let sep = if i == 0 { "; cleanup errors: " } else { ", " };
        message.push_str(sep);
        message.push_str(&err.to_string());
    }
    message
}
