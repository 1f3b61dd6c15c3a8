// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The condition-wait engine.
//!
//! A wait races the next event of one [`WatchSession`] against a fixed deadline and
//! resolves exactly once. The session is closed before the call returns, whatever
//! the outcome.

use crate::error::{HarnessError, Result};
use crate::watch::event::{ChangeEvent, Payload};
use crate::watch::session::{WatchScope, WatchSession};
use kube::Client;
use std::time::Duration;
use tokio::time::{sleep_until, timeout_at, Instant};
use tracing::{debug, info, instrument, warn};

/// How a single wait resolved
#[derive(Debug)]
pub enum WaitOutcome {
    /// The payload of the first event that satisfied the condition
    Matched(Payload),
    /// No event satisfied the condition within the budget
    TimedOut(Duration),
    /// The subscription failed or closed before a match
    StreamError(String),
}

impl WaitOutcome {
    /// Convert into the harness error taxonomy; `what` names the awaited condition
    pub fn into_result(self, what: &str) -> Result<Payload> {
        match self {
            WaitOutcome::Matched(payload) => Ok(payload),
            WaitOutcome::TimedOut(after) => Err(HarnessError::TimedOut {
                what: what.to_string(),
                after,
            }),
            WaitOutcome::StreamError(reason) => Err(HarnessError::StreamError {
                what: what.to_string(),
                reason,
            }),
        }
    }
}

/// Budget for one wait plus the pause after each non-matching event
#[derive(Clone, Copy, Debug)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub cooldown: Duration,
}

#[derive(Clone)]
pub struct ConditionWatcher {
    client: Client,
    namespace: String,
    policy: WaitPolicy,
}

impl ConditionWatcher {
    pub fn new(client: Client, namespace: &str, policy: WaitPolicy) -> Self {
        Self {
            client,
            namespace: namespace.to_string(),
            policy,
        }
    }

    pub fn policy(&self) -> WaitPolicy {
        self.policy
    }

    /// Open a session for `scope` and wait until `predicate` accepts an event.
    ///
    /// A session that cannot be opened resolves to [`WaitOutcome::StreamError`].
    #[instrument(skip(self, predicate), fields(namespace = %self.namespace, scope = %scope))]
    pub async fn await_condition<P>(
        &self,
        scope: WatchScope,
        resource_version: &str,
        predicate: P,
    ) -> WaitOutcome
    where
        P: FnMut(&ChangeEvent) -> bool,
    {
        let deadline = Instant::now() + self.policy.timeout;
        let open = WatchSession::open(&self.client, &self.namespace, scope, resource_version);

        match timeout_at(deadline, open).await {
            Err(_) => WaitOutcome::TimedOut(self.policy.timeout),
            Ok(Err(e)) => WaitOutcome::StreamError(format!("failed to open watch: {}", e)),
            Ok(Ok(session)) => drive_until(session, predicate, deadline, self.policy).await,
        }
    }
}

/// Consume `session` until `predicate` matches, the deadline passes, or the stream ends.
///
/// In-band error events never match; they are logged and treated like any other
/// event that does not satisfy the condition yet.
pub async fn drive<P>(session: WatchSession, predicate: P, policy: WaitPolicy) -> WaitOutcome
where
    P: FnMut(&ChangeEvent) -> bool,
{
    drive_until(session, predicate, Instant::now() + policy.timeout, policy).await
}

async fn drive_until<P>(
    mut session: WatchSession,
    mut predicate: P,
    deadline: Instant,
    policy: WaitPolicy,
) -> WaitOutcome
where
    P: FnMut(&ChangeEvent) -> bool,
{
    let outcome = loop {
        if Instant::now() >= deadline {
            break WaitOutcome::TimedOut(policy.timeout);
        }

        let event = match timeout_at(deadline, session.next()).await {
            Err(_) => break WaitOutcome::TimedOut(policy.timeout),
            Ok(None) => break WaitOutcome::StreamError("watch stream closed".to_string()),
            Ok(Some(Err(e))) => break WaitOutcome::StreamError(e.to_string()),
            Ok(Some(Ok(event))) => event,
        };

        let matched = match &event {
            ChangeEvent::Error {
                code,
                reason,
                message,
            } => {
                warn!("Watch on {} reported {} {}: {}", session.scope(), code, reason, message);
                false
            }
            _ => predicate(&event),
        };

        if matched {
            if let Some(payload) = event.into_payload() {
                info!("Condition met by {}", payload.name());
                break WaitOutcome::Matched(payload);
            }
        }

        debug!("Event on {} did not satisfy the condition", session.scope());
        sleep_until(deadline.min(Instant::now() + policy.cooldown)).await;
    };

    session.close();
    outcome
}
