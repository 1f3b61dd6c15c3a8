// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Event subscriptions and waiting on conditions over them.

pub mod conditions;
pub mod event;
pub mod session;
pub mod watcher;

pub use event::{ChangeEvent, Payload, ResourceKind};
pub use session::{Selector, WatchScope, WatchSession, FROM_CURRENT_STATE};
pub use watcher::{drive, ConditionWatcher, WaitOutcome, WaitPolicy};
