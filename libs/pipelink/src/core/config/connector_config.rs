// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Per-connector flow-control policies.

use serde::{Deserialize, Serialize};

use crate::core::{ConnectorError, Result};

/// Default queue capacity for input connectors.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

fn default_capacity() -> Option<usize> {
    Some(DEFAULT_QUEUE_CAPACITY)
}

/// What a sender does when a bounded input queue is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnFull {
    /// Suspend the sending node until the consumer makes room (backpressure).
    #[default]
    Block,
    /// Fail the delivery with `QueueFull`.
    Error,
}

/// What an output does when it has no partners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnNoPartners {
    /// Fail the send with `NoPartners`.
    #[default]
    Error,
    /// Succeed and deliver to nobody.
    Drop,
}

/// Configuration for an input connector's queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    /// Queue capacity. `None` (`~` in YAML) means unbounded.
    #[serde(default = "default_capacity")]
    pub capacity: Option<usize>,
    #[serde(default)]
    pub on_full: OnFull,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            on_full: OnFull::default(),
        }
    }
}

impl InputConfig {
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            on_full: OnFull::default(),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            capacity: None,
            on_full: OnFull::default(),
        }
    }

    pub fn with_on_full(mut self, on_full: OnFull) -> Self {
        self.on_full = on_full;
        self
    }

    /// A zero capacity would turn the queue into a rendezvous point, which
    /// non-blocking delivery can never satisfy.
    pub fn validate(&self) -> Result<()> {
        match self.invalid_reason() {
            Some(reason) => Err(ConnectorError::Configuration(reason.into())),
            None => Ok(()),
        }
    }

    pub(super) fn invalid_reason(&self) -> Option<&'static str> {
        (self.capacity == Some(0))
            .then_some("input capacity must be at least 1 (use `~` for unbounded)")
    }
}

/// Configuration for an output connector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub on_no_partners: OnNoPartners,
}

impl OutputConfig {
    pub fn dropping() -> Self {
        Self {
            on_no_partners: OnNoPartners::Drop,
        }
    }
}
