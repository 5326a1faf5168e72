// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::core::connectors::ConnectorDirection;

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Direction mismatch: cannot connect {connector} to {partner} (both are {direction})")]
    DirectionMismatch {
        connector: String,
        partner: String,
        direction: ConnectorDirection,
    },

    #[error("Already connected: {connector} <-> {partner}")]
    AlreadyConnected { connector: String, partner: String },

    #[error("Not connected: {connector} <-> {partner}")]
    NotConnected { connector: String, partner: String },

    #[error("Connector {connector} already has a parent node")]
    AlreadyAttached { connector: String },

    #[error("No value available on {connector}")]
    WouldBlock { connector: String },

    #[error("Timed out after {timeout:?} waiting on {connector}")]
    Timeout { connector: String, timeout: Duration },

    #[error("Queue full on {connector} (capacity {capacity})")]
    QueueFull { connector: String, capacity: usize },

    #[error("Output {connector} has no connected partners")]
    NoPartners { connector: String },

    #[error("Partner {connector} dropped its queue")]
    PartnerDropped { connector: String },

    #[error(
        "Delivery from {connector} failed for {} partner(s), {delivered} delivered: {}",
        .failures.len(),
        summarize(.failures)
    )]
    Delivery {
        connector: String,
        failures: Vec<DeliveryFailure>,
        delivered: usize,
    },

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ConnectorError {
    /// Flow-control conditions a node's run loop is expected to retry.
    ///
    /// An aggregated delivery error is transient only if every failure in it is.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::WouldBlock { .. } | Self::Timeout { .. } | Self::QueueFull { .. } => true,
            Self::Delivery { failures, .. } => failures.iter().all(|f| f.error.is_transient()),
            _ => false,
        }
    }

    /// Wiring mistakes made by the graph builder. Never retried.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::DirectionMismatch { .. }
                | Self::AlreadyConnected { .. }
                | Self::NotConnected { .. }
                | Self::AlreadyAttached { .. }
        )
    }
}

/// One partner that did not receive a value during a fan-out send.
#[derive(Debug)]
pub struct DeliveryFailure {
    /// Address of the input connector that failed.
    pub partner: String,
    pub error: ConnectorError,
}

impl fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.partner, self.error)
    }
}

fn summarize(failures: &[DeliveryFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
