// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! The node side of the connector contract.
//!
//! Nodes own their connectors and drive `send`/`receive` from their own run
//! loop. Connectors only see a node through this trait, via a weak reference.

use std::sync::Arc;

/// A processing unit that owns connectors.
pub trait Node: Send + Sync {
    /// Name used in connector addresses (`node.connector`).
    fn name(&self) -> &str;
}

/// Shared handle to a node, as returned by `Connector::parent_node`.
pub type NodeRef = Arc<dyn Node>;
