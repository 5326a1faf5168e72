// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! The contract shared by input and output connectors.

use std::sync::{Arc, Weak};

use super::{ConnectorDirection, ConnectorState};
use crate::core::connectors::ConnectorId;
use crate::core::{Node, Result};

/// Identity, naming, parent-node and partner bookkeeping common to all
/// connectors.
///
/// Typed partner access (`partners()`) and `connect`/`disconnect` live on the
/// concrete types, where the partner direction is known at compile time.
pub trait Connector {
    fn id(&self) -> ConnectorId;

    /// Assigned or generated label. Constant for the connector's life.
    fn name(&self) -> &str;

    fn direction(&self) -> ConnectorDirection;

    /// The owning node, or `None` before registration or after the node is gone.
    fn parent_node(&self) -> Option<Arc<dyn Node>>;

    /// Whether a parent was ever registered (even if since dropped).
    fn is_attached(&self) -> bool;

    /// Register the owning node. Fails with `AlreadyAttached` on a second call.
    fn attach_weak(&self, node: Weak<dyn Node>) -> Result<()>;

    /// Number of live partners.
    fn partner_count(&self) -> usize;

    /// `node.connector`, or `<detached>.connector` without a live parent.
    /// Used in log fields and error messages.
    fn address(&self) -> String;

    fn attach<N: Node + 'static>(&self, node: &Arc<N>) -> Result<()>
    where
        Self: Sized,
    {
        let weak: Weak<N> = Arc::downgrade(node);
        self.attach_weak(weak)
    }

    fn is_connected(&self) -> bool {
        self.partner_count() > 0
    }

    fn state(&self) -> ConnectorState {
        ConnectorState::from_parts(self.is_attached(), self.is_connected())
    }
}
