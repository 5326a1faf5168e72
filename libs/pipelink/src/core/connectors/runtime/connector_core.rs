// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! ConnectorCore - identity, name and parent back-reference shared by both
//! connector directions.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use crate::core::connectors::{ConnectorDirection, ConnectorId};
use crate::core::{ConnectorError, Node, Result};

/// Placeholder node name in addresses of connectors without a live parent.
const DETACHED_NODE: &str = "<detached>";

pub(crate) struct ConnectorCore {
    id: ConnectorId,
    name: String,
    direction: ConnectorDirection,
    /// Set at most once. Never upgraded for longer than a call.
    parent: OnceLock<Weak<dyn Node>>,
}

impl ConnectorCore {
    pub(crate) fn new(
        direction: ConnectorDirection,
        name: Option<String>,
        parent: Option<Weak<dyn Node>>,
    ) -> Self {
        let id = ConnectorId::next();
        Self {
            id,
            name: name.unwrap_or_else(|| id.default_name()),
            direction,
            parent: parent.map(OnceLock::from).unwrap_or_default(),
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> ConnectorId {
        self.id
    }

    #[inline]
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub(crate) fn direction(&self) -> ConnectorDirection {
        self.direction
    }

    pub(crate) fn parent_node(&self) -> Option<Arc<dyn Node>> {
        self.parent.get().and_then(|node| node.upgrade())
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.parent.get().is_some()
    }

    pub(crate) fn attach(&self, node: Weak<dyn Node>) -> Result<()> {
        self.parent
            .set(node)
            .map_err(|_| ConnectorError::AlreadyAttached {
                connector: self.address(),
            })?;
        tracing::debug!(connector = %self.address(), direction = %self.direction, "attached to node");
        Ok(())
    }

    pub(crate) fn address(&self) -> String {
        match self.parent_node() {
            Some(node) => format!("{}.{}", node.name(), self.name),
            None => format!("{}.{}", DETACHED_NODE, self.name),
        }
    }

    pub(crate) fn fmt_display(&self, kind: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}(name={}) id={}>", kind, self.name, self.id)
    }
}
