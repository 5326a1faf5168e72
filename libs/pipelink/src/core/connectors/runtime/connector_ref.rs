// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Direction-erased connector handle, for code that wires connectors looked up
//! by name and only learns their direction at runtime.

use std::fmt;
use std::sync::{Arc, Weak};

use super::{InputConnector, OutputConnector};
use crate::core::connectors::{Connector, ConnectorDirection, ConnectorId, ConnectorValue};
use crate::core::{ConnectorError, Node, Result};

/// Either end of a connection.
pub enum ConnectorRef<T: ConnectorValue> {
    Input(InputConnector<T>),
    Output(OutputConnector<T>),
}

impl<T: ConnectorValue> Clone for ConnectorRef<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Input(input) => Self::Input(input.clone()),
            Self::Output(output) => Self::Output(output.clone()),
        }
    }
}

impl<T: ConnectorValue> PartialEq for ConnectorRef<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Input(a), Self::Input(b)) => a == b,
            (Self::Output(a), Self::Output(b)) => a == b,
            _ => false,
        }
    }
}

impl<T: ConnectorValue> Eq for ConnectorRef<T> {}

impl<T: ConnectorValue> ConnectorRef<T> {
    pub fn as_input(&self) -> Option<&InputConnector<T>> {
        match self {
            Self::Input(input) => Some(input),
            Self::Output(_) => None,
        }
    }

    pub fn as_output(&self) -> Option<&OutputConnector<T>> {
        match self {
            Self::Output(output) => Some(output),
            Self::Input(_) => None,
        }
    }

    /// Connect to `partner`. Fails with `DirectionMismatch` if both ends have
    /// the same direction; neither partner list is touched in that case.
    pub fn connect(&self, partner: &ConnectorRef<T>) -> Result<()> {
        match (self, partner) {
            (Self::Input(input), Self::Output(output)) => input.connect(output),
            (Self::Output(output), Self::Input(input)) => output.connect(input),
            _ => Err(self.mismatch(partner)),
        }
    }

    /// Disconnect from `partner`. Two connectors of the same direction can
    /// never be linked, so that case reports `NotConnected`.
    pub fn disconnect(&self, partner: &ConnectorRef<T>) -> Result<()> {
        match (self, partner) {
            (Self::Input(input), Self::Output(output)) => input.disconnect(output),
            (Self::Output(output), Self::Input(input)) => output.disconnect(input),
            _ => Err(ConnectorError::NotConnected {
                connector: self.address(),
                partner: partner.address(),
            }),
        }
    }

    /// Snapshot of the connected partners, in connection order.
    pub fn partners(&self) -> Vec<ConnectorRef<T>> {
        match self {
            Self::Input(input) => input.partners().into_iter().map(Self::Output).collect(),
            Self::Output(output) => output.partners().into_iter().map(Self::Input).collect(),
        }
    }

    pub fn disconnect_all(&self) -> usize {
        match self {
            Self::Input(input) => input.disconnect_all(),
            Self::Output(output) => output.disconnect_all(),
        }
    }

    fn mismatch(&self, partner: &ConnectorRef<T>) -> ConnectorError {
        tracing::debug!(
            connector = %self.address(),
            partner = %partner.address(),
            "rejected connection between connectors of the same direction"
        );
        ConnectorError::DirectionMismatch {
            connector: self.address(),
            partner: partner.address(),
            direction: self.direction(),
        }
    }
}

impl<T: ConnectorValue> From<InputConnector<T>> for ConnectorRef<T> {
    fn from(input: InputConnector<T>) -> Self {
        Self::Input(input)
    }
}

impl<T: ConnectorValue> From<OutputConnector<T>> for ConnectorRef<T> {
    fn from(output: OutputConnector<T>) -> Self {
        Self::Output(output)
    }
}

impl<T: ConnectorValue> Connector for ConnectorRef<T> {
    fn id(&self) -> ConnectorId {
        match self {
            Self::Input(input) => input.id(),
            Self::Output(output) => output.id(),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Input(input) => input.name(),
            Self::Output(output) => output.name(),
        }
    }

    fn direction(&self) -> ConnectorDirection {
        match self {
            Self::Input(_) => ConnectorDirection::Input,
            Self::Output(_) => ConnectorDirection::Output,
        }
    }

    fn parent_node(&self) -> Option<Arc<dyn Node>> {
        match self {
            Self::Input(input) => input.parent_node(),
            Self::Output(output) => output.parent_node(),
        }
    }

    fn is_attached(&self) -> bool {
        match self {
            Self::Input(input) => input.is_attached(),
            Self::Output(output) => output.is_attached(),
        }
    }

    fn attach_weak(&self, node: Weak<dyn Node>) -> Result<()> {
        match self {
            Self::Input(input) => input.attach_weak(node),
            Self::Output(output) => output.attach_weak(node),
        }
    }

    fn partner_count(&self) -> usize {
        match self {
            Self::Input(input) => input.partner_count(),
            Self::Output(output) => output.partner_count(),
        }
    }

    fn address(&self) -> String {
        match self {
            Self::Input(input) => input.address(),
            Self::Output(output) => output.address(),
        }
    }
}

impl<T: ConnectorValue> fmt::Display for ConnectorRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(input) => fmt::Display::fmt(input, f),
            Self::Output(output) => fmt::Display::fmt(output, f),
        }
    }
}

impl<T: ConnectorValue> fmt::Debug for ConnectorRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(input) => f.debug_tuple("Input").field(input).finish(),
            Self::Output(output) => f.debug_tuple("Output").field(output).finish(),
        }
    }
}
