// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Connector core for node-based data pipelines.
//!
//! Nodes own connectors. An [`OutputConnector`] fans every value out to the
//! queues of its connected [`InputConnector`] partners; an input dequeues from
//! its own queue. Wiring is symmetric and direction-checked, and connectors
//! hold only a weak back-reference to their parent [`Node`].
//!
//! ```
//! use pipelink::prelude::*;
//!
//! let output = OutputConnector::<u32>::named("out");
//! let input = InputConnector::<u32>::named("in");
//! output.connect(&input)?;
//!
//! output.send(7)?;
//! assert_eq!(input.try_receive()?, 7);
//! # Ok::<(), pipelink::ConnectorError>(())
//! ```

pub mod core;

pub use core::{
    Connector, ConnectorDirection, ConnectorError, ConnectorId, ConnectorRef, ConnectorState,
    ConnectorValue, ConnectorsConfig, DeliveryFailure, InputConfig, InputConnector,
    InputConnectorBuilder, Node, NodeRef, OnFull, OnNoPartners, OutputConfig, OutputConnector,
    OutputConnectorBuilder, Result,
};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::core::{
        Connector, ConnectorDirection, ConnectorError, ConnectorRef, ConnectorState, InputConfig,
        InputConnector, Node, OnFull, OnNoPartners, OutputConfig, OutputConnector, Result,
    };
}
