// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Connector infrastructure for node communication.
//!
//! - **traits/**: the shared `Connector` contract, direction and lifecycle state
//! - **runtime/**: input queues, output fan-out, and the wiring between them

mod connector_id;
pub mod runtime;
pub mod traits;

pub use connector_id::ConnectorId;
pub use runtime::{
    ConnectorRef, InputConnector, InputConnectorBuilder, OutputConnector, OutputConnectorBuilder,
};
pub use traits::{Connector, ConnectorDirection, ConnectorState, ConnectorValue};
