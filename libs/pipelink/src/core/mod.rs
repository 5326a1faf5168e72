// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

pub mod config;
pub mod connectors;
pub mod error;
pub mod node;

pub use config::{
    ConnectorDefaults, ConnectorsConfig, InputConfig, OnFull, OnNoPartners, OutputConfig,
    DEFAULT_QUEUE_CAPACITY,
};
pub use connectors::{
    Connector, ConnectorDirection, ConnectorId, ConnectorRef, ConnectorState, ConnectorValue,
    InputConnector, InputConnectorBuilder, OutputConnector, OutputConnectorBuilder,
};
pub use error::{ConnectorError, DeliveryFailure, Result};
pub use node::{Node, NodeRef};
