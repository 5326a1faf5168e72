// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

mod connector_core;
mod connector_ref;
mod input_connector;
mod output_connector;
mod wiring;

pub use connector_ref::ConnectorRef;
pub use input_connector::{InputConnector, InputConnectorBuilder};
pub use output_connector::{OutputConnector, OutputConnectorBuilder};
