// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

mod connector;
mod connector_direction;
mod connector_state;
mod connector_value;

pub use connector::Connector;
pub use connector_direction::ConnectorDirection;
pub use connector_state::ConnectorState;
pub use connector_value::ConnectorValue;
