// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Connector configuration.
//!
//! - `connector_config`: queue and fan-out policies for a single connector
//! - `connectors_config`: `pipelink.yaml` with defaults and per-name overrides

mod connector_config;
mod connectors_config;

pub use connector_config::{InputConfig, OnFull, OnNoPartners, OutputConfig, DEFAULT_QUEUE_CAPACITY};
pub use connectors_config::{ConnectorDefaults, ConnectorsConfig};
