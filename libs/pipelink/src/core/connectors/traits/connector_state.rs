// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Connector lifecycle state.
//!
//! `Unattached` -> `Attached` (parent registered, no partners) <-> `Wired`
//! (at least one partner). A connector never returns to `Unattached`; it
//! ends when its owning node drops it.

/// Lifecycle state of a connector, derived from its parent and partners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorState {
    /// No parent node registered yet.
    Unattached,
    /// Parent registered, zero partners.
    Attached,
    /// At least one partner.
    Wired,
}

impl ConnectorState {
    /// A connector wired before its parent registered still reports `Wired`.
    pub fn from_parts(attached: bool, connected: bool) -> Self {
        match (attached, connected) {
            (_, true) => Self::Wired,
            (true, false) => Self::Attached,
            (false, false) => Self::Unattached,
        }
    }
}
