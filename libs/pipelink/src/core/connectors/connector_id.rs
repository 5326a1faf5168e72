// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identity token, assigned when a connector is constructed.
///
/// Used for default names and diagnostics only. Connector equality is
/// identity of the shared connector state, not this token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectorId(u64);

impl ConnectorId {
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Name given to connectors constructed without one.
    pub fn default_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connector-{}", self.0)
    }
}
