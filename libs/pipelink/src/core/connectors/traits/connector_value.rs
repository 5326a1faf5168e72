// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

/// Types that can travel through connectors.
///
/// `Clone` because an output duplicates each value to every input partner.
pub trait ConnectorValue: Clone + Send + 'static {}

impl<T: Clone + Send + 'static> ConnectorValue for T {}
