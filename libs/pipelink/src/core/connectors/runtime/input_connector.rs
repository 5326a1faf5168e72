// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! InputConnector - receiving end of a connection.

use std::fmt;
use std::marker::PhantomData;
use std::ptr;
use std::sync::{Arc, Weak};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use super::connector_core::ConnectorCore;
use super::output_connector::{OutputConnector, OutputInner};
use super::wiring;
use crate::core::connectors::{Connector, ConnectorDirection, ConnectorId, ConnectorValue};
use crate::core::{ConnectorError, InputConfig, Node, Result};

/// Inner state for InputConnector.
pub(crate) struct InputInner<T: ConnectorValue> {
    pub(super) core: ConnectorCore,
    pub(super) config: InputConfig,
    /// Held by the input itself so the queue never disconnects while the
    /// input lives. Outputs get clones when they connect.
    pub(super) sender: Sender<T>,
    receiver: Receiver<T>,
    pub(super) partners: Mutex<Vec<Weak<OutputInner<T>>>>,
}

impl<T: ConnectorValue> InputInner<T> {
    fn new(core: ConnectorCore, config: InputConfig) -> Self {
        let (sender, receiver) = match config.capacity {
            Some(capacity) => crossbeam_channel::bounded(capacity),
            None => crossbeam_channel::unbounded(),
        };
        Self {
            core,
            config,
            sender,
            receiver,
            partners: Mutex::new(Vec::new()),
        }
    }
}

impl<T: ConnectorValue> Drop for InputInner<T> {
    fn drop(&mut self) {
        let this: *const InputInner<T> = self;
        for output in self.partners.get_mut().drain(..).filter_map(|w| w.upgrade()) {
            output
                .partners
                .lock()
                .retain(|target| !ptr::eq(target.input.as_ptr(), this));
            tracing::debug!(
                output = %output.core.address(),
                input = %self.core.address(),
                "disconnected input on drop"
            );
        }
    }
}

/// Input connector owned by a node.
///
/// Owns a FIFO queue fed by every connected [`OutputConnector`]. Values from
/// different outputs interleave in arrival order. Clones are shallow: they
/// share the queue and the partner list.
pub struct InputConnector<T: ConnectorValue> {
    pub(super) inner: Arc<InputInner<T>>,
}

impl<T: ConnectorValue> Clone for InputConnector<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ConnectorValue> PartialEq for InputConnector<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: ConnectorValue> Eq for InputConnector<T> {}

impl<T: ConnectorValue> Default for InputConnector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ConnectorValue> InputConnector<T> {
    /// Create an input with a generated name and the default queue.
    pub fn new() -> Self {
        Self::from_parts(None, InputConfig::default(), None)
    }

    /// Create an input with the default queue.
    pub fn named(name: &str) -> Self {
        Self::from_parts(Some(name.to_string()), InputConfig::default(), None)
    }

    pub fn builder() -> InputConnectorBuilder<T> {
        InputConnectorBuilder::default()
    }

    fn from_parts(
        name: Option<String>,
        config: InputConfig,
        parent: Option<Weak<dyn Node>>,
    ) -> Self {
        let core = ConnectorCore::new(ConnectorDirection::Input, name, parent);
        Self {
            inner: Arc::new(InputInner::new(core, config)),
        }
    }

    pub(super) fn from_inner(inner: Arc<InputInner<T>>) -> Self {
        Self { inner }
    }

    pub fn config(&self) -> &InputConfig {
        &self.inner.config
    }

    /// Queue capacity, `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.inner.config.capacity
    }

    /// Number of values waiting in the queue.
    pub fn pending(&self) -> usize {
        self.inner.receiver.len()
    }

    pub fn has_data(&self) -> bool {
        !self.inner.receiver.is_empty()
    }

    /// Snapshot of the connected outputs, in connection order.
    pub fn partners(&self) -> Vec<OutputConnector<T>> {
        self.inner
            .partners
            .lock()
            .iter()
            .filter_map(Weak::upgrade)
            .map(OutputConnector::from_inner)
            .collect()
    }

    /// Link this input to `output` and register this input's queue as one of
    /// its delivery targets.
    pub fn connect(&self, output: &OutputConnector<T>) -> Result<()> {
        wiring::connect(&self.inner, &output.inner)
    }

    pub fn disconnect(&self, output: &OutputConnector<T>) -> Result<()> {
        wiring::disconnect(&self.inner, &output.inner)
    }

    /// Disconnect every partner. Returns how many links were removed.
    pub fn disconnect_all(&self) -> usize {
        self.partners()
            .iter()
            .filter(|output| wiring::disconnect(&self.inner, &output.inner).is_ok())
            .count()
    }

    /// Dequeue the next value.
    ///
    /// - `blocking = false`: fails with `WouldBlock` if the queue is empty
    ///   (`timeout` is ignored).
    /// - `blocking = true`, `timeout = None`: waits until a value arrives.
    /// - `blocking = true`, `timeout = Some(d)`: fails with `Timeout` once `d`
    ///   has elapsed. Nothing is dequeued, so the call can be retried.
    ///
    /// Never holds the partner-list lock, so senders and wiring changes are
    /// not blocked while this waits.
    pub fn receive(&self, blocking: bool, timeout: Option<Duration>) -> Result<T> {
        let receiver = &self.inner.receiver;

        // The input holds a sender of its own, so the channel never reports
        // disconnected and every receive error means "nothing arrived".
        let value = match (blocking, timeout) {
            (false, _) => receiver.try_recv().map_err(|_| self.would_block())?,
            (true, None) => receiver.recv().map_err(|_| self.would_block())?,
            (true, Some(timeout)) => {
                receiver
                    .recv_timeout(timeout)
                    .map_err(|_| ConnectorError::Timeout {
                        connector: self.address(),
                        timeout,
                    })?
            }
        };

        tracing::trace!(input = %self.address(), pending = receiver.len(), "received value");
        Ok(value)
    }

    /// Non-blocking receive.
    pub fn try_receive(&self) -> Result<T> {
        self.receive(false, None)
    }

    /// Blocking receive bounded by `timeout`.
    pub fn receive_timeout(&self, timeout: Duration) -> Result<T> {
        self.receive(true, Some(timeout))
    }

    fn would_block(&self) -> ConnectorError {
        ConnectorError::WouldBlock {
            connector: self.address(),
        }
    }
}

impl<T: ConnectorValue> Connector for InputConnector<T> {
    fn id(&self) -> ConnectorId {
        self.inner.core.id()
    }

    fn name(&self) -> &str {
        self.inner.core.name()
    }

    fn direction(&self) -> ConnectorDirection {
        self.inner.core.direction()
    }

    fn parent_node(&self) -> Option<Arc<dyn Node>> {
        self.inner.core.parent_node()
    }

    fn is_attached(&self) -> bool {
        self.inner.core.is_attached()
    }

    fn attach_weak(&self, node: Weak<dyn Node>) -> Result<()> {
        self.inner.core.attach(node)
    }

    fn partner_count(&self) -> usize {
        self.inner
            .partners
            .lock()
            .iter()
            .filter(|partner| partner.strong_count() > 0)
            .count()
    }

    fn address(&self) -> String {
        self.inner.core.address()
    }
}

impl<T: ConnectorValue> fmt::Display for InputConnector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.core.fmt_display("InputConnector", f)
    }
}

impl<T: ConnectorValue> fmt::Debug for InputConnector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputConnector")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("config", &self.inner.config)
            .field("partners", &self.partner_count())
            .field("pending", &self.pending())
            .finish()
    }
}

/// Builder for [`InputConnector`].
pub struct InputConnectorBuilder<T: ConnectorValue> {
    name: Option<String>,
    config: InputConfig,
    parent: Option<Weak<dyn Node>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ConnectorValue> Default for InputConnectorBuilder<T> {
    fn default() -> Self {
        Self {
            name: None,
            config: InputConfig::default(),
            parent: None,
            _marker: PhantomData,
        }
    }
}

impl<T: ConnectorValue> InputConnectorBuilder<T> {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn config(mut self, config: InputConfig) -> Self {
        self.config = config;
        self
    }

    pub fn parent<N: Node + 'static>(self, node: &Arc<N>) -> Self {
        let weak: Weak<N> = Arc::downgrade(node);
        self.parent_weak(weak)
    }

    /// For nodes that build their connectors inside `Arc::new_cyclic`.
    pub fn parent_weak(mut self, node: Weak<dyn Node>) -> Self {
        self.parent = Some(node);
        self
    }

    /// Fails with `Configuration` if the queue config is invalid.
    pub fn build(self) -> Result<InputConnector<T>> {
        self.config.validate()?;
        Ok(InputConnector::from_parts(self.name, self.config, self.parent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConnectorState;

    #[test]
    fn test_new_input_is_unattached_and_empty() {
        let input = InputConnector::<u32>::named("in");
        assert_eq!(input.name(), "in");
        assert_eq!(input.direction(), ConnectorDirection::Input);
        assert_eq!(input.state(), ConnectorState::Unattached);
        assert!(!input.is_connected());
        assert!(input.partners().is_empty());
        assert!(!input.has_data());
        assert_eq!(input.capacity(), Some(crate::core::DEFAULT_QUEUE_CAPACITY));
    }

    #[test]
    fn test_display_shows_kind_name_and_id() {
        let input = InputConnector::<u32>::named("frames");
        assert_eq!(
            input.to_string(),
            format!("<InputConnector(name=frames) id={}>", input.id())
        );
    }

    #[test]
    fn test_generated_names_are_distinct() {
        let a = InputConnector::<u32>::new();
        let b = InputConnector::<u32>::new();
        assert_ne!(a.name(), b.name());
        assert_eq!(a.name(), a.id().default_name());
    }

    #[test]
    fn test_builder_rejects_zero_capacity() {
        let err = InputConnector::<u32>::builder()
            .config(InputConfig::bounded(0))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConnectorError::Configuration(_)));
    }

    #[test]
    fn test_try_receive_on_empty_queue_would_block() {
        let input = InputConnector::<u32>::named("in");
        let err = input.try_receive().unwrap_err();
        assert!(matches!(err, ConnectorError::WouldBlock { .. }));
        assert!(err.is_transient());
    }

    #[test]
    fn test_clones_share_state() {
        let input = InputConnector::<u32>::named("in");
        let clone = input.clone();
        assert_eq!(input, clone);
        assert_eq!(input.id(), clone.id());
        assert_ne!(input, InputConnector::<u32>::named("in"));
    }
}
