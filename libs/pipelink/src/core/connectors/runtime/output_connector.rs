// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! OutputConnector - sending end of a connection.

use std::fmt;
use std::marker::PhantomData;
use std::ptr;
use std::sync::{Arc, Weak};

use crossbeam_channel::{Sender, TrySendError};
use parking_lot::Mutex;

use super::connector_core::ConnectorCore;
use super::input_connector::{InputConnector, InputInner};
use super::wiring;
use crate::core::connectors::{Connector, ConnectorDirection, ConnectorId, ConnectorValue};
use crate::core::{
    ConnectorError, DeliveryFailure, Node, OnFull, OnNoPartners, OutputConfig, Result,
};

/// A connected input's queue, registered with an output at connect time.
pub(crate) struct DeliveryTarget<T: ConnectorValue> {
    pub(super) input: Weak<InputInner<T>>,
    /// Input address at connect time. Only reported once the input is gone.
    label: Arc<str>,
    sender: Sender<T>,
    on_full: OnFull,
    capacity: Option<usize>,
}

impl<T: ConnectorValue> Clone for DeliveryTarget<T> {
    fn clone(&self) -> Self {
        Self {
            input: self.input.clone(),
            label: Arc::clone(&self.label),
            sender: self.sender.clone(),
            on_full: self.on_full,
            capacity: self.capacity,
        }
    }
}

impl<T: ConnectorValue> DeliveryTarget<T> {
    pub(super) fn new(input: &Arc<InputInner<T>>, address: &str) -> Self {
        Self {
            input: Arc::downgrade(input),
            label: address.into(),
            sender: input.sender.clone(),
            on_full: input.config.on_full,
            capacity: input.config.capacity,
        }
    }

    /// Enqueue onto this input, honoring its `on_full` policy.
    fn deliver(&self, value: T) -> Result<()> {
        match self.on_full {
            OnFull::Block => self.sender.send(value).map_err(|_| self.dropped()),
            OnFull::Error => self.sender.try_send(value).map_err(|e| match e {
                TrySendError::Full(_) => ConnectorError::QueueFull {
                    connector: self.address(),
                    capacity: self.capacity.unwrap_or_default(),
                },
                TrySendError::Disconnected(_) => self.dropped(),
            }),
        }
    }

    /// Current address of the input, so a parent attached after wiring is
    /// named in errors. Never called with a partner-list lock held.
    fn address(&self) -> String {
        match self.input.upgrade() {
            Some(input) => input.core.address(),
            None => self.label.to_string(),
        }
    }

    fn dropped(&self) -> ConnectorError {
        ConnectorError::PartnerDropped {
            connector: self.address(),
        }
    }

    fn failure(&self, error: ConnectorError) -> DeliveryFailure {
        DeliveryFailure {
            partner: self.address(),
            error,
        }
    }
}

/// Inner state for OutputConnector.
pub(crate) struct OutputInner<T: ConnectorValue> {
    pub(super) core: ConnectorCore,
    config: OutputConfig,
    pub(super) partners: Mutex<Vec<DeliveryTarget<T>>>,
}

impl<T: ConnectorValue> Drop for OutputInner<T> {
    fn drop(&mut self) {
        let this: *const OutputInner<T> = self;
        for input in self
            .partners
            .get_mut()
            .drain(..)
            .filter_map(|target| target.input.upgrade())
        {
            input
                .partners
                .lock()
                .retain(|partner| !ptr::eq(partner.as_ptr(), this));
            tracing::debug!(
                output = %self.core.address(),
                input = %input.core.address(),
                "disconnected output on drop"
            );
        }
    }
}

/// Output connector owned by a node.
///
/// Supports fan-out: one output can connect to many inputs, and every sent
/// value is cloned onto each input's queue in connection order. Clones are
/// shallow: they share the partner list.
pub struct OutputConnector<T: ConnectorValue> {
    pub(super) inner: Arc<OutputInner<T>>,
}

impl<T: ConnectorValue> Clone for OutputConnector<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ConnectorValue> PartialEq for OutputConnector<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: ConnectorValue> Eq for OutputConnector<T> {}

impl<T: ConnectorValue> Default for OutputConnector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ConnectorValue> OutputConnector<T> {
    /// Create an output with a generated name and the default config.
    pub fn new() -> Self {
        Self::from_parts(None, OutputConfig::default(), None)
    }

    /// Create an output with the default config.
    pub fn named(name: &str) -> Self {
        Self::from_parts(Some(name.to_string()), OutputConfig::default(), None)
    }

    pub fn builder() -> OutputConnectorBuilder<T> {
        OutputConnectorBuilder::default()
    }

    fn from_parts(
        name: Option<String>,
        config: OutputConfig,
        parent: Option<Weak<dyn Node>>,
    ) -> Self {
        Self {
            inner: Arc::new(OutputInner {
                core: ConnectorCore::new(ConnectorDirection::Output, name, parent),
                config,
                partners: Mutex::new(Vec::new()),
            }),
        }
    }

    pub(super) fn from_inner(inner: Arc<OutputInner<T>>) -> Self {
        Self { inner }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.inner.config
    }

    /// Snapshot of the connected inputs, in connection order.
    pub fn partners(&self) -> Vec<InputConnector<T>> {
        self.inner
            .partners
            .lock()
            .iter()
            .filter_map(|target| target.input.upgrade())
            .map(InputConnector::from_inner)
            .collect()
    }

    /// Link this output to `input` and register the input's queue as a
    /// delivery target.
    pub fn connect(&self, input: &InputConnector<T>) -> Result<()> {
        wiring::connect(&input.inner, &self.inner)
    }

    pub fn disconnect(&self, input: &InputConnector<T>) -> Result<()> {
        wiring::disconnect(&input.inner, &self.inner)
    }

    /// Disconnect every partner. Returns how many links were removed.
    pub fn disconnect_all(&self) -> usize {
        self.partners()
            .iter()
            .filter(|input| wiring::disconnect(&input.inner, &self.inner).is_ok())
            .count()
    }

    /// Enqueue `value` onto every connected input, in partner order.
    ///
    /// The partner list is snapshotted first and the lock released, so a
    /// blocking delivery (`on_full: block`) never stalls wiring changes, and a
    /// wiring change never affects a delivery already in flight.
    ///
    /// Each delivery is independent: one partner failing does not stop or roll
    /// back delivery to the others. With a single partner its error is
    /// returned as-is; with several, failures are collected into
    /// [`ConnectorError::Delivery`].
    pub fn send(&self, value: T) -> Result<()> {
        let targets: Vec<DeliveryTarget<T>> = self.inner.partners.lock().clone();

        let Some((last, rest)) = targets.split_last() else {
            return self.send_without_partners();
        };

        let mut failures = Vec::new();
        for target in rest {
            if let Err(error) = target.deliver(value.clone()) {
                failures.push(target.failure(error));
            }
        }
        if let Err(error) = last.deliver(value) {
            failures.push(last.failure(error));
        }

        if failures.is_empty() {
            tracing::trace!(output = %self.address(), partners = targets.len(), "sent value");
            return Ok(());
        }

        for failure in &failures {
            if failure.error.is_transient() {
                tracing::debug!(output = %self.address(), partner = %failure.partner, error = %failure.error, "delivery failed");
            } else {
                tracing::warn!(output = %self.address(), partner = %failure.partner, error = %failure.error, "delivery failed");
            }
        }

        if targets.len() == 1 {
            if let Some(failure) = failures.pop() {
                return Err(failure.error);
            }
        }

        Err(ConnectorError::Delivery {
            connector: self.address(),
            delivered: targets.len() - failures.len(),
            failures,
        })
    }

    fn send_without_partners(&self) -> Result<()> {
        match self.inner.config.on_no_partners {
            OnNoPartners::Error => Err(ConnectorError::NoPartners {
                connector: self.address(),
            }),
            OnNoPartners::Drop => {
                tracing::trace!(output = %self.address(), "no partners, dropping value");
                Ok(())
            }
        }
    }
}

impl<T: ConnectorValue> Connector for OutputConnector<T> {
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
            .filter(|target| target.input.strong_count() > 0)
            .count()
    }

    fn address(&self) -> String {
        self.inner.core.address()
    }
}

impl<T: ConnectorValue> fmt::Display for OutputConnector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.core.fmt_display("OutputConnector", f)
    }
}

impl<T: ConnectorValue> fmt::Debug for OutputConnector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputConnector")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("config", &self.inner.config)
            .field("partners", &self.partner_count())
            .finish()
    }
}

/// Builder for [`OutputConnector`].
pub struct OutputConnectorBuilder<T: ConnectorValue> {
    name: Option<String>,
    config: OutputConfig,
    parent: Option<Weak<dyn Node>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ConnectorValue> Default for OutputConnectorBuilder<T> {
    fn default() -> Self {
        Self {
            name: None,
            config: OutputConfig::default(),
            parent: None,
            _marker: PhantomData,
        }
    }
}

impl<T: ConnectorValue> OutputConnectorBuilder<T> {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn config(mut self, config: OutputConfig) -> Self {
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

    pub fn build(self) -> OutputConnector<T> {
        OutputConnector::from_parts(self.name, self.config, self.parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InputConfig, OnFull};

    #[test]
    fn test_send_without_partners_errors_by_default() {
        let output = OutputConnector::<u32>::named("out");
        let err = output.send(1).unwrap_err();
        assert!(matches!(err, ConnectorError::NoPartners { .. }));
    }

    #[test]
    fn test_send_without_partners_drop_policy() {
        let output = OutputConnector::<u32>::builder()
            .name("out")
            .config(OutputConfig::dropping())
            .build();
        assert!(output.send(1).is_ok());
    }

    #[test]
    fn test_delivery_target_records_input_policy() {
        let input = InputConnector::<u32>::builder()
            .name("in")
            .config(InputConfig::bounded(2).with_on_full(OnFull::Error))
            .build()
            .unwrap();
        let target = DeliveryTarget::new(&input.inner, "<detached>.in");
        assert_eq!(target.on_full, OnFull::Error);
        assert_eq!(target.capacity, Some(2));
        assert_eq!(target.address(), "<detached>.in");
    }

    #[test]
    fn test_single_partner_failure_is_not_wrapped() {
        let output = OutputConnector::<u32>::named("out");
        let input = InputConnector::<u32>::builder()
            .name("in")
            .config(InputConfig::bounded(1).with_on_full(OnFull::Error))
            .build()
            .unwrap();
        output.connect(&input).unwrap();

        output.send(1).unwrap();
        let err = output.send(2).unwrap_err();
        assert!(matches!(err, ConnectorError::QueueFull { capacity: 1, .. }));
    }

    #[test]
    fn test_send_to_dropped_queue_reports_partner() {
        let output = OutputConnector::<u32>::named("out");
        let input = InputConnector::<u32>::named("in");
        output.connect(&input).unwrap();

        let target = output.inner.partners.lock()[0].clone();
        drop(input);

        // The input detached itself from the output on drop.
        assert!(!output.is_connected());
        let err = target.deliver(5).unwrap_err();
        match err {
            // Falls back to the address recorded at connect time.
            ConnectorError::PartnerDropped { connector } => {
                assert_eq!(connector, "<detached>.in")
            }
            other => panic!("expected PartnerDropped, got {other}"),
        }
    }

    #[test]
    fn test_failure_names_parent_attached_after_wiring() {
        struct Encoder;

        impl Node for Encoder {
            fn name(&self) -> &str {
                "encoder"
            }
        }

        let output = OutputConnector::<u32>::named("out");
        let input = InputConnector::<u32>::builder()
            .name("frames")
            .config(InputConfig::bounded(1).with_on_full(OnFull::Error))
            .build()
            .unwrap();
        output.connect(&input).unwrap();

        let node = Arc::new(Encoder);
        input.attach(&node).unwrap();

        output.send(1).unwrap();
        match output.send(2).unwrap_err() {
            ConnectorError::QueueFull { connector, .. } => {
                assert_eq!(connector, "encoder.frames")
            }
            other => panic!("expected QueueFull, got {other}"),
        }
    }
}
