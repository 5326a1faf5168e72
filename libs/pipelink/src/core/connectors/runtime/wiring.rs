// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Symmetric partner-list updates for an input/output pair.
//!
//! Both lists are locked for the whole structural change, so no reader ever
//! sees one side linked and the other not. Addresses are resolved before
//! locking: resolving one calls into the parent node, and a parent torn down
//! mid-call drops its connectors, which take these same locks.

use std::ptr;
use std::sync::{Arc, Weak};

use parking_lot::MutexGuard;

use super::input_connector::InputInner;
use super::output_connector::{DeliveryTarget, OutputInner};
use crate::core::connectors::ConnectorValue;
use crate::core::{ConnectorError, Result};

type InputPartners<'a, T> = MutexGuard<'a, Vec<Weak<OutputInner<T>>>>;
type OutputPartners<'a, T> = MutexGuard<'a, Vec<DeliveryTarget<T>>>;

/// Lock both partner lists in address order, so concurrent wiring of
/// overlapping pairs cannot deadlock.
fn lock_pair<'a, T: ConnectorValue>(
    input: &'a InputInner<T>,
    output: &'a OutputInner<T>,
) -> (InputPartners<'a, T>, OutputPartners<'a, T>) {
    let input_addr = input as *const InputInner<T> as usize;
    let output_addr = output as *const OutputInner<T> as usize;

    if input_addr < output_addr {
        let input_partners = input.partners.lock();
        (input_partners, output.partners.lock())
    } else {
        let output_partners = output.partners.lock();
        (input.partners.lock(), output_partners)
    }
}

fn position_of_output<T: ConnectorValue>(
    input_partners: &[Weak<OutputInner<T>>],
    output: &Arc<OutputInner<T>>,
) -> Option<usize> {
    input_partners
        .iter()
        .position(|partner| ptr::eq(partner.as_ptr(), Arc::as_ptr(output)))
}

fn position_of_input<T: ConnectorValue>(
    output_partners: &[DeliveryTarget<T>],
    input: &Arc<InputInner<T>>,
) -> Option<usize> {
    output_partners
        .iter()
        .position(|target| ptr::eq(target.input.as_ptr(), Arc::as_ptr(input)))
}

/// Link `output` to `input`: each joins the other's partner list, and the
/// input's queue becomes a delivery target of the output.
pub(super) fn connect<T: ConnectorValue>(
    input: &Arc<InputInner<T>>,
    output: &Arc<OutputInner<T>>,
) -> Result<()> {
    let output_address = output.core.address();
    let input_address = input.core.address();
    let target = DeliveryTarget::new(input, &input_address);

    {
        let (mut input_partners, mut output_partners) = lock_pair(input, output);

        if position_of_output(&input_partners, output).is_some() {
            return Err(ConnectorError::AlreadyConnected {
                connector: output_address,
                partner: input_address,
            });
        }
        debug_assert!(position_of_input(&output_partners, input).is_none());

        input_partners.push(Arc::downgrade(output));
        output_partners.push(target);
    }

    tracing::debug!(output = %output_address, input = %input_address, "connected");
    Ok(())
}

/// Remove the link between `output` and `input` from both partner lists,
/// preserving the order of the remaining partners.
pub(super) fn disconnect<T: ConnectorValue>(
    input: &Arc<InputInner<T>>,
    output: &Arc<OutputInner<T>>,
) -> Result<()> {
    let output_address = output.core.address();
    let input_address = input.core.address();

    {
        let (mut input_partners, mut output_partners) = lock_pair(input, output);

        let Some(index) = position_of_output(&input_partners, output) else {
            return Err(ConnectorError::NotConnected {
                connector: output_address,
                partner: input_address,
            });
        };
        input_partners.remove(index);

        if let Some(index) = position_of_input(&output_partners, input) {
            output_partners.remove(index);
        }
    }

    tracing::debug!(output = %output_address, input = %input_address, "disconnected");
    Ok(())
}
