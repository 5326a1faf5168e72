//! Connector Data Flow Integration Tests
//!
//! Verifies fan-out delivery, queue-full and no-partner policies, partial
//! delivery failures, receive modes, and backpressure across threads.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use common::{init_tracing, TestNode};
use pipelink::prelude::*;

fn strict_input(name: &str, capacity: usize) -> InputConnector<u32> {
    InputConnector::builder()
        .name(name)
        .config(InputConfig::bounded(capacity).with_on_full(OnFull::Error))
        .build()
        .unwrap()
}

// =============================================================================
// Fan-out
// =============================================================================

#[test]
fn test_fan_out_delivers_copy_to_each_input() {
    init_tracing();

    let output = OutputConnector::<String>::named("out");
    let a = InputConnector::<String>::named("a");
    let b = InputConnector::<String>::named("b");
    output.connect(&a).unwrap();
    output.connect(&b).unwrap();

    output.send("frame".to_string()).unwrap();

    assert_eq!(a.try_receive().unwrap(), "frame");
    assert_eq!(b.try_receive().unwrap(), "frame");
    assert!(!a.has_data());
    assert!(!b.has_data());
}

#[test]
fn test_sequence_arrives_in_order_on_every_input() {
    init_tracing();

    let output = OutputConnector::<u32>::named("out");
    let inputs: Vec<_> = (0..3)
        .map(|i| {
            InputConnector::<u32>::builder()
                .name(format!("in{i}"))
                .config(InputConfig::bounded(4))
                .build()
                .unwrap()
        })
        .collect();
    for input in &inputs {
        output.connect(input).unwrap();
    }

    // Capacity 4 with 7 values: drain as we go so blocking sends never stall.
    let mut received = vec![Vec::new(); inputs.len()];
    for value in 0..7 {
        output.send(value).unwrap();
        for (input, seen) in inputs.iter().zip(received.iter_mut()) {
            if input.pending() == 4 {
                seen.push(input.try_receive().unwrap());
            }
        }
    }
    for (input, seen) in inputs.iter().zip(received.iter_mut()) {
        while let Ok(value) = input.try_receive() {
            seen.push(value);
        }
    }

    for seen in received {
        assert_eq!(seen, (0..7).collect::<Vec<_>>());
    }
}

#[test]
fn test_values_from_several_outputs_interleave_fifo() {
    init_tracing();

    let first = OutputConnector::<u32>::named("first");
    let second = OutputConnector::<u32>::named("second");
    let input = InputConnector::<u32>::named("in");
    first.connect(&input).unwrap();
    second.connect(&input).unwrap();

    first.send(1).unwrap();
    second.send(2).unwrap();
    first.send(3).unwrap();

    let drained: Vec<_> = std::iter::from_fn(|| input.try_receive().ok()).collect();
    assert_eq!(drained, [1, 2, 3]);
}

// =============================================================================
// Send policies
// =============================================================================

#[test]
fn test_queue_full_then_recovers_after_drain() {
    init_tracing();

    let output = OutputConnector::<u32>::named("out");
    let input = strict_input("in", 1);
    output.connect(&input).unwrap();

    output.send(1).unwrap();
    let err = output.send(2).unwrap_err();
    match &err {
        ConnectorError::QueueFull {
            connector,
            capacity,
        } => {
            assert_eq!(connector, "<detached>.in");
            assert_eq!(*capacity, 1);
        }
        other => panic!("expected QueueFull, got {other}"),
    }
    assert!(err.is_transient());

    // The rejected value was not enqueued.
    assert_eq!(input.try_receive().unwrap(), 1);
    assert!(!input.has_data());

    output.send(3).unwrap();
    assert_eq!(input.try_receive().unwrap(), 3);
}

#[test]
fn test_no_partners_policies() {
    init_tracing();

    let strict = OutputConnector::<u32>::named("strict");
    let err = strict.send(1).unwrap_err();
    assert!(matches!(err, ConnectorError::NoPartners { .. }));

    let lenient = OutputConnector::<u32>::builder()
        .name("lenient")
        .config(OutputConfig::dropping())
        .build();
    lenient.send(1).unwrap();

    // Connecting later does not replay dropped values.
    let input = InputConnector::<u32>::named("in");
    lenient.connect(&input).unwrap();
    assert!(!input.has_data());
}

#[test]
fn test_partial_failure_delivers_to_healthy_partners() {
    init_tracing();

    let output = OutputConnector::<u32>::named("out");
    let full_a = strict_input("full_a", 1);
    let healthy = InputConnector::<u32>::named("healthy");
    let full_b = strict_input("full_b", 1);
    output.connect(&full_a).unwrap();
    output.connect(&healthy).unwrap();
    output.connect(&full_b).unwrap();

    output.send(1).unwrap();
    let err = output.send(2).unwrap_err();

    match &err {
        ConnectorError::Delivery {
            failures,
            delivered,
            ..
        } => {
            assert_eq!(*delivered, 1);
            let partners: Vec<_> = failures.iter().map(|f| f.partner.as_str()).collect();
            assert_eq!(partners, ["<detached>.full_a", "<detached>.full_b"]);
            assert!(failures
                .iter()
                .all(|f| matches!(f.error, ConnectorError::QueueFull { .. })));
        }
        other => panic!("expected Delivery, got {other}"),
    }
    assert!(err.is_transient());

    // No rollback: the healthy input holds both values.
    assert_eq!(healthy.try_receive().unwrap(), 1);
    assert_eq!(healthy.try_receive().unwrap(), 2);
    assert_eq!(full_a.pending(), 1);
    assert_eq!(full_b.pending(), 1);
}

#[test]
fn test_delivery_error_names_parent_nodes() {
    init_tracing();

    let node = TestNode::new("encoder");
    let output = OutputConnector::<u32>::named("out");
    let input = InputConnector::<u32>::builder()
        .name("frames")
        .config(InputConfig::bounded(1).with_on_full(OnFull::Error))
        .parent(&node)
        .build()
        .unwrap();
    output.connect(&input).unwrap();

    output.send(1).unwrap();
    let err = output.send(2).unwrap_err();
    assert!(err.to_string().contains("encoder.frames"));
}

#[test]
fn test_failures_name_parents_attached_after_wiring() {
    init_tracing();

    let output = OutputConnector::<u32>::named("out");
    let left = strict_input("frames", 1);
    let right = strict_input("frames", 1);
    output.connect(&left).unwrap();
    output.connect(&right).unwrap();

    // Same connector name on two nodes, both registered after wiring.
    let encoder = TestNode::new("encoder");
    let preview = TestNode::new("preview");
    left.attach(&encoder).unwrap();
    right.attach(&preview).unwrap();

    output.send(1).unwrap();
    match output.send(2).unwrap_err() {
        ConnectorError::Delivery { failures, .. } => {
            let partners: Vec<_> = failures.iter().map(|f| f.partner.as_str()).collect();
            assert_eq!(partners, ["encoder.frames", "preview.frames"]);
            for failure in &failures {
                match &failure.error {
                    ConnectorError::QueueFull { connector, .. } => {
                        assert_eq!(connector, &failure.partner)
                    }
                    other => panic!("expected QueueFull, got {other}"),
                }
            }
        }
        other => panic!("expected Delivery, got {other}"),
    }
}

// =============================================================================
// Receive
// =============================================================================

#[test]
fn test_non_blocking_receive_ignores_timeout() {
    init_tracing();

    let input = InputConnector::<u32>::named("in");
    let start = Instant::now();
    let err = input
        .receive(false, Some(Duration::from_secs(5)))
        .unwrap_err();

    assert!(matches!(err, ConnectorError::WouldBlock { .. }));
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_receive_timeout_waits_at_least_timeout() {
    init_tracing();

    let input = InputConnector::<u32>::named("in");
    let timeout = Duration::from_millis(100);

    let start = Instant::now();
    let err = input.receive(true, Some(timeout)).unwrap_err();
    assert!(start.elapsed() >= timeout);

    match err {
        ConnectorError::Timeout { timeout: t, .. } => assert_eq!(t, timeout),
        other => panic!("expected Timeout, got {other}"),
    }

    // Retry succeeds once a value arrives.
    let output = OutputConnector::<u32>::named("out");
    output.connect(&input).unwrap();
    output.send(4).unwrap();
    assert_eq!(input.receive_timeout(timeout).unwrap(), 4);
}

#[test]
fn test_blocking_receive_wakes_on_send() {
    init_tracing();

    let output = OutputConnector::<u32>::named("out");
    let input = InputConnector::<u32>::named("in");
    output.connect(&input).unwrap();

    let receiver = {
        let input = input.clone();
        thread::spawn(move || input.receive(true, None))
    };

    thread::sleep(Duration::from_millis(50));
    output.send(42).unwrap();

    assert_eq!(receiver.join().unwrap().unwrap(), 42);
}

#[test]
fn test_unbounded_input_never_fills() {
    init_tracing();

    let output = OutputConnector::<u32>::named("out");
    let input = InputConnector::<u32>::builder()
        .name("in")
        .config(InputConfig::unbounded().with_on_full(OnFull::Error))
        .build()
        .unwrap();
    output.connect(&input).unwrap();

    for value in 0..1000 {
        output.send(value).unwrap();
    }
    assert_eq!(input.capacity(), None);
    assert_eq!(input.pending(), 1000);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_blocking_send_waits_for_consumer() {
    init_tracing();

    let output = OutputConnector::<u32>::named("out");
    let input = InputConnector::<u32>::builder()
        .name("in")
        .config(InputConfig::bounded(1))
        .build()
        .unwrap();
    output.connect(&input).unwrap();
    output.send(1).unwrap();

    let second_sent = Arc::new(AtomicBool::new(false));
    let producer = {
        let output = output.clone();
        let second_sent = Arc::clone(&second_sent);
        thread::spawn(move || {
            output.send(2).unwrap();
            second_sent.store(true, Ordering::SeqCst);
        })
    };

    thread::sleep(Duration::from_millis(100));
    assert!(!second_sent.load(Ordering::SeqCst));

    // Wiring changes are not blocked by the stalled send.
    let spare = InputConnector::<u32>::named("spare");
    output.connect(&spare).unwrap();

    assert_eq!(input.try_receive().unwrap(), 1);
    producer.join().unwrap();
    assert!(second_sent.load(Ordering::SeqCst));
    assert_eq!(input.try_receive().unwrap(), 2);

    // The spare joined after the stalled send took its snapshot.
    assert!(!spare.has_data());
}

#[test]
fn test_multiple_producers_keep_per_producer_order() {
    init_tracing();

    const PER_PRODUCER: u32 = 500;

    let input = InputConnector::<(usize, u32)>::builder()
        .name("in")
        .config(InputConfig::bounded(8))
        .build()
        .unwrap();
    let outputs: Vec<_> = (0..4)
        .map(|i| {
            let output = OutputConnector::<(usize, u32)>::named(&format!("out{i}"));
            output.connect(&input).unwrap();
            output
        })
        .collect();

    let producers: Vec<_> = outputs
        .into_iter()
        .enumerate()
        .map(|(id, output)| {
            thread::spawn(move || {
                for seq in 0..PER_PRODUCER {
                    output.send((id, seq)).unwrap();
                }
            })
        })
        .collect();

    let mut next = [0u32; 4];
    for _ in 0..(PER_PRODUCER as usize * next.len()) {
        let (id, seq) = input.receive_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(seq, next[id], "producer {id} out of order");
        next[id] += 1;
    }

    for producer in producers {
        producer.join().unwrap();
    }
    assert_eq!(next, [PER_PRODUCER; 4]);
    assert!(!input.has_data());
}
