//! Shared helpers for pipelink integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use pipelink::Node;
use tracing_subscriber::EnvFilter;

/// Route connector logs to the test writer. Set `RUST_LOG=pipelink=trace` to
/// see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Minimal node that only carries a name.
pub struct TestNode {
    name: String,
}

impl TestNode {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
        })
    }
}

impl Node for TestNode {
    fn name(&self) -> &str {
        &self.name
    }
}
