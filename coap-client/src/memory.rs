//! In-process loopback transport
//!
//! `MemoryTransport` stands in for a gateway device resource. Reads are
//! answered from a held JSON document on a freshly spawned thread, so callers
//! see the same asynchronous delivery as with a real CoAP client. Writes are
//! recorded and merged into the held document, which makes a subsequent read
//! reflect them.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::{CoapError, CoapTransport, ResponseSink};

#[derive(Debug, Default)]
struct Inner {
    document: Mutex<Value>,
    writes: Mutex<Vec<String>>,
    reads: AtomicUsize,
    failure: Mutex<Option<String>>,
}

/// Loopback transport backed by an in-memory device document
///
/// Clones share the same document and write log.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    inner: Arc<Inner>,
}

impl MemoryTransport {
    /// Create a transport answering reads with `document`
    pub fn new(document: Value) -> Self {
        let transport = Self::default();
        *transport.inner.document.lock() = document;
        transport
    }

    /// Replace the held document
    pub fn set_document(&self, document: Value) {
        *self.inner.document.lock() = document;
    }

    /// Snapshot of the held document
    pub fn document(&self) -> Value {
        self.inner.document.lock().clone()
    }

    /// Every payload passed to `set`, in call order
    pub fn writes(&self) -> Vec<String> {
        self.inner.writes.lock().clone()
    }

    /// Number of `async_get` calls seen so far
    pub fn read_count(&self) -> usize {
        self.inner.reads.load(Ordering::SeqCst)
    }

    /// Make the next read fail with a network error
    pub fn fail_next_read(&self, message: impl Into<String>) {
        *self.inner.failure.lock() = Some(message.into());
    }
}

impl CoapTransport for MemoryTransport {
    fn async_get(&self, sink: ResponseSink) {
        self.inner.reads.fetch_add(1, Ordering::SeqCst);

        let response = match self.inner.failure.lock().take() {
            Some(message) => Err(CoapError::Network(message)),
            None => Ok(self.inner.document.lock().clone()),
        };

        thread::spawn(move || sink.deliver(response));
    }

    fn set(&self, payload: String) {
        tracing::debug!("Memory transport received write: {}", payload);

        match serde_json::from_str::<Value>(&payload) {
            Ok(write) => merge_write(&mut self.inner.document.lock(), write),
            Err(e) => tracing::warn!("Memory transport ignoring unparsable write: {}", e),
        }

        self.inner.writes.lock().push(payload);
    }
}

/// Merge a written document into the held one
///
/// Device-type entries (`{"15025": [{...}]}`) are merged attribute by
/// attribute; any other top-level key replaces the held value.
fn merge_write(document: &mut Value, write: Value) {
    let Value::Object(source) = write else {
        return;
    };

    if !document.is_object() {
        *document = Value::Object(Map::new());
    }
    let Some(target) = document.as_object_mut() else {
        return;
    };

    for (key, incoming) in source {
        let incoming_attributes = incoming.get(0).and_then(Value::as_object).cloned();

        if let (Some(attributes), Some(current)) = (
            incoming_attributes.as_ref(),
            target
                .get_mut(&key)
                .and_then(|entry| entry.get_mut(0))
                .and_then(Value::as_object_mut),
        ) {
            for (code, value) in attributes {
                current.insert(code.clone(), value.clone());
            }
            continue;
        }

        target.insert(key, incoming);
    }
}
