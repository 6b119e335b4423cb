//! Mock gesture sink for unit testing.
//!
//! Records every [`DispatchRequest`] and issues a fresh handle per
//! stroke; tests drive completion and cancellation themselves through
//! the engine's report methods.

use std::sync::Mutex;

use touchbridge_core::{new_dispatch_handle, DispatchHandle, DispatchRequest};

use crate::application::dispatch_strokes::{GestureSink, SinkError};

/// A mock implementation of [`GestureSink`] that records dispatched strokes.
pub struct MockGestureSink {
    requests: Mutex<Vec<DispatchRequest>>,
    handles: Mutex<Vec<DispatchHandle>>,
    should_fail: Mutex<bool>,
}

impl MockGestureSink {
    /// Creates a new mock sink.
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            handles: Mutex::new(Vec::new()),
            should_fail: Mutex::new(false),
        }
    }

    /// Every request dispatched so far, in order.
    pub fn requests(&self) -> Vec<DispatchRequest> {
        self.requests.lock().expect("lock poisoned").clone()
    }

    /// Number of requests dispatched so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("lock poisoned").len()
    }

    /// Every handle issued so far, in dispatch order.
    pub fn handles(&self) -> Vec<DispatchHandle> {
        self.handles.lock().expect("lock poisoned").clone()
    }

    /// The handle of the most recently dispatched stroke.
    ///
    /// Panics if nothing has been dispatched yet.
    pub fn last_handle(&self) -> DispatchHandle {
        *self
            .handles
            .lock()
            .expect("lock poisoned")
            .last()
            .expect("no stroke was dispatched")
    }

    /// Makes subsequent dispatches fail with [`SinkError::Unavailable`].
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock().expect("lock poisoned") = fail;
    }
}

impl Default for MockGestureSink {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureSink for MockGestureSink {
    fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchHandle, SinkError> {
        if *self.should_fail.lock().expect("lock poisoned") {
            return Err(SinkError::Unavailable {
                reason: "mock sink set to fail".to_string(),
            });
        }
        self.requests.lock().expect("lock poisoned").push(*request);
        let handle = new_dispatch_handle();
        self.handles.lock().expect("lock poisoned").push(handle);
        Ok(handle)
    }
}
