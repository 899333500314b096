//! Scripted engine for exercising the bridge and the tools in tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use gateway_primitives::{MacroExecutionResult, MacroRequest};
use serde_json::Value;

use crate::engine::{EngineError, EngineResult, MacroEngine};

#[derive(Debug, Clone)]
enum Script {
    Complete(Vec<Value>),
    Fail(Vec<Value>, String),
    Fault(String),
    Panic(String),
}

/// Engine that replays a fixed outcome and records what it was asked to do.
#[derive(Debug)]
pub struct ScriptedEngine {
    script: Script,
    elapsed: Duration,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requests: Mutex<Vec<MacroRequest>>,
}

impl ScriptedEngine {
    fn new(script: Script) -> Self {
        Self {
            script,
            elapsed: Duration::ZERO,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Reports success with the given per-command outcomes.
    #[must_use]
    pub fn completing(results: Vec<Value>) -> Self {
        Self::new(Script::Complete(results))
    }

    /// Reports a partial failure.
    #[must_use]
    pub fn failing(results: Vec<Value>, message: impl Into<String>) -> Self {
        Self::new(Script::Fail(results, message.into()))
    }

    /// Raises [`EngineError::Fault`].
    #[must_use]
    pub fn faulting(message: impl Into<String>) -> Self {
        Self::new(Script::Fault(message.into()))
    }

    /// Panics inside `execute`.
    #[must_use]
    pub fn panicking(message: impl Into<String>) -> Self {
        Self::new(Script::Panic(message.into()))
    }

    /// Sets the execution time reported in results.
    #[must_use]
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Sleeps for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of `execute` invocations so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of overlapping `execute` invocations observed.
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Requests received, in arrival order.
    ///
    /// # Panics
    ///
    /// Panics if the request log is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<MacroRequest> {
        self.requests.lock().expect("request log poisoned").clone()
    }
}

#[async_trait]
impl MacroEngine for ScriptedEngine {
    async fn execute(&self, request: MacroRequest) -> EngineResult<MacroExecutionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(request);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match &self.script {
            Script::Complete(results) => Ok(MacroExecutionResult::completed(
                self.elapsed,
                results.clone(),
            )),
            Script::Fail(results, message) => Ok(MacroExecutionResult::failed(
                self.elapsed,
                results.clone(),
                message.clone(),
            )),
            Script::Fault(message) => Err(EngineError::fault(message.clone())),
            Script::Panic(message) => panic!("{message}"),
        }
    }
}
