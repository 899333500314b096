//! Synchronous facade over the asynchronous macro engine.
//!
//! One worker thread owns a current-thread `tokio` runtime and the engine
//! handle. Callers hand macros to it through a bounded queue and block on a
//! oneshot reply, so at most one macro is in flight against the shared engine
//! and keystrokes from different macros never interleave.

use std::num::NonZeroUsize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::thread;

use futures::FutureExt;
use gateway_primitives::{MacroExecutionResult, MacroRequest, panic_message};
use tokio::runtime::{Builder, Handle, RuntimeFlavor};
use tokio::task;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::engine::{EngineError, EngineResult, MacroEngine};

/// Queue sizing for the execution bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    queue_depth: NonZeroUsize,
}

impl BridgeConfig {
    /// Creates a configuration allowing `queue_depth` macros to wait while one
    /// executes.
    #[must_use]
    pub const fn new(queue_depth: NonZeroUsize) -> Self {
        Self { queue_depth }
    }

    /// Returns the number of queue slots.
    #[must_use]
    pub const fn queue_depth(self) -> NonZeroUsize {
        self.queue_depth
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new(NonZeroUsize::MIN)
    }
}

type Reply = oneshot::Sender<EngineResult<MacroExecutionResult>>;

struct Job {
    request: MacroRequest,
    reply: Reply,
}

/// Process-wide handle to the single execution engine.
///
/// Every call results in exactly one engine invocation. Engine results are
/// returned untouched; engine errors and panics come back as [`EngineError`].
#[derive(Debug)]
pub struct ExecutionBridge {
    sender: mpsc::Sender<Job>,
    config: BridgeConfig,
}

impl ExecutionBridge {
    /// Starts the worker thread that serves `engine`.
    ///
    /// The worker stops once the bridge is dropped and the queue drains.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Startup`] if the runtime or thread cannot be
    /// created.
    pub fn start(engine: Arc<dyn MacroEngine>, config: BridgeConfig) -> EngineResult<Self> {
        let startup = |err: std::io::Error| EngineError::Startup {
            reason: err.to_string(),
        };

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(startup)?;
        let (sender, receiver) = mpsc::channel(config.queue_depth().get());

        thread::Builder::new()
            .name("macro-engine".into())
            .spawn(move || runtime.block_on(serve(engine, receiver)))
            .map_err(startup)?;

        debug!(queue_depth = config.queue_depth().get(), "execution bridge started");
        Ok(Self { sender, config })
    }

    /// Returns the associated configuration.
    #[must_use]
    pub const fn config(&self) -> BridgeConfig {
        self.config
    }

    /// Executes a macro and blocks the calling thread until it resolves.
    ///
    /// Safe to call from any thread. Inside a `tokio` runtime the wait moves to
    /// a scoped helper thread, wrapped in `block_in_place` on multi-thread
    /// runtimes, so the caller's runtime is never stalled by a blocking
    /// primitive it forbids.
    ///
    /// # Errors
    ///
    /// Returns the engine's fault, [`EngineError::Panicked`] if the engine
    /// panicked, and [`EngineError::Closed`] if the worker is gone.
    pub fn execute(&self, request: MacroRequest) -> EngineResult<MacroExecutionResult> {
        let Ok(handle) = Handle::try_current() else {
            return self.wait_for(request);
        };

        let off_runtime = move || {
            thread::scope(|scope| {
                scope
                    .spawn(move || self.wait_for(request))
                    .join()
                    .unwrap_or_else(|payload| {
                        Err(EngineError::Panicked {
                            reason: panic_message(&*payload),
                        })
                    })
            })
        };

        if handle.runtime_flavor() == RuntimeFlavor::MultiThread {
            task::block_in_place(off_runtime)
        } else {
            off_runtime()
        }
    }

    fn wait_for(&self, request: MacroRequest) -> EngineResult<MacroExecutionResult> {
        let (reply, outcome) = oneshot::channel();
        self.sender
            .blocking_send(Job { request, reply })
            .map_err(|_| EngineError::Closed)?;
        outcome.blocking_recv().map_err(|_| EngineError::Closed)?
    }

    /// Executes a macro from asynchronous code.
    ///
    /// # Errors
    ///
    /// Same as [`ExecutionBridge::execute`].
    pub async fn execute_async(&self, request: MacroRequest) -> EngineResult<MacroExecutionResult> {
        let (reply, outcome) = oneshot::channel();
        self.sender
            .send(Job { request, reply })
            .await
            .map_err(|_| EngineError::Closed)?;
        outcome.await.map_err(|_| EngineError::Closed)?
    }
}

async fn serve(engine: Arc<dyn MacroEngine>, mut receiver: mpsc::Receiver<Job>) {
    while let Some(Job { request, reply }) = receiver.recv().await {
        let name = request.name().unwrap_or_default().to_owned();
        let command_count = request.len();

        let outcome = AssertUnwindSafe(engine.execute(request))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                Err(EngineError::Panicked {
                    reason: panic_message(&*payload),
                })
            });

        match &outcome {
            Ok(result) => info!(
                macro_name = %name,
                command_count,
                success = result.success(),
                elapsed_ms = result.execution_time_ms(),
                "macro finished"
            ),
            Err(err) => warn!(macro_name = %name, command_count, error = %err, "macro faulted"),
        }

        if reply.send(outcome).is_err() {
            debug!(macro_name = %name, "caller went away before the macro finished");
        }
    }
    debug!("execution bridge drained");
}
