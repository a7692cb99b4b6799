//! Background execution of container operations.
//!
//! Each operation runs on its own named worker thread. Its outcome is posted to a
//! channel owned by the UI thread and applied only when the UI thread drains it, so UI
//! state is never written from a worker.

use std::any::Any;
use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error};
use rceditor_container::{ContainerError, ResourceContainer};
use thiserror::Error;

/// Called from a worker after it posts a result, typically to request a repaint.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    Create,
    Open,
    Save,
}

impl IoOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            IoOperation::Create => "create",
            IoOperation::Open => "open",
            IoOperation::Save => "save",
        }
    }
}

impl fmt::Display for IoOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value produced by a successful operation.
#[derive(Debug)]
pub enum IoOutput {
    Container(ResourceContainer),
    Saved,
}

/// 背景作業失敗的原因。 / Why a background operation did not complete.
#[derive(Debug, Error)]
pub enum IoFailure {
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error("{operation} stopped unexpectedly: {message}")]
    Panicked {
        operation: IoOperation,
        message: String,
    },
    #[error("failed to start background {operation}: {source}")]
    Spawn {
        operation: IoOperation,
        #[source]
        source: io::Error,
    },
    #[error("{operation} produced no result")]
    MissingResult { operation: IoOperation },
}

/// Outcome of one operation, delivered on the UI thread.
#[derive(Debug)]
pub struct IoCompletion {
    pub operation: IoOperation,
    pub path: PathBuf,
    pub result: Result<IoOutput, IoFailure>,
}

/// 背景 I/O 調度器。 / Runs operations off the UI thread and queues their outcomes.
pub struct IoOrchestrator {
    tx: Sender<IoCompletion>,
    rx: Receiver<IoCompletion>,
    waker: Option<Waker>,
    workers: Vec<JoinHandle<()>>,
    in_flight: usize,
}

impl Default for IoOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl IoOrchestrator {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            waker: None,
            workers: Vec::new(),
            in_flight: 0,
        }
    }

    pub fn with_waker(mut self, waker: Waker) -> Self {
        self.waker = Some(waker);
        self
    }

    pub fn set_waker(&mut self, waker: Waker) {
        self.waker = Some(waker);
    }

    /// Number of operations whose completion has not been drained yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Starts `job` on a worker thread. Exactly one [`IoCompletion`] is queued for every
    /// call, including when the job panics or the thread cannot be spawned.
    pub fn spawn<F>(&mut self, operation: IoOperation, path: PathBuf, job: F)
    where
        F: FnOnce() -> Result<IoOutput, ContainerError> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        let waker = self.waker.clone();
        let worker_path = path.clone();
        debug!(
            "event=io_spawn module=io operation={} path={}",
            operation,
            path.display()
        );

        let spawned = thread::Builder::new()
            .name(format!("rceditor-io-{operation}"))
            .spawn(move || {
                let result = match panic::catch_unwind(AssertUnwindSafe(job)) {
                    Ok(result) => result.map_err(IoFailure::from),
                    Err(payload) => Err(IoFailure::Panicked {
                        operation,
                        message: panic_message(payload.as_ref()),
                    }),
                };
                post(
                    &tx,
                    waker.as_ref(),
                    IoCompletion {
                        operation,
                        path: worker_path,
                        result,
                    },
                );
            });

        match spawned {
            Ok(handle) => self.workers.push(handle),
            Err(source) => self.spawn_failed(operation, path, source),
        }
    }

    /// Queues the completion for an operation whose worker never started.
    fn spawn_failed(&self, operation: IoOperation, path: PathBuf, source: io::Error) {
        error!(
            "event=io_spawn module=io status=error operation={} error={}",
            operation, source
        );
        post(
            &self.tx,
            self.waker.as_ref(),
            IoCompletion {
                operation,
                path,
                result: Err(IoFailure::Spawn { operation, source }),
            },
        );
    }

    /// Returns the next queued completion without blocking.
    pub fn try_next(&mut self) -> Option<IoCompletion> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.try_recv().ok()?;
        self.in_flight -= 1;
        self.workers.retain(|handle| !handle.is_finished());
        Some(completion)
    }

    /// Blocks until every in-flight operation has finished and returns their completions
    /// in arrival order.
    pub fn wait_all(&mut self) -> Vec<IoCompletion> {
        let mut completions = Vec::with_capacity(self.in_flight);
        while self.in_flight > 0 {
            match self.rx.recv() {
                Ok(completion) => {
                    self.in_flight -= 1;
                    completions.push(completion);
                }
                Err(_) => break,
            }
        }
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        completions
    }
}

impl fmt::Debug for IoOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoOrchestrator")
            .field("in_flight", &self.in_flight)
            .field("workers", &self.workers.len())
            .field("has_waker", &self.waker.is_some())
            .finish()
    }
}

/// Sends `completion` and wakes the UI thread so it drains the queue promptly.
fn post(tx: &Sender<IoCompletion>, waker: Option<&Waker>, completion: IoCompletion) {
    // The receiver only disappears when the orchestrator is dropped.
    let _ = tx.send(completion);
    if let Some(waker) = waker {
        waker();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
