//! Single-slot background workers.
//!
//! A `WorkerSlot` runs at most one job at a time on its own thread. The job's
//! result comes back over an `mpsc` channel as one terminal message; a worker
//! that dies without sending (panic) is reported as a failure.

use std::fmt;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::error::{Result, SessionError};

/// Class of background operation. One slot per class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Persist,
    VoiceCapture,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationKind::Persist => "send to storage",
            OperationKind::VoiceCapture => "voice capture",
        })
    }
}

/// Terminal result of a job; errors are already display strings.
pub type Outcome<T> = std::result::Result<T, String>;

const LOST_WORKER: &str = "worker stopped without reporting a result";

struct InFlight<T> {
    rx: Receiver<Outcome<T>>,
    handle: JoinHandle<()>,
}

pub struct WorkerSlot<T> {
    kind: OperationKind,
    inflight: Option<InFlight<T>>,
}

impl<T> fmt::Debug for WorkerSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerSlot")
            .field("kind", &self.kind)
            .field("busy", &self.is_busy())
            .finish()
    }
}

impl<T> WorkerSlot<T> {
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            inflight: None,
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Occupied from `start` until the result has been collected.
    pub fn is_busy(&self) -> bool {
        self.inflight.is_some()
    }
}

impl<T: Send + 'static> WorkerSlot<T> {
    /// Run `job` on a fresh thread. Refused with `Busy` while occupied.
    pub fn start<F>(&mut self, job: F) -> Result<()>
    where
        F: FnOnce() -> Outcome<T> + Send + 'static,
    {
        if self.is_busy() {
            return Err(SessionError::Busy(self.kind));
        }

        let (tx, rx) = mpsc::channel();
        let kind = self.kind;
        let handle = thread::Builder::new()
            .name(format!("recsift-{kind:?}").to_lowercase())
            .spawn(move || {
                tracing::debug!(%kind, "worker started");
                let outcome = job();
                tracing::debug!(%kind, ok = outcome.is_ok(), "worker finished");
                // receiver gone means the session was dropped
                let _ = tx.send(outcome);
            })
            .map_err(|source| SessionError::Spawn { kind, source })?;

        self.inflight = Some(InFlight { rx, handle });
        Ok(())
    }

    /// Collect the result if the job has finished. Never blocks.
    pub fn poll(&mut self) -> Option<Outcome<T>> {
        let inflight = self.inflight.as_ref()?;
        let outcome = match inflight.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(LOST_WORKER.to_string()),
        };
        self.finish();
        Some(outcome)
    }

    /// Block until the job finishes. `None` when nothing is running.
    pub fn wait(&mut self) -> Option<Outcome<T>> {
        let inflight = self.inflight.as_ref()?;
        let outcome = inflight
            .rx
            .recv()
            .unwrap_or_else(|_| Err(LOST_WORKER.to_string()));
        self.finish();
        Some(outcome)
    }

    fn finish(&mut self) {
        if let Some(inflight) = self.inflight.take() {
            if inflight.handle.join().is_err() {
                tracing::warn!(kind = %self.kind, "worker panicked");
            }
        }
    }
}
