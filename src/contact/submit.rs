use gloo_timers::callback::Timeout;
use thiserror::Error;

use super::validation::ContactFields;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("submission service unavailable")]
    Unavailable,
}

pub type SubmitCallback = Box<dyn FnOnce(Result<(), SubmitError>)>;

/// Work handed off by a [`Submitter`]. Dropping it cancels the completion callback.
pub struct PendingSubmission {
    _timeout: Option<Timeout>,
}

impl PendingSubmission {
    pub fn from_timeout(timeout: Timeout) -> Self {
        Self {
            _timeout: Some(timeout),
        }
    }

    /// For submitters that already ran `on_done` before returning.
    pub fn finished() -> Self {
        Self { _timeout: None }
    }

    pub fn cancel(self) {
        drop(self);
    }
}

/// Sends validated contact fields somewhere and reports back exactly once via `on_done`.
pub trait Submitter {
    fn submit(&self, fields: ContactFields, on_done: SubmitCallback) -> PendingSubmission;
}

/// Stands in for a backend: always succeeds after a fixed latency.
pub struct SimulatedSubmitter {
    latency_ms: u32,
}

impl SimulatedSubmitter {
    pub fn new(latency_ms: u32) -> Self {
        Self { latency_ms }
    }
}

impl Submitter for SimulatedSubmitter {
    fn submit(&self, fields: ContactFields, on_done: SubmitCallback) -> PendingSubmission {
        log::info!(
            "Simulating contact submission ({} chars) with {}ms latency",
            fields.message.len(),
            self.latency_ms
        );
        PendingSubmission::from_timeout(Timeout::new(self.latency_ms, move || on_done(Ok(()))))
    }
}
