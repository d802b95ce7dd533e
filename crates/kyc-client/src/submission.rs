//! Form submission pipeline
//!
//! At most one submit per form is in flight. A trigger that arrives while
//! another submit is running is dropped, not queued.

use crate::client::KycClient;
use kyc_common::{FormState, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Whether a submit is currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Submitting,
}

/// The Idle/Submitting flag of one form
#[derive(Debug, Default)]
pub struct SubmissionGate {
    submitting: AtomicBool,
}

impl SubmissionGate {
    pub fn state(&self) -> SubmissionState {
        if self.submitting.load(Ordering::SeqCst) {
            SubmissionState::Submitting
        } else {
            SubmissionState::Idle
        }
    }

    /// Move to Submitting, or return `None` if already there
    pub fn try_acquire(&self) -> Option<SubmissionGuard<'_>> {
        self.submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| SubmissionGuard { gate: self })
    }
}

/// Holds the gate in Submitting; dropping it returns the gate to Idle
#[derive(Debug)]
pub struct SubmissionGuard<'a> {
    gate: &'a SubmissionGate,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.gate.submitting.store(false, Ordering::SeqCst);
    }
}

/// Result of a submit trigger that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The server accepted the form; carries its JSON reply
    Submitted(Value),

    /// Another submit was already in flight
    Dropped,
}

/// A form bound to its submission endpoint
pub struct FormSession {
    form: Mutex<FormState>,
    gate: SubmissionGate,
    client: KycClient,
}

impl FormSession {
    pub fn new(form: FormState, client: KycClient) -> Self {
        Self {
            form: Mutex::new(form),
            gate: SubmissionGate::default(),
            client,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.gate.state()
    }

    /// Mutate the form in place
    pub async fn edit<R>(&self, f: impl FnOnce(&mut FormState) -> R) -> R {
        let mut form = self.form.lock().await;
        f(&mut form)
    }

    /// Copy of the current form values
    pub async fn snapshot(&self) -> FormState {
        self.form.lock().await.clone()
    }

    /// Validate and send the form
    ///
    /// On success every field is reset. On any failure, validation, transport
    /// or server-reported, the values are left as they were so they can be
    /// corrected. The gate is back to Idle when this returns either way.
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let Some(_guard) = self.gate.try_acquire() else {
            debug!("Submit already in flight, dropping trigger");
            return Ok(SubmitOutcome::Dropped);
        };

        let parts = {
            let form = self.form.lock().await;
            form.validate()?;
            form.payload()
        };

        info!(
            "Submitting {} part(s) to {}",
            parts.len(),
            self.client.register_url()
        );

        match self.client.submit(parts).await {
            Ok(reply) => {
                self.form.lock().await.reset();
                info!("Submission accepted");
                Ok(SubmitOutcome::Submitted(reply))
            }
            Err(e) => {
                warn!("Submission failed: {}", e);
                Err(e)
            }
        }
    }
}
