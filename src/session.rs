// src/session.rs
//! Evaluation session: owns the current result and the
//! `Idle -> Evaluating -> {Completed, Failed}` lifecycle.
//!
//! - Validation failures never enter `Evaluating` and leave phase/result alone.
//! - Only one evaluation may be in flight; overlapping calls get `InFlight`.
//! - An injected latency (cosmetic "thinking" delay) may run before scoring.
//!   `cancel` during that window moves the session to `Failed` and the
//!   cancelled run never publishes its result.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Notify;
use tracing::{debug, info};

use crate::evaluation::{score_texts, EvaluationError, EvaluationRequest, EvaluationResult};
use crate::metrics as eval_metrics;
use crate::telemetry::{anon_hash, dev_log_evaluation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Evaluating,
    Completed,
    Failed,
}

/// Read-only view of the session for callers.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub has_result: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<EvaluationError>,
}

#[derive(Debug)]
struct State {
    phase: Phase,
    /// Bumped on every accepted run; a run only publishes if its ticket is current.
    ticket: u64,
    current: Option<EvaluationResult>,
    completed_at: Option<DateTime<Utc>>,
    last_error: Option<EvaluationError>,
}

#[derive(Debug)]
pub struct EvaluationSession {
    state: Mutex<State>,
    cancel: Notify,
    latency: Duration,
}

impl Default for EvaluationSession {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl EvaluationSession {
    /// `latency` is slept before scoring; `Duration::ZERO` skips it.
    pub fn new(latency: Duration) -> Self {
        Self {
            state: Mutex::new(State {
                phase: Phase::Idle,
                ticket: 0,
                current: None,
                completed_at: None,
                last_error: None,
            }),
            cancel: Notify::new(),
            latency,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // State is always left consistent between statements, so a poisoned
        // guard is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// Clone of the most recent completed result.
    pub fn current(&self) -> Option<EvaluationResult> {
        self.lock().current.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let st = self.lock();
        SessionSnapshot {
            phase: st.phase,
            has_result: st.current.is_some(),
            completed_at: st.completed_at,
            last_error: st.last_error,
        }
    }

    /// Validate and move to `Evaluating`. Returns the run's ticket.
    fn begin(&self, req: &EvaluationRequest) -> Result<u64, EvaluationError> {
        let mut st = self.lock();
        if st.phase == Phase::Evaluating {
            return Err(EvaluationError::InFlight);
        }
        req.validate()?;
        st.phase = Phase::Evaluating;
        st.ticket = st.ticket.wrapping_add(1);
        Ok(st.ticket)
    }

    /// Publish `result` if run `ticket` is still the live one.
    fn complete(&self, ticket: u64, result: EvaluationResult) -> Result<(), EvaluationError> {
        let mut st = self.lock();
        if st.phase != Phase::Evaluating || st.ticket != ticket {
            return Err(EvaluationError::Cancelled);
        }
        st.phase = Phase::Completed;
        st.current = Some(result);
        st.completed_at = Some(Utc::now());
        st.last_error = None;
        Ok(())
    }

    /// Move run `ticket` to `Failed` if it is still the live one.
    fn abandon(&self, ticket: u64) {
        let mut st = self.lock();
        if st.phase == Phase::Evaluating && st.ticket == ticket {
            st.phase = Phase::Failed;
            st.last_error = Some(EvaluationError::Cancelled);
            drop(st);
            eval_metrics::record_rejection(&EvaluationError::Cancelled);
            info!(target: "evaluation", "in-flight evaluation dropped by caller");
        }
    }

    /// Cancel an in-flight run. Returns `false` when nothing was running.
    pub fn cancel(&self) -> bool {
        let mut st = self.lock();
        if st.phase != Phase::Evaluating {
            return false;
        }
        st.phase = Phase::Failed;
        st.last_error = Some(EvaluationError::Cancelled);
        drop(st);
        self.cancel.notify_waiters();
        info!(target: "evaluation", "in-flight evaluation cancelled");
        true
    }

    /// Run one evaluation through the full lifecycle.
    ///
    /// Dropping the returned future mid-run (e.g. the client disconnected)
    /// leaves the session in `Failed`, never stuck in `Evaluating`.
    pub async fn run(&self, req: EvaluationRequest) -> Result<EvaluationResult, EvaluationError> {
        // Enabled before `begin` so a cancel right after it still wakes us.
        let cancelled = self.cancel.notified();
        tokio::pin!(cancelled);
        cancelled.as_mut().enable();

        let ticket = match self.begin(&req) {
            Ok(t) => t,
            Err(e) => {
                eval_metrics::record_rejection(&e);
                debug!(target: "evaluation", kind = e.kind(), "evaluation rejected");
                return Err(e);
            }
        };
        let guard = RunGuard {
            session: self,
            ticket,
            armed: true,
        };

        if !self.latency.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(self.latency) => {}
                _ = &mut cancelled => {
                    guard.disarm();
                    eval_metrics::record_rejection(&EvaluationError::Cancelled);
                    return Err(EvaluationError::Cancelled);
                }
            }
        }

        let result = score_texts(&req.hypothesis, &req.reference);
        let published = self.complete(ticket, result.clone());
        guard.disarm();
        if let Err(e) = published {
            eval_metrics::record_rejection(&e);
            return Err(e);
        }

        let a = &result.analysis;
        info!(
            target: "evaluation",
            id = %anon_hash(&format!("{}\u{1f}{}", req.hypothesis, req.reference)),
            hypothesis_concepts = a.hypothesis_concepts.len(),
            reference_concepts = a.reference_concepts.len(),
            matches = a.matching_concepts.len(),
            conflicts = a.conflicting_concepts.len(),
            fidelity = result.fidelity_score,
            risk = %result.hallucination_risk,
            "evaluation completed"
        );
        dev_log_evaluation(&req, &result);
        eval_metrics::record_evaluation(&result);

        Ok(result)
    }
}

/// Fails the run it guards unless disarmed before drop.
struct RunGuard<'a> {
    session: &'a EvaluationSession,
    ticket: u64,
    armed: bool,
}

impl RunGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.session.abandon(self.ticket);
        }
    }
}
