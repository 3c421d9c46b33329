//! Explicit review-flow state machine and its async driver

use std::sync::Arc;
use tokio::sync::watch;

use crate::client::ReviewClient;
use crate::delivery::DeliveryStrategy;
use crate::error::{Error, Result};
use crate::types::{DocumentPayload, JobSnapshot};

/// Observable state of one review flow.
///
/// Transitions are driven exclusively by `SessionEvent`s, decoupling what a
/// UI shows from the authoritative network result.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Submitting,
    Waiting { job_id: String },
    Ready { snapshot: JobSnapshot },
    TimedOut { job_id: String },
    Failed { message: String },
}

impl SessionState {
    /// Apply one event. Events that make no sense in the current state leave
    /// it unchanged; `Reset` always returns to `Idle`.
    pub fn apply(self, event: SessionEvent) -> SessionState {
        use SessionEvent::*;
        match (self, event) {
            (_, Reset) => SessionState::Idle,
            (SessionState::Idle, SubmitStarted) => SessionState::Submitting,
            (SessionState::Submitting, SubmitAccepted { job_id }) => {
                SessionState::Waiting { job_id }
            }
            (SessionState::Waiting { .. }, ResultReady { snapshot }) => {
                SessionState::Ready { snapshot }
            }
            (SessionState::Waiting { job_id }, TimedOut) => SessionState::TimedOut { job_id },
            (SessionState::Submitting, Failed { message })
            | (SessionState::Waiting { .. }, Failed { message }) => {
                SessionState::Failed { message }
            }
            (state, event) => {
                tracing::debug!(?event, "event ignored in current state");
                state
            }
        }
    }

    /// Whether this state ends the flow
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Ready { .. } | SessionState::TimedOut { .. } | SessionState::Failed { .. }
        )
    }
}

/// Events that drive the state machine
#[derive(Debug, Clone)]
pub enum SessionEvent {
    SubmitStarted,
    SubmitAccepted { job_id: String },
    ResultReady { snapshot: JobSnapshot },
    TimedOut,
    Failed { message: String },
    Reset,
}

/// Drives one payload through submit and the chosen delivery strategy,
/// publishing every state change over a watch channel.
///
/// Cancellation: drop the `run` future (or abort its task) and call `reset`.
/// Once the state is back to `Idle`, late events from the abandoned flow are
/// ignored by the transition table, so no stale result can surface.
pub struct ReviewSession {
    client: Arc<ReviewClient>,
    strategy: Arc<dyn DeliveryStrategy>,
    state: watch::Sender<SessionState>,
}

impl ReviewSession {
    pub fn new(client: Arc<ReviewClient>, strategy: Arc<dyn DeliveryStrategy>) -> Self {
        let (state, _) = watch::channel(SessionState::Idle);
        Self {
            client,
            strategy,
            state,
        }
    }

    /// Subscribe to state changes.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Current state, readable without awaiting.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    fn transition(&self, event: SessionEvent) {
        self.state.send_if_modified(|state| {
            let next = state.clone().apply(event);
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
    }

    /// Run one full review flow. The terminal snapshot is also returned to
    /// the caller; errors mirror the terminal state.
    pub async fn run(&self, payload: DocumentPayload) -> Result<JobSnapshot> {
        self.transition(SessionEvent::SubmitStarted);

        let receipt = match self.client.submit(payload).await {
            Ok(receipt) => receipt,
            Err(e) => {
                self.transition(SessionEvent::Failed {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };
        self.transition(SessionEvent::SubmitAccepted {
            job_id: receipt.id.clone(),
        });

        tracing::info!(id = %receipt.id, strategy = self.strategy.name(), "waiting for result");
        match self.strategy.wait_for_result(&receipt.id).await {
            Ok(snapshot) => {
                self.transition(SessionEvent::ResultReady {
                    snapshot: snapshot.clone(),
                });
                Ok(snapshot)
            }
            Err(Error::DeadlineExceeded { waited }) => {
                self.transition(SessionEvent::TimedOut);
                Err(Error::DeadlineExceeded { waited })
            }
            Err(e) => {
                self.transition(SessionEvent::Failed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Abandon the current flow and return to `Idle`.
    pub fn reset(&self) {
        self.transition(SessionEvent::Reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JobStatus;
    use chrono::Utc;

    fn snapshot() -> JobSnapshot {
        JobSnapshot {
            id: "job-123".into(),
            status: JobStatus::Ready,
            output: Vec::new(),
            message: None,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn happy_path_transitions() {
        let state = SessionState::Idle
            .apply(SessionEvent::SubmitStarted)
            .apply(SessionEvent::SubmitAccepted {
                job_id: "job-123".into(),
            });
        assert_eq!(
            state,
            SessionState::Waiting {
                job_id: "job-123".into()
            }
        );

        let state = state.apply(SessionEvent::ResultReady {
            snapshot: snapshot(),
        });
        assert!(matches!(state, SessionState::Ready { .. }));
        assert!(state.is_terminal());
    }

    #[test]
    fn timeout_keeps_the_job_id() {
        let state = SessionState::Waiting {
            job_id: "job-9".into(),
        }
        .apply(SessionEvent::TimedOut);
        assert_eq!(
            state,
            SessionState::TimedOut {
                job_id: "job-9".into()
            }
        );
    }

    #[test]
    fn failure_is_reachable_from_submitting_and_waiting() {
        let from_submit = SessionState::Submitting.apply(SessionEvent::Failed {
            message: "rejected".into(),
        });
        assert!(matches!(from_submit, SessionState::Failed { .. }));

        let from_wait = SessionState::Waiting {
            job_id: "job-1".into(),
        }
        .apply(SessionEvent::Failed {
            message: "transport".into(),
        });
        assert!(matches!(from_wait, SessionState::Failed { .. }));
    }

    #[test]
    fn reset_always_returns_to_idle() {
        for state in [
            SessionState::Idle,
            SessionState::Submitting,
            SessionState::Waiting {
                job_id: "j".into(),
            },
            SessionState::Ready {
                snapshot: snapshot(),
            },
            SessionState::Failed {
                message: "x".into(),
            },
        ] {
            assert_eq!(state.apply(SessionEvent::Reset), SessionState::Idle);
        }
    }

    #[test]
    fn late_events_after_reset_are_ignored() {
        // A cancelled flow may still emit its terminal events; from Idle they
        // must not change anything.
        let state = SessionState::Idle.apply(SessionEvent::ResultReady {
            snapshot: snapshot(),
        });
        assert_eq!(state, SessionState::Idle);

        let state = SessionState::Idle.apply(SessionEvent::SubmitAccepted {
            job_id: "stale".into(),
        });
        assert_eq!(state, SessionState::Idle);

        let state = SessionState::Idle.apply(SessionEvent::TimedOut);
        assert_eq!(state, SessionState::Idle);
    }

    #[test]
    fn terminal_states_ignore_further_progress() {
        let ready = SessionState::Ready {
            snapshot: snapshot(),
        };
        let still_ready = ready.clone().apply(SessionEvent::SubmitStarted);
        assert_eq!(still_ready, ready);
    }
}
