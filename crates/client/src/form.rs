use std::{sync::Arc, time::Duration};

use folio_shared::{ContactSubmission, Field};
use tokio::sync::watch;

use crate::{Transport, TransportError};

/// How long the success notice stays up before the form returns to idle.
pub const SUCCESS_DISPLAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please fill all fields")]
    Incomplete,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed(FormError),
}

/// What the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormStatus {
    pub loading: bool,
    pub success: bool,
    pub error: Option<String>,
}

impl FormPhase {
    /// At most one of the three outcome fields is ever set.
    pub fn status(&self) -> FormStatus {
        match self {
            Self::Idle | Self::Validating => FormStatus::default(),
            Self::Submitting => FormStatus {
                loading: true,
                ..FormStatus::default()
            },
            Self::Succeeded => FormStatus {
                success: true,
                ..FormStatus::default()
            },
            Self::Failed(err) => FormStatus {
                error: Some(err.to_string()),
                ..FormStatus::default()
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    draft: ContactSubmission,
    phase: FormPhase,
    // bumped by every accepted submit, stale resets compare against it
    generation: u64,
}

impl FormState {
    pub fn draft(&self) -> &ContactSubmission {
        &self.draft
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn status(&self) -> FormStatus {
        self.phase.status()
    }
}

/// Contact form controller.
///
/// Owns the draft and the submission state machine
/// `Idle -> Validating -> Submitting -> Succeeded | Failed -> Idle`.
/// State is published through a watch channel so that readers never wait on
/// an in-flight request.
pub struct ContactForm<T> {
    transport: T,
    state: Arc<watch::Sender<FormState>>,
    success_display: Duration,
}

impl<T: Transport> ContactForm<T> {
    pub fn new(transport: T) -> Self {
        let (state, _) = watch::channel(FormState::default());

        Self {
            transport,
            state: Arc::new(state),
            success_display: SUCCESS_DISPLAY,
        }
    }

    pub fn with_success_display(mut self, window: Duration) -> Self {
        self.success_display = window;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn draft(&self) -> ContactSubmission {
        self.state.borrow().draft.clone()
    }

    pub fn phase(&self) -> FormPhase {
        self.state.borrow().phase.clone()
    }

    pub fn status(&self) -> FormStatus {
        self.state.borrow().status()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    /// Update one draft field. Watchers are only notified when the value
    /// actually changes.
    pub fn capture_input(&self, field: Field, value: impl Into<String>) {
        let value = value.into();

        self.state.send_if_modified(|state| {
            let slot = state.draft.field_mut(field);
            if *slot == value {
                return false;
            }

            *slot = value;
            true
        });
    }

    /// Validate the draft and, when complete, send a snapshot of it.
    ///
    /// Does nothing while a previous submission is still in flight.
    pub async fn submit(&self) -> FormStatus {
        let mut snapshot = None;

        self.state.send_if_modified(|state| {
            if state.phase == FormPhase::Submitting {
                tracing::debug!("Submission already in flight");
                return false;
            }

            state.generation += 1;
            state.phase = FormPhase::Validating;

            if state.draft.is_complete() {
                snapshot = Some((state.draft.clone(), state.generation));
                state.phase = FormPhase::Submitting;
            } else {
                state.phase = FormPhase::Failed(FormError::Incomplete);
            }

            true
        });

        let Some((submission, generation)) = snapshot else {
            return self.status();
        };

        let in_flight = InFlight {
            state: &self.state,
            generation,
        };
        let result = self.transport.send(submission).await;
        drop(in_flight);

        let succeeded = result.is_ok();
        self.state.send_modify(|state| match result {
            Ok(_) => {
                state.draft = ContactSubmission::default();
                state.phase = FormPhase::Succeeded;
            }
            Err(err) => {
                state.phase = FormPhase::Failed(err.into());
            }
        });

        if succeeded {
            self.schedule_reset(generation);
        }

        self.status()
    }

    fn schedule_reset(&self, generation: u64) {
        let state = Arc::clone(&self.state);
        let window = self.success_display;

        tokio::spawn(async move {
            tokio::time::sleep(window).await;

            state.send_if_modified(|state| {
                if state.generation != generation || state.phase != FormPhase::Succeeded {
                    return false;
                }

                state.phase = FormPhase::Idle;
                true
            });
        });
    }
}

/// Puts the form back to idle if a submit future is dropped mid-request.
struct InFlight<'a> {
    state: &'a watch::Sender<FormState>,
    generation: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|state| {
            if state.generation != self.generation || state.phase != FormPhase::Submitting {
                return false;
            }

            state.phase = FormPhase::Idle;
            true
        });
    }
}
