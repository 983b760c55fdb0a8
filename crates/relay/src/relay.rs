use std::{sync::Arc, time::Duration};

use folio_shared::{ContactSubmission, ErrorKind};
use validator::Validate;

use crate::{MailEnvelope, MailError, Mailer, RelayConfig, SmtpMailer};

pub const VALIDATION_MESSAGE: &str = "name, email and message are required";
pub const TIMEOUT_MESSAGE: &str = "relay timed out";

/// Result of one dispatch. Never retried or cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Success,
    Failure(ErrorKind, String),
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Validates submissions, builds envelopes and hands them to a [`Mailer`]
/// within a fixed time budget.
#[derive(Clone)]
pub struct MailRelayService {
    config: Arc<RelayConfig>,
    mailer: Arc<dyn Mailer>,
    timeout: Duration,
}

impl MailRelayService {
    pub fn new(config: RelayConfig, mailer: impl Mailer + 'static) -> Self {
        let timeout = config.timeout();

        Self {
            config: Arc::new(config),
            mailer: Arc::new(mailer),
            timeout,
        }
    }

    /// Relay backed by the SMTP server named in the configuration.
    pub fn smtp(config: RelayConfig) -> Result<Self, MailError> {
        let mailer = SmtpMailer::new(&config)?;

        Ok(Self::new(config, mailer))
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Make exactly one delivery attempt for `submission`.
    ///
    /// The mailer races a timer; when the timer wins, the mailer future is
    /// dropped and whatever it was doing is abandoned.
    #[tracing::instrument(skip_all, fields(name = %submission.name.trim()))]
    pub async fn dispatch(&self, submission: &ContactSubmission) -> DispatchOutcome {
        if let Err(errors) = submission.validate() {
            tracing::warn!(
                fields = ?errors.field_errors().keys().collect::<Vec<_>>(),
                "Rejected incomplete submission"
            );

            return DispatchOutcome::Failure(ErrorKind::Validation, VALIDATION_MESSAGE.to_owned());
        }

        let envelope = match MailEnvelope::build(submission, &self.config) {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::error!(error = %err, "Failed to render contact email");

                return DispatchOutcome::Failure(ErrorKind::Unknown, err.to_string());
            }
        };

        tokio::select! {
            biased;

            result = self.mailer.send(&envelope) => match result {
                Ok(()) => {
                    tracing::info!("Contact email sent");

                    DispatchOutcome::Success
                }
                Err(err) => {
                    tracing::error!(error = %err, "Mail transport rejected contact email");

                    DispatchOutcome::Failure(ErrorKind::TransportRejected, err.to_string())
                }
            },
            _ = tokio::time::sleep(self.timeout) => {
                tracing::error!(timeout_secs = self.timeout.as_secs_f64(), "Mail relay timed out");

                DispatchOutcome::Failure(ErrorKind::Timeout, TIMEOUT_MESSAGE.to_owned())
            }
        }
    }
}
