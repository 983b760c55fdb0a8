//! Shared fixtures for the contact endpoint tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use folio::{AppState, router};
use folio_relay::{MailEnvelope, MailError, MailRelayService, Mailer, RelayConfig};

/// Mailer that records every envelope it is handed
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<MailEnvelope>>,
}

impl RecordingMailer {
    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<MailEnvelope> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, envelope: &MailEnvelope) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(envelope.clone());
        Ok(())
    }
}

/// Mailer that never settles
pub struct HangingMailer;

#[async_trait]
impl Mailer for HangingMailer {
    async fn send(&self, _envelope: &MailEnvelope) -> Result<(), MailError> {
        std::future::pending().await
    }
}

/// Mailer that fails like a server refusing the recipient
pub struct RejectingMailer;

#[async_trait]
impl Mailer for RejectingMailer {
    async fn send(&self, envelope: &MailEnvelope) -> Result<(), MailError> {
        Err(rejection(envelope))
    }
}

pub fn rejection(envelope: &MailEnvelope) -> MailError {
    let mut envelope = envelope.clone();
    envelope.to = "invalid-recipient".to_string();

    match folio_relay::to_message(&envelope) {
        Ok(_) => unreachable!("recipient should not parse"),
        Err(err) => err,
    }
}

pub fn relay_config() -> RelayConfig {
    RelayConfig {
        smtp_username: "relay@example.com".to_string(),
        smtp_password: "app-password".to_string(),
        from_address: "relay@example.com".to_string(),
        contact_address: "me@example.com".to_string(),
        timeout_secs: 1,
        ..RelayConfig::default()
    }
}

pub fn app(mailer: impl Mailer + 'static) -> Router {
    router(AppState::new(MailRelayService::new(relay_config(), mailer)))
}

pub fn recording_app() -> (Router, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    (app(mailer.clone()), mailer)
}
