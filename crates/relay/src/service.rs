//! Mail transport using lettre

use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
};

use crate::{MailEnvelope, RelayConfig};

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("{0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("{0}")]
    Build(#[from] lettre::error::Error),

    #[error("{0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Hands a built envelope to an external mail channel.
///
/// Implementations must be cancel-safe: the relay drops the returned future
/// when its time budget runs out.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, envelope: &MailEnvelope) -> Result<(), MailError>;
}

#[async_trait]
impl<M: Mailer + ?Sized> Mailer for Arc<M> {
    async fn send(&self, envelope: &MailEnvelope) -> Result<(), MailError> {
        (**self).send(envelope).await
    }
}

/// SMTP mailer backed by a pooled async lettre transport
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Create a new SMTP mailer from configuration
    pub fn new(config: &RelayConfig) -> Result<Self, MailError> {
        let builder = if !config.has_credentials() {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                "SMTP credentials not configured, using unauthenticated connection (e.g., MailDev)"
            );
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        } else {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                smtp_secure = config.smtp_secure,
                from = %config.from_address,
                "Mail relay initialized with authentication and TLS"
            );

            let creds =
                Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

            let builder = if config.smtp_secure {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            };

            builder.credentials(creds)
        };

        let transport = builder
            .port(config.smtp_port)
            .timeout(Some(config.connect_timeout()))
            .build();

        Ok(Self { transport })
    }
}

/// Convert an envelope into a lettre message.
///
/// A reply-to address that does not parse is left out instead of blocking
/// delivery, since submitted addresses are never checked upstream.
pub fn to_message(envelope: &MailEnvelope) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(envelope.from.parse()?)
        .to(envelope.to.parse()?)
        .subject(envelope.subject.as_str());

    match envelope.reply_to.parse::<Mailbox>() {
        Ok(reply_to) => builder = builder.reply_to(reply_to),
        Err(err) => tracing::warn!(
            reply_to = %envelope.reply_to,
            error = %err,
            "Submitted email is not a valid mailbox, sending without Reply-To"
        ),
    }

    Ok(builder.multipart(MultiPart::alternative_plain_html(
        envelope.text_body.to_owned(),
        envelope.html_body.to_owned(),
    ))?)
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, envelope: &MailEnvelope) -> Result<(), MailError> {
        let message = to_message(envelope)?;

        tracing::info!(to = %envelope.to, subject = %envelope.subject, "Sending email");

        self.transport.send(message).await?;

        Ok(())
    }
}
