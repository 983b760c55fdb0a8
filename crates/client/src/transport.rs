use std::time::Duration;

use async_trait::async_trait;
use folio_shared::{ContactSubmission, ErrorBody, ErrorKind, SuccessBody};
use reqwest::StatusCode;
use url::Url;

pub const CONTACT_PATH: &str = "/api/contact";

/// Longer than the relay's own budget so the server gets to answer first.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Every way a submission can fail between the form and the relay.
///
/// The `Display` form is the text shown in the form's status region.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// No response was received.
    #[error("{0}")]
    NetworkUnavailable(String),

    /// A success status arrived with a body that is not a success payload.
    #[error("Unexpected response from server: {0}")]
    Malformed(String),

    #[error("{message}")]
    Server {
        status: u16,
        kind: ErrorKind,
        message: String,
    },
}

impl TransportError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Server { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Delivers one submission to the contact endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, submission: ContactSubmission) -> Result<SuccessBody, TransportError>;
}

/// JSON-over-HTTP transport. One request per call, never retried.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(endpoint: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, endpoint })
    }

    /// Transport for the contact endpoint of the site at `base`.
    pub fn for_site(base: &Url) -> Result<Self, TransportInitError> {
        Ok(Self::new(base.join(CONTACT_PATH)?)?)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportInitError {
    #[error("invalid contact endpoint: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, submission: ContactSubmission) -> Result<SuccessBody, TransportError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&submission)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(
                    endpoint = %self.endpoint,
                    error = %err,
                    "Contact endpoint unreachable"
                );

                TransportError::NetworkUnavailable(err.to_string())
            })?;

        let status = response.status();
        let body = response.bytes().await;

        if status.is_success() {
            let body = body.map_err(|err| TransportError::Malformed(err.to_string()))?;

            return serde_json::from_slice::<SuccessBody>(&body)
                .map_err(|err| TransportError::Malformed(err.to_string()));
        }

        let err = server_error(status, body.as_deref().ok());
        tracing::warn!(status = status.as_u16(), error = %err, "Contact submission failed");

        Err(err)
    }
}

/// Normalize a non-2xx response. A body that is not an error payload falls
/// back to a message built from the status line.
fn server_error(status: StatusCode, body: Option<&[u8]>) -> TransportError {
    let fallback_kind = if status == StatusCode::BAD_REQUEST {
        ErrorKind::Validation
    } else {
        ErrorKind::Unknown
    };

    let (kind, message) =
        match body.and_then(|body| serde_json::from_slice::<ErrorBody>(body).ok()) {
            Some(body) => (body.code.unwrap_or(fallback_kind), body.display_message()),
            None => {
                let reason = status
                    .canonical_reason()
                    .map(str::to_owned)
                    .unwrap_or_else(|| status.as_u16().to_string());

                (fallback_kind, format!("Request failed: {reason}"))
            }
        };

    TransportError::Server {
        status: status.as_u16(),
        kind,
        message,
    }
}
