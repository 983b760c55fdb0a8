use serde::{Deserialize, Serialize};
use strum::Display;

/// Failure classes shared by the relay and its clients.
#[derive(Display, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// A required field was missing or blank.
    Validation,
    /// The mail transport did not settle within the relay budget.
    Timeout,
    /// The mail transport reported an error.
    TransportRejected,
    /// Anything else, malformed requests included.
    Unknown,
}

/// Body of a 200 response from the contact endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SuccessBody {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SuccessBody {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: Some("Email sent successfully".to_owned()),
        }
    }
}

/// Body of every non-2xx response from the contact endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorKind>,
}

impl ErrorBody {
    /// Text shown to the person who filled in the form.
    pub fn display_message(&self) -> String {
        match &self.details {
            Some(details) if !details.is_empty() => format!("{}: {details}", self.error),
            _ => self.error.to_owned(),
        }
    }
}
