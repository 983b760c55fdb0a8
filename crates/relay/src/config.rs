use std::time::Duration;

use lettre::message::Mailbox;
use serde::Deserialize;

/// SMTP relay settings, loaded once at startup and never mutated.
#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Implicit TLS when true, STARTTLS otherwise.
    #[serde(default = "default_smtp_secure")]
    pub smtp_secure: bool,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub smtp_password: String,
    #[serde(default)]
    pub from_address: String,
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Mailbox that receives every submission.
    #[serde(default)]
    pub contact_address: String,
    /// Budget for one dispatch, connection included.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_secure: default_smtp_secure(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: String::new(),
            from_name: default_from_name(),
            contact_address: String::new(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_smtp_secure() -> bool {
    true
}

fn default_from_name() -> String {
    "Portfolio".to_string()
}

fn default_timeout_secs() -> u64 {
    25
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl RelayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn has_credentials(&self) -> bool {
        !self.smtp_username.is_empty() && !self.smtp_password.is_empty()
    }

    /// Sender as it appears in the `From` header.
    pub fn from_mailbox(&self) -> String {
        if self.from_name.trim().is_empty() {
            return self.from_address.to_owned();
        }

        format!("{} <{}>", self.from_name, self.from_address)
    }

    /// Validate relay settings
    pub fn validate(&self) -> Result<(), String> {
        if self.smtp_host.trim().is_empty() {
            return Err("SMTP host must not be empty".to_string());
        }
        if self.smtp_port == 0 {
            return Err("SMTP port must be greater than 0".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("Relay timeout must be at least 1 second".to_string());
        }
        if self.connect_timeout_secs == 0 {
            return Err("SMTP connect timeout must be at least 1 second".to_string());
        }
        if self.smtp_secure && !self.has_credentials() {
            return Err("SMTP username and password are required when smtp_secure is set".to_string());
        }
        if self.from_address.is_empty() {
            return Err("Sender address (email.from_address) is required".to_string());
        }
        self.from_mailbox()
            .parse::<Mailbox>()
            .map_err(|e| format!("Invalid sender address: {e}"))?;
        if self.contact_address.is_empty() {
            return Err("Recipient address (email.contact_address) is required".to_string());
        }
        self.contact_address
            .parse::<Mailbox>()
            .map_err(|e| format!("Invalid recipient address: {e}"))?;
        Ok(())
    }
}
