use askama::Template;
use folio_shared::ContactSubmission;

use crate::RelayConfig;

/// A fully built contact message, ready for one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailEnvelope {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[derive(Template)]
#[template(path = "contact.html")]
struct ContactHtmlTemplate<'a> {
    name: &'a str,
    email: &'a str,
    lines: Vec<&'a str>,
}

#[derive(Template)]
#[template(path = "contact.txt")]
struct ContactPlainTemplate<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

impl MailEnvelope {
    /// Derive the envelope from a submission. Addresses other than
    /// `reply_to` always come from the relay configuration.
    pub fn build(
        submission: &ContactSubmission,
        config: &RelayConfig,
    ) -> Result<Self, askama::Error> {
        let name = submission.name.trim();
        let email = submission.email.trim();
        // indentation on the first line is part of the message
        let message = submission
            .message
            .trim_end()
            .trim_start_matches(['\r', '\n']);

        let html_body = ContactHtmlTemplate {
            name,
            email,
            lines: message
                .split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line))
                .collect(),
        }
        .render()?;

        let text_body = ContactPlainTemplate {
            name,
            email,
            message,
        }
        .render()?;

        Ok(Self {
            from: config.from_mailbox(),
            to: config.contact_address.to_owned(),
            reply_to: email.to_owned(),
            subject: format!("New Contact Form Submission from {name}"),
            text_body,
            html_body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RelayConfig {
        RelayConfig {
            from_address: "relay@example.com".to_string(),
            contact_address: "me@example.com".to_string(),
            ..RelayConfig::default()
        }
    }

    #[test]
    fn test_envelope_fields() -> anyhow::Result<()> {
        let submission = ContactSubmission::new("Ada", "ada@example.com", "Hello\nWorld");
        let envelope = MailEnvelope::build(&submission, &config())?;

        assert_eq!(envelope.from, "Portfolio <relay@example.com>");
        assert_eq!(envelope.to, "me@example.com");
        assert_eq!(envelope.reply_to, "ada@example.com");
        assert_eq!(envelope.subject, "New Contact Form Submission from Ada");

        assert!(envelope.html_body.contains("Hello<br>World"));
        assert!(envelope.html_body.contains("<strong>Name:</strong> Ada"));
        assert!(envelope.html_body.contains("ada@example.com"));

        assert!(envelope.text_body.contains("Name: Ada\nEmail: ada@example.com"));
        assert!(envelope.text_body.contains("Message:\nHello\nWorld"));

        Ok(())
    }

    #[test]
    fn test_html_body_escapes_user_input() -> anyhow::Result<()> {
        let submission = ContactSubmission::new(
            "<b>Mallory</b>",
            "m@example.com",
            "<script>alert(1)</script>\r\nbye & thanks",
        );
        let envelope = MailEnvelope::build(&submission, &config())?;

        assert!(!envelope.html_body.contains("<script>"));
        assert!(!envelope.html_body.contains("<b>Mallory</b>"));
        assert!(!envelope.html_body.contains("bye & thanks"));
        assert!(envelope.html_body.contains("script"));
        assert!(envelope.html_body.contains("Mallory"));
        assert!(envelope.html_body.contains("<br>bye "));

        // plain text is delivered as typed
        assert!(envelope.text_body.contains("<script>alert(1)</script>"));

        Ok(())
    }

    #[test]
    fn test_surrounding_whitespace_is_dropped() -> anyhow::Result<()> {
        let submission = ContactSubmission::new("  Ada \n", " ada@example.com ", "\nHi\n");
        let envelope = MailEnvelope::build(&submission, &config())?;

        assert_eq!(envelope.subject, "New Contact Form Submission from Ada");
        assert_eq!(envelope.reply_to, "ada@example.com");
        assert!(envelope.html_body.contains("<p>Hi</p>"));

        Ok(())
    }

    #[test]
    fn test_message_indentation_is_kept() -> anyhow::Result<()> {
        let submission =
            ContactSubmission::new("Ada", "ada@example.com", "\n    fn main() {}\n  ");
        let envelope = MailEnvelope::build(&submission, &config())?;

        assert!(envelope.html_body.contains("<p>    fn main() {}</p>"));
        assert!(envelope.text_body.contains("Message:\n    fn main() {}"));

        Ok(())
    }
}
