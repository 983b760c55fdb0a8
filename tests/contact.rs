//! Contact endpoint tests
//!
//! Every response from POST /api/contact is checked for its status code and
//! for a JSON body. A 500 must never come back empty.

use std::time::{Duration, Instant};

use axum::{
    Router,
    body::Body,
    extract::Request,
    http::{Method, StatusCode, header},
};
use folio_relay::MailEnvelope;
use folio_shared::ContactSubmission;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

mod helpers;

async fn post(app: Router, body: impl Into<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())?;

    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    assert!(!bytes.is_empty(), "response body must never be empty");

    Ok((status, serde_json::from_slice(&bytes)?))
}

fn ada() -> Value {
    json!({
        "name": "Ada",
        "email": "ada@example.com",
        "message": "Hello\nWorld",
    })
}

#[tokio::test]
async fn test_submission_is_relayed() -> anyhow::Result<()> {
    let (app, mailer) = helpers::recording_app();

    let (status, body) = post(app, ada().to_string()).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Email sent successfully" }));

    let envelope = mailer.last().expect("one envelope");
    assert_eq!(envelope.from, "Portfolio <relay@example.com>");
    assert_eq!(envelope.to, "me@example.com");
    assert_eq!(envelope.reply_to, "ada@example.com");
    assert_eq!(envelope.subject, "New Contact Form Submission from Ada");
    assert!(envelope.html_body.contains("Hello<br>World"));
    assert!(envelope.html_body.contains("Ada"));
    assert!(envelope.html_body.contains("ada@example.com"));

    Ok(())
}

#[tokio::test]
async fn test_blank_fields_are_bad_request() -> anyhow::Result<()> {
    let (app, mailer) = helpers::recording_app();

    for payload in [
        json!({ "name": "", "email": "ada@example.com", "message": "Hi" }),
        json!({ "name": "Ada", "email": "  ", "message": "Hi" }),
        json!({ "name": "Ada", "email": "ada@example.com", "message": "\n\t" }),
        json!({ "name": null, "email": "ada@example.com", "message": "Hi" }),
        json!({ "name": "Ada" }),
        json!({}),
    ] {
        let (status, body) = post(app.clone(), payload.to_string()).await?;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body["error"], "name, email and message are required");
        assert_eq!(body["code"], "validation");
    }

    assert_eq!(mailer.count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_email_shape_is_not_checked() -> anyhow::Result<()> {
    let (app, mailer) = helpers::recording_app();

    let payload = json!({ "name": "Ada", "email": "ada at home", "message": "Hi" });
    let (status, _) = post(app, payload.to_string()).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(mailer.last().expect("sent").reply_to, "ada at home");

    Ok(())
}

#[tokio::test]
async fn test_hanging_transport_times_out() -> anyhow::Result<()> {
    let app = helpers::app(helpers::HangingMailer);

    let started = Instant::now();
    let (status, body) = post(app, ada().to_string()).await?;
    let elapsed = started.elapsed();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "relay timed out");
    assert_eq!(body["code"], "timeout");

    // relay budget is one second in the fixtures
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(5), "took {elapsed:?}");

    Ok(())
}

#[tokio::test]
async fn test_transport_error_is_reported() -> anyhow::Result<()> {
    let app = helpers::app(helpers::RejectingMailer);

    let (status, body) = post(app, ada().to_string()).await?;

    let envelope = MailEnvelope::build(
        &ContactSubmission::new("Ada", "ada@example.com", "Hello\nWorld"),
        &helpers::relay_config(),
    )?;
    let expected = helpers::rejection(&envelope).to_string();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to send email");
    assert_eq!(body["details"], Value::String(expected));
    assert_eq!(body["code"], "transport_rejected");

    Ok(())
}

#[tokio::test]
async fn test_malformed_json_gets_a_json_error() -> anyhow::Result<()> {
    let (app, mailer) = helpers::recording_app();

    let (status, body) = post(app, "{\"name\": ").await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to send email");
    assert_eq!(body["code"], "unknown");
    assert_eq!(mailer.count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_missing_content_type_gets_a_json_error() -> anyhow::Result<()> {
    let (app, _) = helpers::recording_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contact")
        .body(Body::from(ada().to_string()))?;
    let response = app.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = response.into_body().collect().await?.to_bytes();
    let body: Value = serde_json::from_slice(&bytes)?;
    assert!(body.get("error").is_some());

    Ok(())
}

#[tokio::test]
async fn test_identical_submissions_are_not_deduplicated() -> anyhow::Result<()> {
    let (app, mailer) = helpers::recording_app();

    for _ in 0..2 {
        let (status, _) = post(app.clone(), ada().to_string()).await?;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(mailer.count(), 2);

    Ok(())
}

#[tokio::test]
async fn test_health() -> anyhow::Result<()> {
    let (app, _) = helpers::recording_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
