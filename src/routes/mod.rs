use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use folio_relay::MailRelayService;

pub mod contact;
pub mod health;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<MailRelayService>,
}

impl AppState {
    pub fn new(relay: MailRelayService) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/contact", post(contact::action))
        .with_state(app_state)
}
