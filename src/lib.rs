pub mod config;
pub mod error;
pub mod observability;
pub mod routes;
pub mod server;

pub use config::Config;
pub use error::AppError;
pub use routes::{AppState, router};
