mod config;
mod envelope;
mod relay;
mod service;

pub use config::*;
pub use envelope::*;
pub use relay::*;
pub use service::*;
