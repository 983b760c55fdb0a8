mod form;
mod transport;

pub use form::*;
pub use transport::*;
