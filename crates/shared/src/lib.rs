pub mod contact;
pub mod payload;

pub use contact::*;
pub use payload::*;
