pub mod auth;
pub mod timestamp;

pub use auth::*;
pub use timestamp::WireTimestamp;
