// Handlers module - broker endpoints

pub mod handle;
pub mod health;

pub use handle::handle_submission;
pub use health::health_check_handler;
