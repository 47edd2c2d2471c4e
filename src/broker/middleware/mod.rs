// Middleware module - Axum middleware

pub mod cors;
pub mod logging;
pub mod recover;

pub use cors::cors_layer;
pub use logging::logging_middleware;
pub use recover::recover_layer;
