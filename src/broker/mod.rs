// broker module - envelope gateway in front of the authentication service

pub mod config;
pub mod envelope;
pub mod handlers; // Endpoint handlers
pub mod middleware; // Axum middleware
pub mod response;
pub mod server;
pub mod upstream; // Auth service client

pub use config::BrokerConfig;
pub use server::{build_router, AppState, AxumServer};
pub use upstream::AuthServiceClient;
