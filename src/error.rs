use thiserror::Error;

/// Process-level failures: start-up configuration, binding, I/O.
///
/// Per-request failures never surface here; they are classified by the
/// forwarder and rendered into the response envelope instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),
}

// Implement alias for Result to simplify usage
pub type AppResult<T> = Result<T, AppError>;
