//! Error types for the HTTP ingress service

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngressError {
    #[error("Runtime error: {0}")]
    Runtime(#[from] mailbox_runtime::RuntimeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] warp::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, IngressError>;
