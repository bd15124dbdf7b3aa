//! Listener error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListenerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Recognizer is already listening")]
    AlreadyListening,

    #[error("Speech provider was lost by a failed recognition task")]
    ProviderLost,

    #[error("Recognition event channel closed")]
    ChannelClosed,

    #[error("Recognition task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
