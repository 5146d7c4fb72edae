use thiserror::Error;

#[derive(Error, Debug)]
pub enum TgstatError {
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Channel resolution failures. Fatal for a run: acquisition never starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Channel not found: {0}")]
    NotFound(String),

    #[error("Channel is private and not accessible: {0}")]
    PrivateForbidden(String),

    #[error("Invalid channel identifier: {0}")]
    InvalidIdentifier(String),
}

/// Errors raised by a [`crate::MessageSource`] while streaming.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Provider-imposed wait (Telegram FLOOD_WAIT). The only retried error.
    #[error("Rate limited, retry after {wait_secs}s")]
    RateLimited { wait_secs: u64 },

    #[error("Transport error: {0}")]
    Transport(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown media kind: {0}")]
pub struct UnknownMediaKind(pub String);

pub type Result<T> = std::result::Result<T, TgstatError>;
