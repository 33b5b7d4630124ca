use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("Toolchain missing: {0}")]
    ToolchainMissing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session closed")]
    SessionClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
