use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse secrets file {path}: {reason}")]
    Secrets { path: String, reason: String },

    #[error("unknown analysis flow: '{0}' (expected 'book' or 'cost')")]
    UnknownFlow(String),
}
