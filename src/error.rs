use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// A request is already outstanding; inputs stay disabled until it resolves.
    #[error("Busy: a generation request is already in progress")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    #[error("Image endpoint returned HTTP {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Image load timed out after {0}s")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GenerationError>;
