use thiserror::Error as ThisError;

/// Result type for tutor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the backend or setting the client up.
#[derive(ThisError, Debug)]
pub enum Error {
    /// The request never produced a response (connection refused, DNS, reset, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A response body was not the JSON we expected
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a selected file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl Error {
    /// True when the error happened on the wire rather than while decoding a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(e) if !e.is_decode())
    }
}
