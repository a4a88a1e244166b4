use thiserror::Error;

#[derive(Error, Debug)]
pub enum MuletrackError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid lookback window: {0}")]
    InvalidWindow(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type MuletrackResult<T> = Result<T, MuletrackError>;

impl From<std::io::Error> for MuletrackError {
    fn from(e: std::io::Error) -> Self {
        MuletrackError::Io(e.to_string())
    }
}
