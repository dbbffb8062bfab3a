use thiserror::Error;

/// The closed set of outcomes a dispatch can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorKind {
    #[default]
    None,
    TransportInitFailed,
    BadCredential,
    NotFound,
    RateLimited,
    TooManyConcurrent,
    Unknown,
}

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("HTTP transport failed to initialize: {0}")]
    TransportInit(String),

    #[error("Failed to reserve {0} bytes for the response arena")]
    ArenaAllocation(usize),

    #[error("API key rejected by the server (HTTP {0})")]
    BadCredential(u16),

    #[error("No API key configured, refusing to send an unauthenticated request")]
    MissingCredential,

    #[error("Invalid API key: expected {expected} characters, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, please try again later")]
    RateLimited,

    #[error("All {0} response blocks are in use")]
    TooManyConcurrent(usize),

    #[error("Response body exceeds the block size of {0} bytes")]
    ResponseTooLarge(usize),

    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Invalid selector 0x{0:04x}: exactly one bit must be set")]
    InvalidSelector(u16),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("Response body is not valid UTF-8: {0}")]
    DecodeError(String),
}

impl ChannelError {
    /// Builds the error matching a non-200 status. Returns `None` for 200.
    pub fn from_status(status: u16, url: &str) -> Option<Self> {
        match classify(status) {
            ErrorKind::None => None,
            ErrorKind::BadCredential => Some(ChannelError::BadCredential(status)),
            ErrorKind::NotFound => Some(ChannelError::NotFound(url.to_string())),
            ErrorKind::RateLimited => Some(ChannelError::RateLimited),
            _ => Some(ChannelError::UnexpectedStatus {
                status,
                url: url.to_string(),
            }),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ChannelError::TransportInit(_) | ChannelError::ArenaAllocation(_) => {
                ErrorKind::TransportInitFailed
            }
            ChannelError::BadCredential(_)
            | ChannelError::MissingCredential
            | ChannelError::InvalidKeyLength { .. } => ErrorKind::BadCredential,
            ChannelError::NotFound(_) => ErrorKind::NotFound,
            ChannelError::RateLimited => ErrorKind::RateLimited,
            ChannelError::TooManyConcurrent(_) => ErrorKind::TooManyConcurrent,
            ChannelError::ResponseTooLarge(_)
            | ChannelError::UnexpectedStatus { .. }
            | ChannelError::HttpError(_)
            | ChannelError::InvalidSelector(_)
            | ChannelError::ConfigError(_)
            | ChannelError::JsonError(_)
            | ChannelError::DecodeError(_) => ErrorKind::Unknown,
        }
    }
}

/// Maps a completed transfer's HTTP status to the error taxonomy.
pub fn classify(status: u16) -> ErrorKind {
    match status {
        200 => ErrorKind::None,
        401 | 403 => ErrorKind::BadCredential,
        404 => ErrorKind::NotFound,
        429 => ErrorKind::RateLimited,
        _ => ErrorKind::Unknown,
    }
}
