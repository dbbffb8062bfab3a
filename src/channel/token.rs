use crate::error::ChannelError;
use tracing::{info, warn};

pub const TOKEN_HEADER: &str = "X-Riot-Token";
pub const API_KEY_LENGTH: usize = 42;

/// The single authentication header attached to every transfer.
#[derive(Clone, PartialEq, Eq)]
pub struct Header {
    pub name: &'static str,
    pub value: String,
}

// Keeps the key out of debug output and logs.
impl std::fmt::Debug for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Header")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct TokenManager {
    header: Option<Header>,
}

impl TokenManager {
    pub fn new() -> Self {
        TokenManager::default()
    }

    /// Replaces the header with one built from `key`.
    ///
    /// A key of the wrong length is rejected and the current header is kept.
    pub fn update(&mut self, key: &str) -> Result<(), ChannelError> {
        if key.len() != API_KEY_LENGTH {
            warn!(length = key.len(), "Rejected API key with invalid length");
            return Err(ChannelError::InvalidKeyLength {
                expected: API_KEY_LENGTH,
                actual: key.len(),
            });
        }

        let rotated = self.header.is_some();
        self.header = Some(Header {
            name: TOKEN_HEADER,
            value: key.to_string(),
        });
        info!(rotated, "API token header updated");
        Ok(())
    }

    pub fn header(&self) -> Result<&Header, ChannelError> {
        self.header.as_ref().ok_or(ChannelError::MissingCredential)
    }

    pub fn is_set(&self) -> bool {
        self.header.is_some()
    }
}
