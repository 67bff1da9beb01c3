use std::fmt;

/// Raw page bytes plus what the transport learned about them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub byte_len: u64,
    /// Requests issued, including retries.
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
    /// Requests issued before giving up. Zero when the URL was rejected up front.
    pub attempts: u32,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            attempts: 0,
        }
    }

    pub(crate) fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Timeouts, connection failures and 5xx responses are worth another try.
    pub fn is_transient(&self) -> bool {
        match self.kind {
            FailureKind::Timeout | FailureKind::Network => true,
            FailureKind::HttpStatus(code) => (500..600).contains(&code),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_timeouts_network_and_server_errors_are_transient() {
        assert!(FetchError::new(FailureKind::Timeout, "t").is_transient());
        assert!(FetchError::new(FailureKind::Network, "reset").is_transient());
        assert!(FetchError::new(FailureKind::HttpStatus(503), "").is_transient());
        assert!(!FetchError::new(FailureKind::HttpStatus(404), "").is_transient());
        assert!(!FetchError::new(FailureKind::HttpStatus(429), "").is_transient());
        assert!(!FetchError::new(FailureKind::InvalidUrl, "").is_transient());
        assert!(!FetchError::new(
            FailureKind::TooLarge {
                max_bytes: 1,
                actual: None
            },
            ""
        )
        .is_transient());
    }
}
