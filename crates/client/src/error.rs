/// Errors returned by [`CoincraddleClient`](crate::CoincraddleClient) operations.
///
/// Failures are passed through unclassified: the client never inspects
/// remote error payloads and never retries.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection failure, timeout, or a non-success HTTP status.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response body was not valid JSON.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status code, when the failure was a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            ClientError::Decode(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Transport(e) if e.is_timeout())
    }
}
