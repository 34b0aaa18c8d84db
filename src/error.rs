use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutodrawError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("request timed out after {0} seconds")]
    Timeout(u64),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("unexpected status {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("http error: {0}")]
    Http(String),
}

pub type Result<T> = std::result::Result<T, AutodrawError>;

impl AutodrawError {
    /// Classifies a transport-level failure. `timeout_secs` is the per-call
    /// ceiling of the client that produced the error, carried so the user
    /// message can name it.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_secs)
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_the_taxonomy() {
        let err = AutodrawError::Config("missing url".to_string());
        assert!(format!("{err}").contains("configuration error"));

        let err = AutodrawError::Timeout(30);
        assert_eq!(format!("{err}"), "request timed out after 30 seconds");

        let err = AutodrawError::Status {
            status: 503,
            detail: "overloaded".to_string(),
        };
        assert_eq!(format!("{err}"), "unexpected status 503: overloaded");
    }
}
