use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("neighborhood request cannot be constructed: {0}")]
    UnsupportedEnvironment(String),

    #[error("neighborhood request for {focus_node} failed: {reason}")]
    Network { focus_node: String, reason: String },
}

impl FetchError {
    pub(super) fn network(focus_node: &str, reason: impl ToString) -> Self {
        Self::Network {
            focus_node: focus_node.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_display() {
        let err = FetchError::network("abc", "connection refused");

        assert_eq!(
            err.to_string(),
            "neighborhood request for abc failed: connection refused"
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn unsupported_environment_is_final() {
        let err = FetchError::UnsupportedEnvironment("relative URL without a base".to_string());

        assert!(err.to_string().contains("cannot be constructed"));
        assert!(!err.is_retryable());
    }
}
