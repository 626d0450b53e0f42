use thiserror::Error;
use tokio::task::JoinError;

// A failed fetch is converted into a published Error state at the
// orchestrator boundary; a cancelled fetch is not surfaced as a state at all.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("{0}")]
    OperationFailed(String),
    #[error("operation cancelled")]
    Cancelled,
}

impl FetchError {
    pub(crate) fn from_join(err: JoinError, task: &str) -> Self {
        if err.is_cancelled() {
            FetchError::Cancelled
        } else {
            FetchError::OperationFailed(format!("{} task panicked", task))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_failed_displays_reason() {
        let err = FetchError::OperationFailed("Transaction API Failed".to_string());
        assert_eq!(err.to_string(), "Transaction API Failed");
    }

    #[test]
    fn test_cancelled_is_distinct_from_failure() {
        assert_ne!(
            FetchError::Cancelled,
            FetchError::OperationFailed("operation cancelled".to_string())
        );
    }
}
