//! Error types for the advisor pipeline

use thiserror::Error;

/// Exit status for a clean run.
pub const STATUS_OK: i32 = 0;
/// Exit status for caller-caused configuration failures.
pub const STATUS_CONFIGURATION: i32 = 2;
/// Exit status for unknown/internal failures (transport, decode, panics).
pub const STATUS_UNKNOWN: i32 = 3;

/// Errors produced by the advisor pipeline.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// Caller-caused misconfiguration. Never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A backend call failed at the transport layer.
    #[error("{operation}: transport error")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// A backend answered with a non-success status.
    #[error("{operation}: backend returned {status}: {body}")]
    Api {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// A returned row did not match the expected record shape.
    #[error("failed to decode {target} row")]
    Decode {
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A concurrent task died outside its own error path.
    #[error("task failed: {0}")]
    Internal(String),
}

impl AdvisorError {
    /// Process exit status, distinguishing configuration failures from
    /// unknown/internal ones.
    pub fn exit_status(&self) -> i32 {
        match self {
            AdvisorError::Configuration(_) => STATUS_CONFIGURATION,
            _ => STATUS_UNKNOWN,
        }
    }
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_map_to_their_own_status() {
        let err = AdvisorError::Configuration("empty projection".to_string());
        assert_eq!(err.exit_status(), STATUS_CONFIGURATION);
    }

    #[test]
    fn backend_errors_map_to_unknown_status() {
        let err = AdvisorError::Api {
            operation: "resource graph query",
            status: 429,
            body: "throttled".to_string(),
        };
        assert_eq!(err.exit_status(), STATUS_UNKNOWN);

        let err = AdvisorError::Internal("join error".to_string());
        assert_eq!(err.exit_status(), STATUS_UNKNOWN);
    }
}
