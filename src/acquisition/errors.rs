// Error types for acquisition strategies

use std::path::PathBuf;

use thiserror::Error;

use super::strategies::diagnostics::{diagnose_error, BlockingReason};

#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// Input list file does not exist
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Input list exists but holds no URLs
    #[error("No input URLs: {0}")]
    NoInput(String),

    /// Remote search API answered with an error status
    #[error("API error {status}{}: {message}", .reason.as_deref().map(|r| format!(" ({})", r)).unwrap_or_default())]
    Api {
        status: u16,
        reason: Option<String>,
        message: String,
    },

    /// Transport failure talking to the remote search API
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// yt-dlp or python not found in system
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Command execution failed
    #[error("Execution error: {0}")]
    Execution(String),

    /// Failed to parse tool or API output
    #[error("Parse error: {0}")]
    Parse(String),

    /// YouTube refused the request
    #[error("Blocked ({}): {detail}", .reason.description())]
    Blocked {
        reason: BlockingReason,
        detail: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown error with details
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AcquisitionError {
    /// Whether the API rejected the call for quota or credential reasons
    pub fn is_quota_or_auth(&self) -> bool {
        match self {
            Self::Api { status, reason, .. } => {
                *status == 401
                    || *status == 403
                    || reason.as_deref().map_or(false, |r| {
                        r.contains("quota") || r.contains("key") || r.contains("Limit")
                    })
            }
            _ => false,
        }
    }

    /// Short advice for a blocked request, appended to failure logs
    pub fn blocking_hint(&self, proxied: bool) -> Option<&'static str> {
        let Self::Blocked { reason, .. } = self else {
            return None;
        };
        if reason.is_permanent() {
            Some("permanent, retrying will not help")
        } else if reason.proxy_might_help() && !proxied {
            Some("a proxy may help")
        } else if reason.is_transient() {
            Some("may succeed on a later run")
        } else {
            None
        }
    }
}

// Smart classification of raw stderr text
impl From<String> for AcquisitionError {
    fn from(s: String) -> Self {
        let lower = s.to_lowercase();

        if lower.contains("command not found") || lower.contains("no such file") {
            return Self::ToolNotFound(s);
        }

        if lower.contains("invalid json") || lower.contains("jsondecodeerror") {
            return Self::Parse(s);
        }

        match diagnose_error(&s) {
            Some(BlockingReason::Unknown) | None => Self::Unknown(s),
            Some(reason) => Self::Blocked { reason, detail: s },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_403_is_blocked() {
        let err = AcquisitionError::from("ERROR: HTTP Error 403: Forbidden".to_string());
        assert!(matches!(
            err,
            AcquisitionError::Blocked {
                reason: BlockingReason::Http403Forbidden,
                ..
            }
        ));
    }

    #[test]
    fn test_stderr_missing_tool() {
        let err = AcquisitionError::from("sh: yt-dlp: command not found".to_string());
        assert!(matches!(err, AcquisitionError::ToolNotFound(_)));
    }

    #[test]
    fn test_stderr_unclassified() {
        let err = AcquisitionError::from("something odd happened".to_string());
        assert!(matches!(err, AcquisitionError::Unknown(_)));
    }

    #[test]
    fn test_blocking_hint() {
        let gone = AcquisitionError::from("ERROR: Video unavailable".to_string());
        assert_eq!(gone.blocking_hint(false), Some("permanent, retrying will not help"));

        let forbidden = AcquisitionError::from("ERROR: HTTP Error 403: Forbidden".to_string());
        assert_eq!(forbidden.blocking_hint(false), Some("a proxy may help"));
        assert_eq!(forbidden.blocking_hint(true), Some("may succeed on a later run"));

        let age = AcquisitionError::from("Sign in to confirm your age".to_string());
        assert_eq!(age.blocking_hint(false), None);

        assert_eq!(AcquisitionError::Parse("bad".to_string()).blocking_hint(false), None);
    }

    #[test]
    fn test_quota_error_detection() {
        let err = AcquisitionError::Api {
            status: 403,
            reason: Some("quotaExceeded".to_string()),
            message: "The request cannot be completed because you have exceeded your quota."
                .to_string(),
        };
        assert!(err.is_quota_or_auth());
        assert!(err.to_string().contains("quotaExceeded"));

        let not_found = AcquisitionError::Api {
            status: 404,
            reason: Some("channelNotFound".to_string()),
            message: "not found".to_string(),
        };
        assert!(!not_found.is_quota_or_auth());
    }
}
