//! Error types for the outlook mirror.

/// Top-level error type for the refresh pipeline and cache reader.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// Network error, timeout or non-success status while fetching a resource.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Downloaded payload could not be opened or expanded as an archive.
    #[error("archive error: {0}")]
    Archive(String),

    /// Staged files could not be moved into the cache directory.
    #[error("install error: {0}")]
    Install(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Scheduler error (start guard, task join).
    #[error("scheduler error: {0}")]
    Scheduler(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a per-resource failure, reported per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network error, timeout or non-success status. Retried next cycle.
    TransientFetch,
    /// Archive failed to expand. Treated like a transient failure.
    MalformedPayload,
    /// Local filesystem or configuration problem.
    Local,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TransientFetch => write!(f, "transient_fetch"),
            Self::MalformedPayload => write!(f, "malformed_payload"),
            Self::Local => write!(f, "local"),
        }
    }
}

impl MirrorError {
    /// Returns the failure class used in cycle reports.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Fetch(_) => FailureKind::TransientFetch,
            Self::Archive(_) => FailureKind::MalformedPayload,
            Self::Install(_) | Self::Config(_) | Self::Scheduler(_) | Self::Io(_) => {
                FailureKind::Local
            }
        }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, MirrorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_fetch() {
        let err = MirrorError::Fetch("HTTP 500 for Day1".into());
        assert_eq!(err.to_string(), "fetch error: HTTP 500 for Day1");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: MirrorError = io.into();
        assert!(matches!(err, MirrorError::Io(_)));
        assert_eq!(err.kind(), FailureKind::Local);
    }

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            MirrorError::Fetch(String::new()).kind(),
            FailureKind::TransientFetch
        );
        assert_eq!(
            MirrorError::Archive(String::new()).kind(),
            FailureKind::MalformedPayload
        );
        assert_eq!(MirrorError::Install(String::new()).kind(), FailureKind::Local);
    }

    #[test]
    fn failure_kind_display() {
        assert_eq!(FailureKind::TransientFetch.to_string(), "transient_fetch");
        assert_eq!(FailureKind::MalformedPayload.to_string(), "malformed_payload");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MirrorError>();
    }
}
