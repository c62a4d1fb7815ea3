//! Error types for prref-core

use std::fmt;

/// Result type alias for prref operations
pub type Result<T> = std::result::Result<T, Error>;

/// Why the classifier refused a candidate reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[repr(u8)]
pub enum RejectReason {
    /// Longer than 255 UTF-16 code units
    #[error("reference exceeds 255 characters")]
    TooLong,
    /// Shaped like a version but not valid SemVer (e.g. leading zeros)
    #[error("reference looks like a version but is not valid SemVer")]
    MalformedVersionLike,
    /// Not a commit hash, SemVer tag, or safe branch/tag name
    #[error("reference is not a valid commit hash, version tag, or branch name")]
    InvalidFormat,
}

impl RejectReason {
    /// Stable identifier used in logs and JSON output
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TooLong => "TooLong",
            Self::MalformedVersionLike => "MalformedVersionLike",
            Self::InvalidFormat => "InvalidFormat",
        }
    }
}

/// Main error type for prref operations
#[derive(Debug)]
pub enum Error {
    /// A candidate found for a target failed validation
    Validation {
        /// Target whose candidate was rejected
        target: String,
        /// The raw candidate text
        candidate: String,
        /// Classifier verdict
        reason: RejectReason,
    },

    /// Invalid target registry or CLI configuration
    Config(String),

    /// Extraction pattern failed to compile
    Pattern(String),

    /// The pull request text could not be obtained
    SourceUnavailable(String),

    /// GitHub event payload parsing error
    EventParse(String),

    /// I/O error
    Io(std::io::Error),

    /// YAML parsing error
    Yaml(String),

    /// Runtime error (Tokio)
    Runtime(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation {
                target,
                candidate,
                reason,
            } => write!(
                f,
                "Invalid reference for '{}' ({}): '{}': {}",
                target,
                reason.as_str(),
                candidate,
                reason
            ),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Pattern(msg) => write!(f, "Pattern error: {}", msg),
            Error::SourceUnavailable(msg) => write!(f, "Source unavailable: {}", msg),
            Error::EventParse(msg) => write!(f, "Event parse error: {}", msg),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Yaml(msg) => write!(f, "YAML error: {}", msg),
            Error::Runtime(msg) => write!(f, "Runtime error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Validation { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml(err.to_string())
    }
}

/// Fieldless error category for zero-cost pattern matching.
///
/// Single byte representation (`#[repr(u8)]`), `Copy`, no allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorKind {
    /// Reference validation failure
    Validation,
    /// Configuration error
    Config,
    /// Pattern compilation error
    Pattern,
    /// Pull request text unavailable
    SourceUnavailable,
    /// Event payload parsing error
    EventParse,
    /// I/O operation error
    Io,
    /// YAML parsing error
    Yaml,
    /// Runtime error
    Runtime,
}

impl Error {
    /// Get the error kind, zero allocation.
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Config(_) => ErrorKind::Config,
            Error::Pattern(_) => ErrorKind::Pattern,
            Error::SourceUnavailable(_) => ErrorKind::SourceUnavailable,
            Error::EventParse(_) => ErrorKind::EventParse,
            Error::Io(_) => ErrorKind::Io,
            Error::Yaml(_) => ErrorKind::Yaml,
            Error::Runtime(_) => ErrorKind::Runtime,
        }
    }

    /// Borrow the error message, zero allocation.
    #[inline]
    pub fn message(&self) -> &str {
        match self {
            Error::Config(msg)
            | Error::Pattern(msg)
            | Error::SourceUnavailable(msg)
            | Error::EventParse(msg)
            | Error::Yaml(msg)
            | Error::Runtime(msg) => msg,
            Error::Validation { reason, .. } => reason.as_str(),
            Error::Io(_) => "I/O error",
        }
    }

    /// Name of the target that failed validation, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            Error::Validation { target, .. } => Some(target),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_is_copy() {
        let err = Error::Config("test".to_string());
        let k = err.kind();
        let k2 = k;
        assert_eq!(k, k2);
    }

    #[test]
    fn test_error_kind_repr_u8() {
        assert_eq!(std::mem::size_of::<ErrorKind>(), 1);
        assert_eq!(std::mem::size_of::<RejectReason>(), 1);
    }

    #[test]
    fn test_validation_display_names_target_and_reason() {
        let err = Error::Validation {
            target: "solana".into(),
            candidate: "v1.02".into(),
            reason: RejectReason::MalformedVersionLike,
        };
        let display = err.to_string();
        assert!(display.contains("'solana'"));
        assert!(display.contains("MalformedVersionLike"));
        assert!(display.contains("v1.02"));
        assert_eq!(err.message(), "MalformedVersionLike");
        assert_eq!(err.target(), Some("solana"));
    }

    #[test]
    fn test_validation_source_is_reason() {
        use std::error::Error as _;
        let err = Error::Validation {
            target: "core".into(),
            candidate: "a..b".into(),
            reason: RejectReason::InvalidFormat,
        };
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source, Some(RejectReason::InvalidFormat.to_string()));
    }

    #[test]
    fn test_all_error_variants_have_kind() {
        let cases: Vec<(Error, ErrorKind)> = vec![
            (
                Error::Validation {
                    target: "t".into(),
                    candidate: "c".into(),
                    reason: RejectReason::TooLong,
                },
                ErrorKind::Validation,
            ),
            (Error::Config("c".into()), ErrorKind::Config),
            (Error::Pattern("p".into()), ErrorKind::Pattern),
            (
                Error::SourceUnavailable("s".into()),
                ErrorKind::SourceUnavailable,
            ),
            (Error::EventParse("ep".into()), ErrorKind::EventParse),
            (Error::Io(std::io::Error::other("io")), ErrorKind::Io),
            (Error::Yaml("y".into()), ErrorKind::Yaml),
            (Error::Runtime("r".into()), ErrorKind::Runtime),
        ];

        for (err, expected_kind) in cases {
            assert_eq!(err.kind(), expected_kind, "Mismatch for {:?}", err);
        }
    }

    #[test]
    fn test_error_messages_never_contain_token_patterns() {
        let token_patterns = ["ghp_", "gho_", "ghs_", "github_pat_", "Bearer "];
        let errors: Vec<Error> = vec![
            Error::Config("config error".into()),
            Error::SourceUnavailable("GitHub API returned 404 Not Found".into()),
            Error::Runtime("runtime error".into()),
        ];

        for err in &errors {
            let display = format!("{}", err);
            let debug = format!("{:?}", err);
            for pattern in &token_patterns {
                assert!(!err.message().contains(pattern));
                assert!(!display.contains(pattern));
                assert!(!debug.contains(pattern));
            }
        }
    }
}
