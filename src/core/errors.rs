//! QTOP-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, QtopError>;

/// Top-level error type for qtop.
///
/// Codes in the `QTOP-2xxx` range are contract violations: a collaborator
/// (snapshot source, column metadata, input routing) broke the agreed schema.
/// They are never recovered from inside the list view.
#[derive(Debug, Error)]
pub enum QtopError {
    #[error("[QTOP-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[QTOP-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[QTOP-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[QTOP-2001] snapshot entry {key:?} is missing column {column:?}")]
    MissingColumn { key: String, column: String },

    #[error("[QTOP-2002] unknown sort key selector {selector:?}")]
    UnknownSortKey { selector: char },

    #[error("[QTOP-2003] invalid column set: {details}")]
    InvalidColumns { details: String },

    #[error("[QTOP-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[QTOP-2102] snapshot decode failure for {path}: {details}")]
    SnapshotDecode { path: PathBuf, details: String },

    #[error("[QTOP-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[QTOP-3003] channel closed in component {component}")]
    ChannelClosed { component: &'static str },

    #[error("[QTOP-3004] terminal failure: {source}")]
    Terminal {
        #[source]
        source: std::io::Error,
    },
}

impl QtopError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "QTOP-1001",
            Self::MissingConfig { .. } => "QTOP-1002",
            Self::ConfigParse { .. } => "QTOP-1003",
            Self::MissingColumn { .. } => "QTOP-2001",
            Self::UnknownSortKey { .. } => "QTOP-2002",
            Self::InvalidColumns { .. } => "QTOP-2003",
            Self::Serialization { .. } => "QTOP-2101",
            Self::SnapshotDecode { .. } => "QTOP-2102",
            Self::Io { .. } => "QTOP-3002",
            Self::ChannelClosed { .. } => "QTOP-3003",
            Self::Terminal { .. } => "QTOP-3004",
        }
    }

    /// Whether this error means a collaborator violated the column schema or
    /// the input contract. These terminate the dashboard cycle.
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. } | Self::UnknownSortKey { .. } | Self::InvalidColumns { .. }
        )
    }

    /// Whether the snapshot source may succeed on its next poll.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::SnapshotDecode { .. })
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for QtopError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for QtopError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<toml::ser::Error> for QtopError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Serialization {
            context: "toml",
            details: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<QtopError> {
        vec![
            QtopError::InvalidConfig {
                details: String::new(),
            },
            QtopError::MissingConfig {
                path: PathBuf::new(),
            },
            QtopError::ConfigParse {
                context: "",
                details: String::new(),
            },
            QtopError::MissingColumn {
                key: String::new(),
                column: String::new(),
            },
            QtopError::UnknownSortKey { selector: 'x' },
            QtopError::InvalidColumns {
                details: String::new(),
            },
            QtopError::Serialization {
                context: "",
                details: String::new(),
            },
            QtopError::SnapshotDecode {
                path: PathBuf::new(),
                details: String::new(),
            },
            QtopError::Io {
                path: PathBuf::new(),
                source: std::io::Error::other("test"),
            },
            QtopError::ChannelClosed { component: "" },
            QtopError::Terminal {
                source: std::io::Error::other("test"),
            },
        ]
    }

    #[test]
    fn error_codes_are_unique() {
        let errors = all_variants();
        let codes: Vec<&str> = errors.iter().map(QtopError::code).collect();
        let unique: std::collections::HashSet<&&str> = codes.iter().collect();
        assert_eq!(
            codes.len(),
            unique.len(),
            "error codes must be unique: {codes:?}"
        );
    }

    #[test]
    fn display_carries_code_prefix() {
        for err in all_variants() {
            let rendered = err.to_string();
            assert!(
                rendered.starts_with(&format!("[{}]", err.code())),
                "{rendered} should start with its code"
            );
        }
    }

    #[test]
    fn contract_violations_are_not_retryable() {
        for err in all_variants() {
            if err.is_contract_violation() {
                assert!(!err.is_retryable(), "{} must not be retryable", err.code());
            }
        }
    }

    #[test]
    fn missing_column_message_names_key_and_column() {
        let err = QtopError::MissingColumn {
            key: "Q1".to_string(),
            column: "memory".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"Q1\""));
        assert!(msg.contains("\"memory\""));
        assert!(err.is_contract_violation());
    }

    #[test]
    fn io_helper_records_path() {
        let err = QtopError::io("/tmp/snap.json", std::io::Error::other("boom"));
        match err {
            QtopError::Io { path, .. } => assert_eq!(path, PathBuf::from("/tmp/snap.json")),
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
