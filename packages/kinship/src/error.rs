//! Error types for kinship

use crate::graph::NodeId;
use std::fmt;
use thiserror::Error;

/// Boxed error returned by caller-supplied derive callbacks
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A derive callback failed
    Derive,
    /// The operation was cancelled before completion
    Cancelled,
    /// An edge exists in only one direction
    Consistency,
    /// Invalid pipeline configuration
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Derive => "derive",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Consistency => "consistency",
            ErrorKind::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for graph building and family discovery
#[derive(Debug, Error)]
pub enum KinshipError {
    /// The derive callback failed for the pair at (`left`, `right`)
    #[error("Derive failed for pair ({left}, {right}): {source}")]
    Derive {
        left: usize,
        right: usize,
        #[source]
        source: BoxError,
    },

    /// Cancellation fired before the operation completed
    #[error("Operation cancelled")]
    Cancelled,

    /// `from -> to` exists but `to -> from` does not.
    ///
    /// Only reachable through raw edge mutation; the graph operations
    /// themselves keep edges mutual.
    #[error("Consistency violation: edge {from} -> {to} has no reverse edge")]
    ConsistencyViolation { from: NodeId, to: NodeId },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KinshipError {
    /// Wrap a derive callback failure
    pub fn derive(left: usize, right: usize, source: impl Into<BoxError>) -> Self {
        KinshipError::Derive {
            left,
            right,
            source: source.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        KinshipError::Config(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            KinshipError::Derive { .. } => ErrorKind::Derive,
            KinshipError::Cancelled => ErrorKind::Cancelled,
            KinshipError::ConsistencyViolation { .. } => ErrorKind::Consistency,
            KinshipError::Config(_) => ErrorKind::Config,
        }
    }

    /// Fatal errors signal a corrupted graph, not a failed computation.
    /// Callers should not retry or branch on them.
    pub fn is_fatal(&self) -> bool {
        matches!(self, KinshipError::ConsistencyViolation { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, KinshipError>;
