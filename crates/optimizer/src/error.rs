// ABOUTME: Error types for the optimizer including ErrorCode enum and OptimizeError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of optimizer failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    MalformedDocument,
    Config,
    Io,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::MalformedDocument => "malformed document",
            ErrorCode::Config => "invalid configuration",
            ErrorCode::Io => "io error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for optimizer operations.
#[derive(Debug, thiserror::Error)]
pub struct OptimizeError {
    pub code: ErrorCode,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for OptimizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "amp-optimizer: {}: {}", self.op, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl OptimizeError {
    /// Create a MalformedDocument error naming the element that is missing.
    pub fn malformed_document(op: impl Into<String>, missing: &str) -> Self {
        Self {
            code: ErrorCode::MalformedDocument,
            op: op.into(),
            source: Some(anyhow::anyhow!("missing <{}> element", missing)),
        }
    }

    /// Create a Config error.
    pub fn config(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::Config,
            op: op.into(),
            source,
        }
    }

    /// Create an Io error.
    pub fn io(op: impl Into<String>, source: std::io::Error) -> Self {
        Self {
            code: ErrorCode::Io,
            op: op.into(),
            source: Some(source.into()),
        }
    }

    /// Returns true if this is a MalformedDocument error.
    pub fn is_malformed_document(&self) -> bool {
        self.code == ErrorCode::MalformedDocument
    }

    /// Returns true if this is a Config error.
    pub fn is_config(&self) -> bool {
        self.code == ErrorCode::Config
    }

    /// Returns true if this is an Io error.
    pub fn is_io(&self) -> bool {
        self.code == ErrorCode::Io
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OptimizeError>;
