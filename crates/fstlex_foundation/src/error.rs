//! Error types for the fstlex system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// The main error type for fstlex operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an analyzer-unavailable error (the process could not be spawned).
    #[must_use]
    pub fn analyzer_unavailable(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::AnalyzerUnavailable {
            command: command.into(),
            reason: reason.into(),
        })
    }

    /// Creates an analyzer-timeout error (the process was killed).
    #[must_use]
    pub fn analyzer_timeout(command: impl Into<String>, timeout: Duration) -> Self {
        Self::new(ErrorKind::AnalyzerTimeout {
            command: command.into(),
            timeout,
        })
    }

    /// Creates an error for a backend that has no inverse transducer.
    #[must_use]
    pub fn inverse_unavailable(backend: impl Into<String>) -> Self {
        Self::new(ErrorKind::InverseUnavailable(backend.into()))
    }

    /// Creates an invalid tagset key error.
    #[must_use]
    pub fn invalid_tagset_key(key: impl Into<String>, available: Vec<String>) -> Self {
        Self::new(ErrorKind::InvalidTagsetKey {
            key: key.into(),
            available,
        })
    }

    /// Creates an invalid pattern error.
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        })
    }

    /// Creates a rule file syntax error.
    #[must_use]
    pub fn rule_syntax(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RuleFileSyntax {
            path: path.into(),
            message: message.into(),
        })
    }

    /// Creates a rule reference error.
    #[must_use]
    pub fn rule_reference(path: impl Into<PathBuf>, reference: impl Into<String>) -> Self {
        Self::new(ErrorKind::RuleReference {
            path: path.into(),
            reference: reference.into(),
        })
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config(message.into()))
    }

    /// Creates an I/O error tied to a path.
    #[must_use]
    pub fn io(path: &Path, err: &std::io::Error) -> Self {
        Self::new(ErrorKind::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Returns true for per-request analyzer failures.
    #[must_use]
    pub fn is_analyzer_failure(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::AnalyzerUnavailable { .. }
                | ErrorKind::AnalyzerTimeout { .. }
                | ErrorKind::InverseUnavailable(_)
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The analyzer process could not be spawned.
    #[error("analyzer unavailable: `{command}`: {reason}")]
    AnalyzerUnavailable {
        /// The command line that was attempted.
        command: String,
        /// Why spawning failed.
        reason: String,
    },

    /// The analyzer exceeded its time bound and was killed.
    #[error("analyzer timed out after {timeout:?}: `{command}`")]
    AnalyzerTimeout {
        /// The command line that was running.
        command: String,
        /// The bound that was exceeded.
        timeout: Duration,
    },

    /// The backend has no inverse (generation) transducer.
    #[error("inverse lookups not available for {0}")]
    InverseUnavailable(String),

    /// Lookup of a tagset name that is not configured.
    #[error("invalid tagset <{key}>. Choose one of: {}", available.join(", "))]
    InvalidTagsetKey {
        /// The requested tagset name.
        key: String,
        /// The configured tagset names.
        available: Vec<String>,
    },

    /// A regex tag part failed to compile.
    #[error("invalid tag pattern `{pattern}`: {message}")]
    InvalidPattern {
        /// The pattern source.
        pattern: String,
        /// The compiler message.
        message: String,
    },

    /// A rule file header could not be parsed.
    #[error("problem reading paradigm rule condition in {}: {message}", path.display())]
    RuleFileSyntax {
        /// The rule file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A rule file references a base paradigm that does not exist.
    #[error("{} references a paradigm file ({reference}) that does not exist", path.display())]
    RuleReference {
        /// The referencing file.
        path: PathBuf,
        /// The missing basename.
        reference: String,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem error.
    #[error("i/o error at {}: {message}", path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error message.
        message: String,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Language code the operation ran for.
    pub language: Option<String>,
    /// Source file or rule name.
    pub source: Option<String>,
    /// Chain of operations that led to the error.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the language code.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(language) = &self.language {
            write!(f, "[{language}]")?;
        }
        if let Some(source) = &self.source {
            write!(f, " at {source}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}

/// Result type alias for fstlex operations.
pub type Result<T> = std::result::Result<T, Error>;
