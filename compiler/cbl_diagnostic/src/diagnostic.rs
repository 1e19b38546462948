//! The diagnostic value every phase reports.

use std::fmt;

use cbl_ir::Locality;

use crate::ErrorCode;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Information => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

/// Which stage produced a diagnostic.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ErrorSource {
    /// The base COBOL grammar.
    Parsing,
    /// A dialect-specific grammar (IDMS, DaCo).
    Dialect,
    /// Copybook resolution and text transformation.
    Copybook,
}

impl fmt::Display for ErrorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSource::Parsing => write!(f, "parsing"),
            ErrorSource::Dialect => write!(f, "dialect"),
            ErrorSource::Copybook => write!(f, "copybook"),
        }
    }
}

/// A diagnostic anchored at a locality of the document that contains the
/// offending text.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct SyntaxError {
    pub code: ErrorCode,
    pub severity: Severity,
    pub source: ErrorSource,
    pub locality: Locality,
    pub message: String,
}

impl SyntaxError {
    pub fn new(
        code: ErrorCode,
        source: ErrorSource,
        locality: Locality,
        message: impl Into<String>,
    ) -> Self {
        SyntaxError {
            code,
            severity: code.default_severity(),
            source,
            locality,
            message: message.into(),
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {} ({}, {})",
            self.severity, self.code, self.message, self.source, self.locality
        )
    }
}
