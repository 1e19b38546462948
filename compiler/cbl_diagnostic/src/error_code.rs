//! Error codes for every diagnostic the front end reports.
//!
//! The first digit names the phase:
//! - E0xxx: copy statement syntax
//! - E2xxx: copybook resolution and text transformation

use std::fmt;

use crate::Severity;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ErrorCode {
    // Syntax (E0xxx)
    /// Copy statement missing its terminating period
    E0001,
    /// Copy statement missing the copybook name
    E0002,
    /// Malformed REPLACING clause
    E0003,

    // Copybook resolution (E2xxx)
    /// Copybook not found
    E2001,
    /// Circular copybook dependency
    E2002,
    /// Text transformation addressed an invalid locality
    E2003,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
        }
    }

    /// Severity of every diagnostic with this code.
    pub const fn default_severity(self) -> Severity {
        match self {
            ErrorCode::E2003 => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
