//! Diagnostics for COBOL copybook analysis.
//!
//! - [`ErrorCode`]: phase-numbered codes for searchability
//! - [`SyntaxError`]: code, severity, source stage, locality and message
//! - [`MessageService`]: pluggable message catalogue
//! - [`ErrorAggregator`]: dedup + deterministic ordering across all stages

pub mod aggregator;
mod diagnostic;
mod error_code;
pub mod message;

pub use aggregator::{by_document, ErrorAggregator};
pub use diagnostic::{ErrorSource, Severity, SyntaxError};
pub use error_code::ErrorCode;
pub use message::{DefaultMessages, MessageService};
