//! Core value types for COBOL copybook analysis.
//!
//! - [`Span`]: byte ranges inside one document
//! - [`SourceText`]: immutable document snapshots with line tables
//! - [`Locality`]: document-tagged ranges, the unit of every reported position
//! - [`CopybookName`] / [`CopybookModel`]: copybook identity and provider results
//! - [`Node`] / [`CopyNode`]: the include-structured tree produced by resolution
//! - [`LocalityMapper`]: reverse mapping from expanded text to source
//!
//! Everything here is a value: cheap to clone, `Eq + Hash`, and free of
//! interior mutability, so analysis results can be shared across threads.

mod copybook;
mod document;
mod line_index;
mod locality;
pub mod node;
mod span;

pub use copybook::{CopybookModel, CopybookName, DialectKind, UnknownDialect};
pub use document::{DocumentUri, SourceText};
pub use line_index::{LineIndex, Position, Range};
pub use locality::{Locality, LocalityMapper};
pub use node::{copy_nodes, CopyNode, Node, TextNode};
pub use span::{Span, SpanError};
