//! Copybook resolution for COBOL and its dialects.
//!
//! Given a program's text, the enabled dialects and a [`CopybookProvider`],
//! [`CopybookResolver::resolve_document`] finds every copy statement,
//! resolves the copybooks it names recursively, reports missing and cyclic
//! copybooks, and produces:
//!
//! - the include-structured node tree ([`cbl_ir::Node`])
//! - the fully expanded text as a [`cbl_transform::TextTransformation`],
//!   which maps every expanded offset back to the document it came from
//! - ordered, deduplicated diagnostics
//!
//! The crate performs no I/O. Resolution is cooperative with
//! [`CancellationToken`] and returns partial results tagged
//! [`Completeness::Cancelled`] when stopped.

mod cancel;
mod config;
pub mod dialect;
mod provider;
mod replacing;
mod resolver;

pub use cancel::{CancellationToken, Completeness};
pub use config::{CopybookConfig, CopybookProcessingMode, UnknownMode};
pub use dialect::{
    adapter_for, visit_items, CobolDialect, CopyStatement, DaCoDialect, DialectAdapter,
    DialectSet, IdmsDialect, ParseTree, Replacement, Scan, TreeItem,
};
pub use provider::{CachingCopybookProvider, CopybookProvider, InMemoryCopybooks};
pub use replacing::apply_replacements;
pub use resolver::{
    link_usages, CopybookResolver, DocumentResolution, Expansion, ProcessedSet,
    ResolutionContext, ResolveOutcome,
};
