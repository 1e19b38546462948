//! Recursive copybook resolution.
//!
//! [`CopybookResolver::resolve`] and a dialect's
//! [`visit`](crate::DialectAdapter::visit) call each other through a
//! [`ResolutionContext`]: resolve parses a copybook and visits its tree,
//! visiting hands every copy statement back to resolve. The
//! [`ProcessedSet`] passed down the recursion holds the current chain, so a
//! copybook that includes itself, directly or through others, is reported
//! once at the occurrence that closes the loop.
//!
//! Every copybook gets its own [`TextTransformation`]. A resolved copybook's
//! transformation is spliced over the copy statement in the including
//! document; a missing or cyclic one blanks the statement instead.

mod context;
mod processed;
mod stack;
mod usages;

use std::sync::Arc;

use cbl_diagnostic::{
    DefaultMessages, ErrorAggregator, ErrorCode, ErrorSource, MessageService, SyntaxError,
};
use cbl_ir::{CopyNode, CopybookModel, Locality, LocalityMapper, Node, SourceText, Span};
use cbl_transform::TextTransformation;
use tracing::debug;

use crate::cancel::{CancellationToken, Completeness};
use crate::config::CopybookConfig;
use crate::dialect::DialectAdapter;
use crate::provider::CopybookProvider;

pub use context::ResolutionContext;
pub use processed::ProcessedSet;
pub use usages::link_usages;

use stack::ensure_sufficient_stack;

/// What the including document does with a copy statement.
#[derive(Debug)]
pub enum Expansion {
    /// Splice the copybook's transformation over the statement.
    Document(TextTransformation),
    /// Blank the statement text, keeping line breaks.
    Blank,
    /// Leave the statement as written (resolution was cancelled).
    Untouched,
}

/// Result of resolving one copy occurrence.
#[derive(Debug)]
pub struct ResolveOutcome {
    /// `None` for a cycle or a cancelled occurrence.
    pub node: Option<CopyNode>,
    /// Diagnostics from this occurrence and everything nested in it.
    pub errors: Vec<SyntaxError>,
    pub expansion: Expansion,
    pub completeness: Completeness,
}

/// Everything resolution produced for one top-level document.
#[derive(Debug)]
pub struct DocumentResolution {
    pub nodes: Vec<Node>,
    /// Deduplicated and ordered by document, then offset.
    pub errors: Vec<SyntaxError>,
    pub transformation: TextTransformation,
    pub completeness: Completeness,
}

impl DocumentResolution {
    pub fn extended_text(&self) -> String {
        self.transformation.calculate_extended_text()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.completeness.is_complete()
    }
}

impl LocalityMapper for DocumentResolution {
    fn map_offset(&self, offset: u32) -> Option<Locality> {
        self.transformation.map_offset(offset)
    }

    fn extended_len(&self) -> u32 {
        self.transformation.extended_len()
    }
}

/// Resolves copy statements against a [`CopybookProvider`].
///
/// The resolver itself is immutable and may be shared between threads;
/// all per-analysis state lives in the [`ProcessedSet`] and the
/// transformations passed through it.
#[derive(Clone)]
pub struct CopybookResolver {
    provider: Arc<dyn CopybookProvider>,
    messages: Arc<dyn MessageService>,
    config: CopybookConfig,
    cancel: CancellationToken,
}

impl CopybookResolver {
    pub fn new(provider: Arc<dyn CopybookProvider>) -> Self {
        CopybookResolver {
            provider,
            messages: Arc::new(DefaultMessages),
            config: CopybookConfig::default(),
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_messages(mut self, messages: Arc<dyn MessageService>) -> Self {
        self.messages = messages;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: CopybookConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn provider(&self) -> &dyn CopybookProvider {
        &*self.provider
    }

    pub fn messages(&self) -> &dyn MessageService {
        &*self.messages
    }

    pub fn config(&self) -> &CopybookConfig {
        &self.config
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Resolve a whole program: parse it, resolve every copy statement
    /// recursively and splice the expansions into one transformation.
    #[tracing::instrument(level = "debug", skip_all, fields(uri = %source.uri()))]
    pub fn resolve_document(
        &self,
        source: &SourceText,
        dialect: &dyn DialectAdapter,
    ) -> DocumentResolution {
        let mut transformation = TextTransformation::new(source.clone());
        if self.cancel.is_cancelled() {
            debug!("cancelled before parsing");
            return DocumentResolution {
                nodes: Vec::new(),
                errors: Vec::new(),
                transformation,
                completeness: Completeness::Cancelled,
            };
        }

        let tree = dialect.parse(source, self.messages());
        let mut errors = tree.errors().to_vec();
        let mut processed = ProcessedSet::new();
        let (mut nodes, completeness) = {
            let mut cx = ResolutionContext::new(
                self,
                dialect,
                &mut processed,
                source,
                &mut transformation,
                &mut errors,
            );
            let nodes = dialect.visit(&tree, &mut cx);
            (nodes, cx.completeness())
        };

        if self.config.mode.tracks_usages() {
            link_usages(&mut nodes);
        }

        let mut aggregator = ErrorAggregator::new();
        aggregator.extend(errors);
        let errors = aggregator.finish();
        debug!(
            nodes = nodes.len(),
            errors = errors.len(),
            complete = completeness.is_complete(),
            "document resolved"
        );
        DocumentResolution {
            nodes,
            errors,
            transformation,
            completeness,
        }
    }

    /// Resolve one copy occurrence of `model`.
    ///
    /// `occurrence` is the copy statement in the including document, which
    /// is where missing-copybook and cycle diagnostics are anchored.
    pub fn resolve(
        &self,
        model: &CopybookModel,
        parent_level: Option<u32>,
        occurrence: &Locality,
        processed: &mut ProcessedSet,
        dialect: &dyn DialectAdapter,
    ) -> ResolveOutcome {
        ensure_sufficient_stack(|| self.resolve_inner(model, parent_level, occurrence, processed, dialect))
    }

    fn resolve_inner(
        &self,
        model: &CopybookModel,
        parent_level: Option<u32>,
        occurrence: &Locality,
        processed: &mut ProcessedSet,
        dialect: &dyn DialectAdapter,
    ) -> ResolveOutcome {
        let name = &model.name;

        let Some(source) = model.source() else {
            debug!(copybook = %name, "copybook not found");
            let mut errors = Vec::new();
            if self.config.mode.reports_missing() {
                errors.push(self.copybook_error(ErrorCode::E2001, occurrence, name.display_name()));
            }
            return ResolveOutcome {
                node: None,
                errors,
                expansion: Expansion::Blank,
                completeness: Completeness::Complete,
            };
        };

        if processed.contains(name) {
            debug!(copybook = %name, chain = ?processed.chain(), "copybook cycle");
            return ResolveOutcome {
                node: None,
                errors: vec![self.copybook_error(ErrorCode::E2002, occurrence, name.display_name())],
                expansion: Expansion::Blank,
                completeness: Completeness::Complete,
            };
        }

        if self.cancel.is_cancelled() {
            debug!(copybook = %name, "cancelled before parsing copybook");
            return ResolveOutcome {
                node: None,
                errors: Vec::new(),
                expansion: Expansion::Untouched,
                completeness: Completeness::Cancelled,
            };
        }

        processed.enter(name.clone());
        debug!(copybook = %name, depth = processed.depth(), "entering copybook");

        let tree = dialect.parse(&source, self.messages());
        let mut errors = tree.errors().to_vec();
        let mut transformation = TextTransformation::new(source.clone());
        let (children, completeness) = {
            let mut cx = ResolutionContext::new(
                self,
                dialect,
                processed,
                &source,
                &mut transformation,
                &mut errors,
            );
            let children = dialect.visit(&tree, &mut cx);
            (children, cx.completeness())
        };

        processed.leave(name);

        let node = CopyNode::new(occurrence.clone(), name.clone())
            .with_parent_level(parent_level)
            .with_definition(source.locality(Span::point(0)))
            .with_children(children);
        ResolveOutcome {
            node: Some(node),
            errors,
            expansion: Expansion::Document(transformation),
            completeness,
        }
    }

    fn copybook_error(&self, code: ErrorCode, at: &Locality, arg: &str) -> SyntaxError {
        let message = self.messages.message(code, &[arg]);
        SyntaxError::new(code, ErrorSource::Copybook, at.clone(), message)
    }
}

impl std::fmt::Debug for CopybookResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CopybookResolver")
            .field("config", &self.config)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
