//! Per-document state threaded through a dialect's tree walk.

use cbl_diagnostic::{ErrorCode, ErrorSource, SyntaxError};
use cbl_ir::{Locality, Node, SourceText, Span, TextNode};
use cbl_transform::TextTransformation;
use tracing::warn;

use super::{CopybookResolver, Expansion, ProcessedSet};
use crate::cancel::Completeness;
use crate::dialect::{CopyStatement, DialectAdapter};
use crate::replacing::apply_replacements;

/// What a dialect's [`visit`](DialectAdapter::visit) sees while walking one
/// document: the document, its transformation, the cycle chain and the
/// resolver to hand copy statements back to.
pub struct ResolutionContext<'a> {
    resolver: &'a CopybookResolver,
    dialect: &'a dyn DialectAdapter,
    processed: &'a mut ProcessedSet,
    document: &'a SourceText,
    transformation: &'a mut TextTransformation,
    errors: &'a mut Vec<SyntaxError>,
    completeness: Completeness,
}

impl<'a> ResolutionContext<'a> {
    pub(crate) fn new(
        resolver: &'a CopybookResolver,
        dialect: &'a dyn DialectAdapter,
        processed: &'a mut ProcessedSet,
        document: &'a SourceText,
        transformation: &'a mut TextTransformation,
        errors: &'a mut Vec<SyntaxError>,
    ) -> Self {
        ResolutionContext {
            resolver,
            dialect,
            processed,
            document,
            transformation,
            errors,
            completeness: Completeness::Complete,
        }
    }

    /// Poll the cancellation token. Once it fires the walk is marked
    /// incomplete.
    pub fn is_cancelled(&mut self) -> bool {
        if self.resolver.cancellation().is_cancelled() {
            self.completeness = Completeness::Cancelled;
            return true;
        }
        false
    }

    pub fn text_node(&self, span: Span) -> Node {
        Node::Text(TextNode {
            locality: self.document.locality(span),
        })
    }

    /// Resolve one copy statement and splice its expansion into this
    /// document's transformation.
    pub fn resolve_copy(&mut self, statement: &CopyStatement) -> Option<Node> {
        let model = self.resolver.provider().lookup(&statement.name);
        let occurrence = self.document.locality(statement.span);
        let outcome = self.resolver.resolve(
            &model,
            statement.parent_level,
            &occurrence,
            &mut *self.processed,
            self.dialect,
        );
        self.errors.extend(outcome.errors);
        self.completeness = self.completeness.and(outcome.completeness);

        let edit = match outcome.expansion {
            Expansion::Document(mut expansion) => {
                if !statement.replacing.is_empty() {
                    apply_replacements(&mut expansion, &statement.replacing);
                }
                self.transformation.extend(&occurrence, expansion)
            }
            Expansion::Blank => self
                .transformation
                .replace(&occurrence, blank(self.document, statement.span)),
            Expansion::Untouched => Ok(()),
        };
        if let Err(err) = edit {
            warn!(%err, copybook = %statement.name, "copy expansion not applied");
            let locality: &Locality = err.locality();
            let message = self
                .resolver
                .messages()
                .message(ErrorCode::E2003, &[&locality.to_string()]);
            self.errors.push(SyntaxError::new(
                ErrorCode::E2003,
                ErrorSource::Copybook,
                locality.clone(),
                message,
            ));
        }
        outcome.node.map(Node::Copy)
    }

    pub(crate) fn completeness(&self) -> Completeness {
        self.completeness
    }
}

/// The statement text with everything but line breaks turned into spaces,
/// so later lines keep their line numbers in the expanded text.
fn blank(document: &SourceText, span: Span) -> String {
    document
        .slice(span)
        .unwrap_or_default()
        .chars()
        .map(|c| if c == '\n' || c == '\r' { c } else { ' ' })
        .collect()
}
