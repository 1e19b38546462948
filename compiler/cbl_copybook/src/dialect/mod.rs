//! Dialect adapters.
//!
//! A dialect decides which copy directive forms exist and how they read.
//! Every adapter turns a document into a [`ParseTree`] (copy statements
//! plus the ordinary text between them, never failing) and walks that tree
//! to build [`Node`]s, handing each copy statement back to the resolver
//! through the [`ResolutionContext`].
//!
//! # Dialects
//!
//! - [`CobolDialect`]: `COPY name [IN lib] [SUPPRESS] [REPLACING a BY b ...].`
//! - [`IdmsDialect`]: `COPY IDMS [RECORD|FILE|MODULE|MAP] name.`
//! - [`DaCoDialect`]: `[level] COPY MAID name.`
//!
//! [`DialectSet`] combines the dialects enabled for a document. A form no
//! enabled dialect recognises is left alone, it is not an error.

mod cobol;
mod daco;
mod idms;
pub mod lexer;

use cbl_diagnostic::{ErrorCode, ErrorSource, MessageService, SyntaxError};
use cbl_ir::{CopybookName, DialectKind, Node, SourceText, Span};
use tracing::trace;

use crate::ResolutionContext;
use lexer::{Lexeme, Token};

pub use cobol::CobolDialect;
pub use daco::DaCoDialect;
pub use idms::IdmsDialect;

/// One `REPLACING a BY b` pair.
///
/// Operands match whole text words; separators between the words of a
/// multi-word operand are not significant. A pseudo-text tag such as
/// `==:PFX:==` or `==(PFX)==` also matches inside words.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Replacement {
    /// Operand text. Literals keep their quotes.
    pub from: String,
    pub to: String,
    pub partial: bool,
}

impl Replacement {
    pub fn pseudo_text(from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        let partial = is_tag(&from);
        Replacement {
            from,
            to: to.into(),
            partial,
        }
    }

    /// A word or literal operand.
    pub fn word(from: impl Into<String>, to: impl Into<String>) -> Self {
        Replacement {
            from: from.into(),
            to: to.into(),
            partial: false,
        }
    }
}

/// `:TAG:` or `(TAG)` with nothing but word characters inside.
fn is_tag(operand: &str) -> bool {
    let inner = operand
        .strip_prefix(':')
        .and_then(|rest| rest.strip_suffix(':'))
        .or_else(|| operand.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')));
    inner.is_some_and(|inner| {
        !inner.is_empty()
            && inner
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    })
}

/// A copy directive found in a document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CopyStatement {
    pub name: CopybookName,
    /// From `COPY` through the terminating period (or the last token read
    /// when the period is missing).
    pub span: Span,
    /// Level number written directly in front of the directive.
    pub parent_level: Option<u32>,
    pub replacing: Vec<Replacement>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeItem {
    Copy(CopyStatement),
    /// A run of ordinary text, trimmed of surrounding whitespace.
    Text(Span),
}

/// Best-effort parse of one document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseTree {
    items: Vec<TreeItem>,
    errors: Vec<SyntaxError>,
}

impl ParseTree {
    /// Interleave `statements` with the text between them.
    pub fn new(source: &SourceText, mut statements: Vec<CopyStatement>, errors: Vec<SyntaxError>) -> Self {
        statements.sort_by_key(|statement| statement.span.start);
        let mut items = Vec::with_capacity(statements.len() * 2 + 1);
        let mut cursor = 0;
        for statement in statements {
            if let Some(text) = trimmed(source, Span::new(cursor, statement.span.start.max(cursor))) {
                items.push(TreeItem::Text(text));
            }
            cursor = statement.span.end.max(cursor);
            items.push(TreeItem::Copy(statement));
        }
        if let Some(text) = trimmed(source, Span::new(cursor, source.len().max(cursor))) {
            items.push(TreeItem::Text(text));
        }
        ParseTree { items, errors }
    }

    pub fn items(&self) -> &[TreeItem] {
        &self.items
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn statements(&self) -> impl Iterator<Item = &CopyStatement> {
        self.items.iter().filter_map(|item| match item {
            TreeItem::Copy(statement) => Some(statement),
            TreeItem::Text(_) => None,
        })
    }
}

/// `span` without leading and trailing whitespace; `None` if nothing is left.
fn trimmed(source: &SourceText, span: Span) -> Option<Span> {
    let text = source.slice(span)?;
    let start_trim = text.len() - text.trim_start().len();
    let end_trim = text.len() - text.trim_end().len();
    if start_trim == text.len() {
        return None;
    }
    let start = span.start + u32::try_from(start_trim).ok()?;
    let end = span.end - u32::try_from(end_trim).ok()?;
    Some(Span::new(start, end))
}

/// Statements and syntax errors one dialect found in a token stream.
#[derive(Clone, Debug, Default)]
pub struct Scan {
    pub statements: Vec<CopyStatement>,
    pub errors: Vec<SyntaxError>,
}

pub trait DialectAdapter: Send + Sync {
    fn kind(&self) -> DialectKind;

    /// Find this dialect's copy statements. Never fails; malformed
    /// statements become syntax errors.
    fn scan(&self, source: &SourceText, lexemes: &[Lexeme], messages: &dyn MessageService) -> Scan;

    fn parse(&self, source: &SourceText, messages: &dyn MessageService) -> ParseTree {
        let lexemes = lexer::lex(source.text());
        let Scan { statements, errors } = self.scan(source, &lexemes, messages);
        trace!(
            uri = %source.uri(),
            dialect = %self.kind(),
            statements = statements.len(),
            errors = errors.len(),
            "parsed copy statements"
        );
        ParseTree::new(source, statements, errors)
    }

    /// Build the nodes of a parsed document, resolving copy statements in
    /// source order through `cx`.
    fn visit(&self, tree: &ParseTree, cx: &mut ResolutionContext<'_>) -> Vec<Node> {
        visit_items(tree, cx)
    }
}

/// Default tree walk: text runs become text nodes, copy statements are
/// resolved. Stops at the first copy statement after cancellation.
pub fn visit_items(tree: &ParseTree, cx: &mut ResolutionContext<'_>) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(tree.items().len());
    for item in tree.items() {
        match item {
            TreeItem::Text(span) => nodes.push(cx.text_node(*span)),
            TreeItem::Copy(statement) => {
                if cx.is_cancelled() {
                    break;
                }
                nodes.extend(cx.resolve_copy(statement));
            }
        }
    }
    nodes
}

/// The dialects enabled for a document, tried in precedence order.
///
/// Dialect-specific forms come first; plain COBOL is always present and
/// last. When two dialects claim overlapping text the earlier one wins.
pub struct DialectSet {
    dialects: Vec<Box<dyn DialectAdapter>>,
}

impl DialectSet {
    pub fn new(kinds: &[DialectKind]) -> Self {
        let mut ordered: Vec<DialectKind> = Vec::with_capacity(kinds.len() + 1);
        for &kind in kinds {
            if kind != DialectKind::Cobol && !ordered.contains(&kind) {
                ordered.push(kind);
            }
        }
        ordered.push(DialectKind::Cobol);
        DialectSet {
            dialects: ordered.into_iter().map(adapter_for).collect(),
        }
    }

    pub fn cobol() -> Self {
        DialectSet::new(&[])
    }

    pub fn kinds(&self) -> Vec<DialectKind> {
        self.dialects.iter().map(|dialect| dialect.kind()).collect()
    }
}

impl Default for DialectSet {
    fn default() -> Self {
        DialectSet::cobol()
    }
}

impl std::fmt::Debug for DialectSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DialectSet").field(&self.kinds()).finish()
    }
}

impl DialectAdapter for DialectSet {
    fn kind(&self) -> DialectKind {
        self.dialects
            .first()
            .map_or(DialectKind::Cobol, |dialect| dialect.kind())
    }

    fn scan(&self, source: &SourceText, lexemes: &[Lexeme], messages: &dyn MessageService) -> Scan {
        let mut merged = Scan::default();
        for dialect in &self.dialects {
            let scan = dialect.scan(source, lexemes, messages);
            for statement in scan.statements {
                let claimed = merged
                    .statements
                    .iter()
                    .any(|accepted| accepted.span.overlaps(statement.span));
                if claimed {
                    trace!(copybook = %statement.name, span = %statement.span, "statement claimed by another dialect");
                } else {
                    merged.statements.push(statement);
                }
            }
            merged.errors.extend(scan.errors);
        }
        merged.statements.sort_by_key(|statement| statement.span.start);
        merged.errors.sort_by_key(|error| error.locality.span.start);
        merged
    }
}

/// Adapter for a single dialect.
pub fn adapter_for(kind: DialectKind) -> Box<dyn DialectAdapter> {
    match kind {
        DialectKind::Cobol => Box::new(CobolDialect),
        DialectKind::Idms => Box::new(IdmsDialect),
        DialectKind::DaCo => Box::new(DaCoDialect),
    }
}

// -- Shared statement scanning --

/// Cursor-free helper the dialect scanners share: token access by index,
/// error construction and statement termination.
pub(crate) struct Scanner<'a> {
    source: &'a SourceText,
    lexemes: &'a [Lexeme],
    messages: &'a dyn MessageService,
    error_source: ErrorSource,
    scan: Scan,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(
        source: &'a SourceText,
        lexemes: &'a [Lexeme],
        messages: &'a dyn MessageService,
        error_source: ErrorSource,
    ) -> Self {
        Scanner {
            source,
            lexemes,
            messages,
            error_source,
            scan: Scan::default(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.lexemes.len()
    }

    #[inline]
    pub(crate) fn is(&self, index: usize, token: Token) -> bool {
        self.lexemes.get(index).is_some_and(|lexeme| lexeme.is(token))
    }

    pub(crate) fn span(&self, index: usize) -> Span {
        self.lexemes
            .get(index)
            .map_or_else(|| Span::point(self.source.len()), |lexeme| lexeme.span)
    }

    /// Operand text (literal quotes and pseudo-text delimiters stripped).
    pub(crate) fn text(&self, index: usize) -> &'a str {
        self.lexemes
            .get(index)
            .map_or("", |lexeme| lexer::operand_text(self.source.text(), lexeme))
    }

    /// REPLACING operand text: pseudo-text delimiters stripped, literal
    /// quotes kept.
    pub(crate) fn operand(&self, index: usize) -> &'a str {
        self.lexemes.get(index).map_or("", |lexeme| match lexeme.kind {
            Some(Token::PseudoText) => lexer::operand_text(self.source.text(), lexeme),
            _ => self.source.text().get(lexeme.span.to_range()).unwrap_or_default(),
        })
    }

    /// Whether the lexeme at `index` can name a copybook. The dialect
    /// keywords are ordinary names outside their own statement forms.
    pub(crate) fn is_name(&self, index: usize) -> bool {
        self.lexemes.get(index).and_then(|lexeme| lexeme.kind).is_some_and(|kind| {
            matches!(
                kind,
                Token::Word | Token::Number | Token::Literal | Token::Idms | Token::Maid
            )
        })
    }

    /// Whether the lexeme at `index` can be a REPLACING operand.
    pub(crate) fn is_operand(&self, index: usize) -> bool {
        self.lexemes
            .get(index)
            .and_then(|lexeme| lexeme.kind)
            .is_some_and(Token::is_operand)
    }

    /// Level number (`1`..`99`) directly before the `COPY` at `copy_index`,
    /// on the same line.
    pub(crate) fn level_before(&self, copy_index: usize) -> Option<u32> {
        let previous = self.lexemes.get(copy_index.checked_sub(1)?)?;
        let copy = self.lexemes.get(copy_index)?;
        if !previous.is(Token::Number) || previous.span.len() > 2 {
            return None;
        }
        let lines = self.source.lines();
        if lines.line_of(previous.span.start) != lines.line_of(copy.span.start) {
            return None;
        }
        self.source.slice(previous.span)?.parse().ok()
    }

    pub(crate) fn error(&mut self, span: Span, code: ErrorCode, args: &[&str]) {
        let message = self.messages.message(code, args);
        self.scan.errors.push(SyntaxError::new(
            code,
            self.error_source,
            self.source.locality(span),
            message,
        ));
    }

    /// End the statement that starts at `copy_index` and whose last consumed
    /// lexeme is `last`.
    ///
    /// Consumes the period at `last + 1` if there is one; otherwise reports
    /// `E0001` and ends the statement at `last`. Returns the statement span
    /// and the index to continue scanning from.
    pub(crate) fn finish(&mut self, copy_index: usize, last: usize, name: &str) -> (Span, usize) {
        let start = self.span(copy_index).start;
        if self.is(last + 1, Token::Period) {
            return (Span::new(start, self.span(last + 1).end), last + 2);
        }
        let span = Span::new(start, self.span(last).end.max(start));
        self.error(span, ErrorCode::E0001, &[name]);
        (span, last + 1)
    }

    pub(crate) fn push(&mut self, statement: CopyStatement) {
        self.scan.statements.push(statement);
    }

    pub(crate) fn into_scan(self) -> Scan {
        self.scan
    }
}
