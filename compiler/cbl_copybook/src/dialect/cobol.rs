//! Plain COBOL copy statements.
//!
//! ```text
//! COPY name [IN|OF library] [SUPPRESS] [REPLACING operand BY operand ...].
//! ```
//!
//! `COPY IDMS name` and `COPY MAID name` belong to other dialects and are
//! skipped. Without a following name, `IDMS` or `MAID` is the copybook name.

use cbl_diagnostic::{ErrorCode, ErrorSource, MessageService};
use cbl_ir::{CopybookName, DialectKind, SourceText, Span};

use super::lexer::{Lexeme, Token};
use super::{CopyStatement, DialectAdapter, Replacement, Scan, Scanner};

#[derive(Copy, Clone, Debug, Default)]
pub struct CobolDialect;

impl DialectAdapter for CobolDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Cobol
    }

    fn scan(&self, source: &SourceText, lexemes: &[Lexeme], messages: &dyn MessageService) -> Scan {
        let mut scanner = Scanner::new(source, lexemes, messages, ErrorSource::Parsing);
        let mut i = 0;
        while i < scanner.len() {
            if !scanner.is(i, Token::Copy) {
                i += 1;
                continue;
            }
            let other_dialect = scanner.is(i + 1, Token::Idms) || scanner.is(i + 1, Token::Maid);
            if other_dialect && scanner.is_name(i + 2) {
                i += 2;
                continue;
            }
            i = statement(&mut scanner, i);
        }
        scanner.into_scan()
    }
}

/// Parse the statement starting at `copy`; returns where scanning resumes.
fn statement(scanner: &mut Scanner<'_>, copy: usize) -> usize {
    let name_index = copy + 1;
    if !scanner.is_name(name_index) {
        let span = scanner.span(copy);
        scanner.error(span, ErrorCode::E0002, &[]);
        return copy + 1;
    }
    let name = scanner.text(name_index);
    let mut last = name_index;

    // IN / OF library: accepted and ignored
    if scanner.is(last + 1, Token::In) || scanner.is(last + 1, Token::Of) {
        last += 1;
        if scanner.is_name(last + 1) {
            last += 1;
        }
    }
    if scanner.is(last + 1, Token::Suppress) {
        last += 1;
    }
    let mut replacing = Vec::new();
    if scanner.is(last + 1, Token::Replacing) {
        last = replacing_clause(scanner, last + 1, &mut replacing);
    }

    let (span, next) = scanner.finish(copy, last, name);
    let parent_level = scanner.level_before(copy);
    scanner.push(CopyStatement {
        name: CopybookName::new(name, DialectKind::Cobol),
        span,
        parent_level,
        replacing,
    });
    next
}

/// Parse `operand BY operand ...` after the REPLACING keyword at `keyword`.
/// Returns the index of the last lexeme that belongs to the clause.
fn replacing_clause(scanner: &mut Scanner<'_>, keyword: usize, pairs: &mut Vec<Replacement>) -> usize {
    let mut last = keyword;
    while scanner.is_operand(last + 1) && scanner.is(last + 2, Token::By) && scanner.is_operand(last + 3) {
        let from = last + 1;
        let to = last + 3;
        let (from_text, to_text) = (scanner.operand(from), scanner.operand(to));
        pairs.push(if scanner.is(from, Token::PseudoText) {
            Replacement::pseudo_text(from_text, to_text)
        } else {
            Replacement::word(from_text, to_text)
        });
        last = to;
    }

    if pairs.is_empty() {
        let span = scanner.span(keyword);
        scanner.error(span, ErrorCode::E0003, &["expected `operand BY operand`"]);
    }
    // An unfinished pair: report it and skip to the period.
    if scanner.is_operand(last + 1) || scanner.is(last + 1, Token::By) {
        let start = scanner.span(last + 1).start;
        let mut end = last + 1;
        while end + 1 < scanner.len() && !scanner.is(end + 1, Token::Period) && !scanner.is(end + 1, Token::Copy) {
            end += 1;
        }
        let span = Span::new(start, scanner.span(end).end);
        scanner.error(span, ErrorCode::E0003, &["incomplete replacement pair"]);
        last = end;
    }
    last
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dialect::TreeItem;
    use cbl_diagnostic::DefaultMessages;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> (SourceText, crate::dialect::ParseTree) {
        let source = SourceText::new("prog", text);
        let tree = CobolDialect.parse(&source, &DefaultMessages);
        (source, tree)
    }

    #[test]
    fn simple_copy() {
        let (source, tree) = parse("       COPY TEST.\n");
        let statements: Vec<_> = tree.statements().collect();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].name.qualified_name(), "TEST");
        assert_eq!(source.slice(statements[0].span), Some("COPY TEST."));
        assert!(tree.errors().is_empty());
    }

    #[test]
    fn library_suppress_and_literal_names() {
        let (_, tree) = parse("COPY \"book1\" OF LIB SUPPRESS. COPY B2 IN 'lib'.");
        let names: Vec<&str> = tree.statements().map(|s| s.name.qualified_name()).collect();
        assert_eq!(names, vec!["BOOK1", "B2"]);
        assert!(tree.errors().is_empty());
    }

    #[test]
    fn replacing_pairs() {
        let (_, tree) = parse("COPY X REPLACING ==:PFX:== BY ==WS== OLD BY NEW.");
        let statement = tree.statements().next().unwrap();
        assert_eq!(
            statement.replacing,
            vec![Replacement::pseudo_text(":PFX:", "WS"), Replacement::word("OLD", "NEW")]
        );
        assert!(statement.replacing[0].partial);
        assert!(tree.errors().is_empty());
    }

    #[test]
    fn malformed_replacing_is_reported() {
        let (_, tree) = parse("COPY X REPLACING ==A== BY.");
        assert_eq!(tree.statements().count(), 1);
        let codes: Vec<ErrorCode> = tree.errors().iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![ErrorCode::E0003, ErrorCode::E0003]);
    }

    #[test]
    fn missing_period_is_reported_but_statement_kept() {
        let (source, tree) = parse("COPY A\n       DISPLAY X.");
        let statement = tree.statements().next().unwrap();
        assert_eq!(source.slice(statement.span), Some("COPY A"));
        assert_eq!(tree.errors()[0].code, ErrorCode::E0001);
        assert_eq!(tree.errors()[0].message, "Copy statement for A must end with a period");
    }

    #[test]
    fn missing_name_is_reported() {
        let (_, tree) = parse("COPY .");
        assert_eq!(tree.statements().count(), 0);
        assert_eq!(tree.errors()[0].code, ErrorCode::E0002);
        assert_eq!(tree.errors()[0].source, ErrorSource::Parsing);
    }

    #[test]
    fn other_dialect_forms_are_ignored() {
        let (_, tree) = parse("COPY MAID PMOREC. COPY IDMS EMP.");
        assert_eq!(tree.statements().count(), 0);
        assert!(tree.errors().is_empty());
    }

    #[test]
    fn dialect_keywords_alone_are_copybook_names() {
        let (source, tree) = parse("       COPY IDMS.\n       COPY maid OF LIB.\n       COPY IDMS EMP.");
        let names: Vec<&str> = tree.statements().map(|s| s.name.qualified_name()).collect();
        assert_eq!(names, vec!["IDMS", "MAID"]);
        let first = tree.statements().next().unwrap();
        assert_eq!(source.slice(first.span), Some("COPY IDMS."));
        assert!(tree.errors().is_empty());
    }

    #[test]
    fn replacing_literals_keep_their_quotes() {
        let (_, tree) = parse("COPY X REPLACING 'A' BY 'B' ==(TAG)== BY ==WS== ==MOVE  X== BY ==Y==.");
        let statement = tree.statements().next().unwrap();
        assert_eq!(
            statement.replacing,
            vec![
                Replacement::word("'A'", "'B'"),
                Replacement::pseudo_text("(TAG)", "WS"),
                Replacement::pseudo_text("MOVE  X", "Y"),
            ]
        );
        assert!(statement.replacing[1].partial);
        assert!(!statement.replacing[2].partial);
    }

    #[test]
    fn text_between_statements_is_kept() {
        let (source, tree) = parse("  01 A.\n  COPY B.\n  01 C.  ");
        let texts: Vec<&str> = tree
            .items()
            .iter()
            .filter_map(|item| match item {
                TreeItem::Text(span) => source.slice(*span),
                TreeItem::Copy(_) => None,
            })
            .collect();
        assert_eq!(texts, vec!["01 A.", "01 C."]);
    }
}
