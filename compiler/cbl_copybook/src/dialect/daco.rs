//! DaCo copy statements.
//!
//! ```text
//! [level] COPY MAID name.
//! ```
//!
//! The level number in front of the directive becomes the copy node's
//! parent level.

use cbl_diagnostic::{ErrorCode, ErrorSource, MessageService};
use cbl_ir::{CopybookName, DialectKind, SourceText};

use super::lexer::{Lexeme, Token};
use super::{CopyStatement, DialectAdapter, Scan, Scanner};

#[derive(Copy, Clone, Debug, Default)]
pub struct DaCoDialect;

impl DialectAdapter for DaCoDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::DaCo
    }

    fn scan(&self, source: &SourceText, lexemes: &[Lexeme], messages: &dyn MessageService) -> Scan {
        let mut scanner = Scanner::new(source, lexemes, messages, ErrorSource::Dialect);
        let mut i = 0;
        while i < scanner.len() {
            if !(scanner.is(i, Token::Copy) && scanner.is(i + 1, Token::Maid)) {
                i += 1;
                continue;
            }
            let name_index = i + 2;
            if !scanner.is_name(name_index) {
                let span = scanner.span(i).merge(scanner.span(i + 1));
                scanner.error(span, ErrorCode::E0002, &[]);
                i += 2;
                continue;
            }
            let name = scanner.text(name_index);
            let (span, next) = scanner.finish(i, name_index, name);
            let statement = CopyStatement {
                name: CopybookName::new(name, DialectKind::DaCo),
                span,
                parent_level: scanner.level_before(i),
                replacing: Vec::new(),
            };
            scanner.push(statement);
            i = next;
        }
        scanner.into_scan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbl_diagnostic::DefaultMessages;
    use pretty_assertions::assert_eq;

    #[test]
    fn level_numbers_are_recorded() {
        let text = "       01 COPY MAID PMOREC.\n       05 X PIC 9.\n       COPY MAID OTHER.";
        let source = SourceText::new("prog", text);
        let tree = DaCoDialect.parse(&source, &DefaultMessages);
        let found: Vec<(String, Option<u32>)> = tree
            .statements()
            .map(|s| (s.name.qualified_name().to_string(), s.parent_level))
            .collect();
        assert_eq!(
            found,
            vec![("PMOREC@DaCo".to_string(), Some(1)), ("OTHER@DaCo".to_string(), None)]
        );
    }

    #[test]
    fn level_on_previous_line_does_not_count() {
        let source = SourceText::new("prog", "01\n COPY MAID A.");
        let tree = DaCoDialect.parse(&source, &DefaultMessages);
        assert_eq!(tree.statements().next().map(|s| s.parent_level), Some(None));
    }

    #[test]
    fn plain_copy_is_not_daco() {
        let source = SourceText::new("prog", "COPY PMOREC.");
        assert_eq!(DaCoDialect.parse(&source, &DefaultMessages).statements().count(), 0);
    }
}
