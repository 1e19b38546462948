//! CA IDMS copy statements.
//!
//! ```text
//! COPY IDMS [RECORD|FILE|MODULE|MAP] name.
//! ```

use cbl_diagnostic::{ErrorCode, ErrorSource, MessageService};
use cbl_ir::{CopybookName, DialectKind, SourceText};

use super::lexer::{Lexeme, Token};
use super::{CopyStatement, DialectAdapter, Scan, Scanner};

const QUALIFIERS: [&str; 4] = ["RECORD", "FILE", "MODULE", "MAP"];

#[derive(Copy, Clone, Debug, Default)]
pub struct IdmsDialect;

impl DialectAdapter for IdmsDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Idms
    }

    fn scan(&self, source: &SourceText, lexemes: &[Lexeme], messages: &dyn MessageService) -> Scan {
        let mut scanner = Scanner::new(source, lexemes, messages, ErrorSource::Dialect);
        let mut i = 0;
        while i < scanner.len() {
            if scanner.is(i, Token::Copy) && scanner.is(i + 1, Token::Idms) {
                i = statement(&mut scanner, i);
            } else {
                i += 1;
            }
        }
        scanner.into_scan()
    }
}

fn statement(scanner: &mut Scanner<'_>, copy: usize) -> usize {
    let mut name_index = copy + 2;
    // `COPY IDMS RECORD EMP.` vs a record literally named RECORD
    let qualified = QUALIFIERS
        .iter()
        .any(|q| scanner.is(name_index, Token::Word) && scanner.text(name_index).eq_ignore_ascii_case(q));
    if qualified && scanner.is_name(name_index + 1) {
        name_index += 1;
    }
    if !scanner.is_name(name_index) {
        let span = scanner.span(copy).merge(scanner.span(copy + 1));
        scanner.error(span, ErrorCode::E0002, &[]);
        return copy + 2;
    }
    let name = scanner.text(name_index);
    let (span, next) = scanner.finish(copy, name_index, name);
    let statement = CopyStatement {
        name: CopybookName::new(name, DialectKind::Idms),
        span,
        parent_level: scanner.level_before(copy),
        replacing: Vec::new(),
    };
    scanner.push(statement);
    next
}
