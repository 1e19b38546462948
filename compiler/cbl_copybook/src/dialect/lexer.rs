//! Copy statement scanner.
//!
//! Only the handful of tokens copy directives are made of get their own
//! kinds; everything else is a word, a number, a literal, or unrecognised
//! (`None`). Statement parsers look at the token stream around each `COPY`.

use cbl_ir::Span;
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f,;]+")] // Separators
#[logos(skip r"\*>[^\n]*")] // Inline comments
pub enum Token {
    #[token("COPY", ignore(ascii_case))]
    Copy,
    #[token("IDMS", ignore(ascii_case))]
    Idms,
    #[token("MAID", ignore(ascii_case))]
    Maid,
    #[token("REPLACING", ignore(ascii_case))]
    Replacing,
    #[token("BY", ignore(ascii_case))]
    By,
    #[token("IN", ignore(ascii_case))]
    In,
    #[token("OF", ignore(ascii_case))]
    Of,
    #[token("SUPPRESS", ignore(ascii_case))]
    Suppress,
    #[token(".")]
    Period,

    /// `==text==`
    #[regex(r"==([^=]|=[^=])*==")]
    PseudoText,
    #[regex(r"[0-9]+", priority = 3)]
    Number,
    #[regex(r"[A-Za-z0-9][A-Za-z0-9_-]*")]
    Word,
    #[regex(r#""[^"\n]*"|'[^'\n]*'"#)]
    Literal,
}

impl Token {
    /// Tokens that can name a copybook or appear as a REPLACING operand.
    #[inline]
    pub fn is_operand(self) -> bool {
        matches!(
            self,
            Token::Word | Token::Number | Token::Literal | Token::PseudoText
        )
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Lexeme {
    /// `None` for text the scanner does not recognise.
    pub kind: Option<Token>,
    pub span: Span,
}

impl Lexeme {
    #[inline]
    pub fn is(&self, token: Token) -> bool {
        self.kind == Some(token)
    }
}

/// Tokenize `text`, skipping fixed-format comment lines.
pub fn lex(text: &str) -> Vec<Lexeme> {
    let masked = mask_comment_lines(text);
    let mut lexer = Token::lexer(&masked);
    let mut lexemes = Vec::new();
    while let Some(result) = lexer.next() {
        let Ok(span) = Span::try_from_range(lexer.span()) else {
            break;
        };
        lexemes.push(Lexeme {
            kind: result.ok(),
            span,
        });
    }
    lexemes
}

/// Text of a word or literal, with literal quotes stripped.
pub fn operand_text<'a>(text: &'a str, lexeme: &Lexeme) -> &'a str {
    let raw = text.get(lexeme.span.to_range()).unwrap_or_default();
    match lexeme.kind {
        Some(Token::Literal) if raw.len() >= 2 => &raw[1..raw.len() - 1],
        Some(Token::PseudoText) if raw.len() >= 4 => raw[2..raw.len() - 2].trim(),
        _ => raw,
    }
}

/// Whether a line is a fixed-format comment: `*` or `/` in the indicator
/// column (7), with only a sequence number or blanks before it.
pub fn is_comment_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    matches!(bytes.get(6), Some(b'*' | b'/'))
        && bytes[..6].iter().all(|b| b.is_ascii_digit() || *b == b' ')
}

/// Replace comment lines with spaces so byte offsets stay put.
fn mask_comment_lines(text: &str) -> std::borrow::Cow<'_, str> {
    if !text.split('\n').any(is_comment_line) {
        return std::borrow::Cow::Borrowed(text);
    }
    let mut masked = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            masked.push('\n');
        }
        if is_comment_line(line) {
            masked.extend(std::iter::repeat(' ').take(line.len()));
        } else {
            masked.push_str(line);
        }
    }
    std::borrow::Cow::Owned(masked)
}
