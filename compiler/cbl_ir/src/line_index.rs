//! Line/column lookup for document text.
//!
//! Positions use 1-based lines and 0-based columns counted in characters,
//! the convention diagnostics and the editor handlers agree on.

use std::fmt;

/// A line/column position inside a document.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 0-based column, in characters.
    pub column: u32,
}

impl Position {
    pub const START: Position = Position { line: 1, column: 0 };

    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A start/end pair of [`Position`]s.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Range { start, end }
    }
}

/// Pre-computed line start table.
///
/// Built once per document snapshot; lookups are a binary search over the
/// line starts plus a character count within the line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of each line start. `line_starts[0] == 0`.
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        LineIndex { line_starts }
    }

    /// 1-based line containing `offset`.
    #[inline]
    pub fn line_of(&self, offset: u32) -> u32 {
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(idx).unwrap_or(u32::MAX - 1) + 1
    }

    /// Position of `offset` in `text`. Offsets past the end clamp to the end.
    pub fn position(&self, text: &str, offset: u32) -> Position {
        let offset = (offset as usize).min(text.len());
        let line = self.line_of(u32::try_from(offset).unwrap_or(u32::MAX));
        let line_start = self.line_start(line).unwrap_or(0) as usize;
        let column = text
            .get(line_start..offset)
            .map_or(offset - line_start, |prefix| prefix.chars().count());
        Position {
            line,
            column: u32::try_from(column).unwrap_or(u32::MAX),
        }
    }

    /// Byte offset of `position` in `text`, if the line exists.
    ///
    /// Columns past the end of the line clamp to the line end.
    pub fn offset(&self, text: &str, position: Position) -> Option<u32> {
        let start = self.line_start(position.line)? as usize;
        let line_end = self
            .line_start(position.line + 1)
            .map_or(text.len(), |next| next as usize);
        let line = text.get(start..line_end)?;
        let within = line
            .char_indices()
            .nth(position.column as usize)
            .map_or(line.len(), |(idx, _)| idx);
        u32::try_from(start + within).ok()
    }

    /// Byte offset of the start of a 1-based line.
    pub fn line_start(&self, line: u32) -> Option<u32> {
        if line == 0 {
            return None;
        }
        self.line_starts.get((line - 1) as usize).copied()
    }
}
