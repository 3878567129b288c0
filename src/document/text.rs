//! Text utilities for cursor and position lookups.
//!
//! Two coordinate systems live here:
//! - character offsets (Unicode scalar values, newlines included), used by the
//!   line locator functions, the way an editor widget reports its cursor;
//! - LSP positions (line + UTF-16 column), handled by [`LineIndex`].

use std::ops::Range;

use serde::Serialize;
use tower_lsp::lsp_types::Position;

use crate::error::LocateError;

/// The line a cursor falls on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CursorLine<'a> {
    /// Zero-based line index.
    pub index: usize,
    /// Line content, without its newline.
    pub line: &'a str,
    /// Cursor offset relative to the start of the line.
    pub column: usize,
    /// Character offset where the line starts.
    pub start: usize,
    /// Character offset where the line ends (the newline itself is excluded).
    pub end: usize,
}

/// Split text into lines on `\n`, keeping empty lines.
///
/// Always yields at least one line, so `split_lines(t).join("\n") == t`.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Index of the line containing `cursor`.
///
/// A cursor sitting on a newline belongs to the line before it.
pub fn line_index_at<S: AsRef<str>>(lines: &[S], cursor: usize) -> Result<usize, LocateError> {
    walk_lines(lines, cursor).map(|span| span.index)
}

/// Content of the line containing `cursor`.
pub fn line_at(text: &str, cursor: usize) -> Result<&str, LocateError> {
    cursor_line(text, cursor).map(|found| found.line)
}

/// Full position info for the line containing `cursor`.
pub fn cursor_line(text: &str, cursor: usize) -> Result<CursorLine<'_>, LocateError> {
    let lines = split_lines(text);
    let span = walk_lines(&lines, cursor)?;

    Ok(CursorLine {
        index: span.index,
        line: lines[span.index],
        column: cursor - span.start,
        start: span.start,
        end: span.end,
    })
}

/// Character index right after the last newline of `text`, or 0.
///
/// Given the text before a cursor, this is where the cursor's line begins.
pub fn line_start(text: &str) -> usize {
    match text.rfind('\n') {
        Some(newline) => text[..=newline].chars().count(),
        None => 0,
    }
}

/// Character index of the first newline of `text`, or its length.
///
/// Given the text after a cursor, this is how far the cursor's line extends.
/// The result is an exclusive end: it points at the newline, not at the last
/// character before it.
pub fn line_end(text: &str) -> usize {
    match text.find('\n') {
        Some(newline) => text[..newline].chars().count(),
        None => text.chars().count(),
    }
}

/// Character bounds of the line containing `cursor`, newline excluded.
pub fn line_bounds(text: &str, cursor: usize) -> Result<Range<usize>, LocateError> {
    let split = char_to_byte(text, cursor).ok_or(LocateError::OutOfRange {
        offset: cursor,
        len: text.chars().count(),
    })?;

    let start = line_start(&text[..split]);
    let end = cursor + line_end(&text[split..]);
    Ok(start..end)
}

#[derive(Debug, Clone, Copy)]
struct LineSpan {
    index: usize,
    start: usize,
    end: usize,
}

/// Walk the lines accumulating consumed characters (line + its newline) until
/// the cursor is reached.
fn walk_lines<S: AsRef<str>>(lines: &[S], cursor: usize) -> Result<LineSpan, LocateError> {
    let mut consumed = 0;

    for (index, line) in lines.iter().enumerate() {
        let end = consumed + line.as_ref().chars().count();
        if end >= cursor {
            return Ok(LineSpan {
                index,
                start: consumed,
                end,
            });
        }
        consumed = end + 1;
    }

    Err(LocateError::OutOfRange {
        offset: cursor,
        len: consumed.saturating_sub(1),
    })
}

/// Byte offset of the `offset`-th character; `offset == char count` maps to `text.len()`.
pub(crate) fn char_to_byte(text: &str, offset: usize) -> Option<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .nth(offset)
}

/// Character offset of a byte offset that lies on a char boundary.
pub(crate) fn byte_to_char(text: &str, byte: usize) -> usize {
    text[..byte.min(text.len())].chars().count()
}

pub(crate) fn utf16_len(text: &str) -> u32 {
    text.chars().map(|c| c.len_utf16() as u32).sum()
}

/// Pre-computed line starts for LSP position lookups.
///
/// LSP positions use line/column where column is in UTF-16 code units.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset where each line starts.
    line_starts: Vec<usize>,
    source: String,
}

impl LineIndex {
    /// Build a line index from source text.
    pub fn new(source: String) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .match_indices('\n')
                .map(|(newline, _)| newline + 1),
        );

        Self {
            line_starts,
            source,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of lines, counting a trailing empty line after a final newline.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Content of line `line` without its newline.
    pub fn line(&self, line: usize) -> Option<&str> {
        let start = *self.line_starts.get(line)?;
        Some(&self.source[start..self.line_end(line)])
    }

    /// Byte offset where `line` ends, newline excluded.
    fn line_end(&self, line: usize) -> usize {
        self.line_starts
            .get(line + 1)
            .map(|&next| next - 1)
            .unwrap_or(self.source.len())
    }

    /// Convert a byte offset to an LSP position.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };

        let line_start = self.line_starts[line];
        let line_slice = &self.source[line_start..self.line_end(line)];

        // Offsets inside a multi-byte character land before that character
        let mut col = 0u32;
        for (i, c) in line_slice.char_indices() {
            if line_start + i + c.len_utf8() > offset {
                break;
            }
            col += c.len_utf16() as u32;
        }

        Position::new(line as u32, col)
    }

    /// Convert an LSP position to a byte offset.
    ///
    /// Returns None if the line does not exist. Columns past the end of the
    /// line land on the line end.
    pub fn position_to_offset(&self, position: Position) -> Option<usize> {
        let line = position.line as usize;
        let line_start = *self.line_starts.get(line)?;
        let line_end = self.line_end(line);

        let mut utf16_col = 0u32;
        for (i, c) in self.source[line_start..line_end].char_indices() {
            if utf16_col >= position.character {
                return Some(line_start + i);
            }
            utf16_col += c.len_utf16() as u32;
        }

        Some(line_end)
    }

    /// Convert a byte span to an LSP range.
    pub fn span_to_range(&self, span: &Range<usize>) -> tower_lsp::lsp_types::Range {
        let start = self.offset_to_position(span.start);
        let end = self.offset_to_position(span.end);
        tower_lsp::lsp_types::Range::new(start, end)
    }

    /// Convert a character span to an LSP range.
    pub fn char_span_to_range(&self, span: &Range<usize>) -> Option<tower_lsp::lsp_types::Range> {
        let start = char_to_byte(&self.source, span.start)?;
        let end = char_to_byte(&self.source, span.end)?;
        Some(self.span_to_range(&(start..end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_empty_lines() {
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("a\n"), vec!["a", ""]);
        assert_eq!(split_lines(""), vec![""]);
    }

    #[test]
    fn split_round_trips() {
        for text in ["", "\n", "abc", "abc\ndef\n", "\n\nx\n\n", "é\n😀"] {
            assert_eq!(split_lines(text).join("\n"), text);
        }
    }

    #[test]
    fn cursor_in_middle_line() {
        let text = "abc\ndef\nghi";
        assert_eq!(line_at(text, 5), Ok("def"));
        assert_eq!(line_index_at(&split_lines(text), 5), Ok(1));
    }

    #[test]
    fn cursor_on_newline_belongs_to_previous_line() {
        assert_eq!(line_at("abc\ndef", 3), Ok("abc"));
        assert_eq!(line_at("abc\ndef", 4), Ok("def"));
    }

    #[test]
    fn cursor_at_start_and_end() {
        let text = "abc\ndef\nghi";
        let lines = split_lines(text);
        assert_eq!(line_index_at(&lines, 0), Ok(0));
        assert_eq!(line_index_at(&lines, text.len()), Ok(2));
    }

    #[test]
    fn empty_text() {
        assert_eq!(line_at("", 0), Ok(""));
    }

    #[test]
    fn trailing_newline_gives_empty_last_line() {
        let found = cursor_line("abc\n", 4).unwrap();
        assert_eq!(found.index, 1);
        assert_eq!(found.line, "");
        assert_eq!(found.column, 0);
    }

    #[test]
    fn cursor_past_end_is_out_of_range() {
        assert_eq!(
            line_at("abc\ndef", 8),
            Err(LocateError::OutOfRange { offset: 8, len: 7 })
        );
        assert_eq!(
            line_index_at::<&str>(&[], 0),
            Err(LocateError::OutOfRange { offset: 0, len: 0 })
        );
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        // 'é' is 2 bytes, '😀' is 4
        let text = "é😀\nxyz";
        assert_eq!(line_at(text, 2), Ok("é😀"));
        assert_eq!(line_at(text, 3), Ok("xyz"));
        assert_eq!(line_at(text, 6), Ok("xyz"));
        assert_eq!(
            line_at(text, 7),
            Err(LocateError::OutOfRange { offset: 7, len: 6 })
        );
    }

    #[test]
    fn cursor_line_reports_column_and_bounds() {
        let found = cursor_line("abc\ndef\nghi", 6).unwrap();
        assert_eq!(
            found,
            CursorLine {
                index: 1,
                line: "def",
                column: 2,
                start: 4,
                end: 7,
            }
        );
    }

    #[test]
    fn start_and_end_of_line() {
        assert_eq!(line_start("abc\nde"), 4);
        assert_eq!(line_start("abc"), 0);
        assert_eq!(line_start("abc\n"), 4);
        assert_eq!(line_end("f\nghi"), 1);
        assert_eq!(line_end("\nghi"), 0);
        assert_eq!(line_end("fgh"), 3);
    }

    #[test]
    fn start_and_end_reproduce_known_line() {
        let text = "first\nsecond line\nthird";
        let line = "second line";
        let begin = text.find(line).unwrap();
        for cursor in begin..=begin + line.len() {
            let before = &text[..cursor];
            let after = &text[cursor..];
            let start = line_start(before);
            let end = cursor + line_end(after);
            assert_eq!(start..end, begin..begin + line.len());
        }
    }

    #[test]
    fn bounds_match_cursor_line() {
        let text = "a\n\nbé😀c\n";
        let total = text.chars().count();
        for cursor in 0..=total {
            let found = cursor_line(text, cursor).unwrap();
            assert_eq!(line_bounds(text, cursor), Ok(found.start..found.end));
        }
        assert!(line_bounds(text, total + 1).is_err());
    }

    #[test]
    fn index_lines() {
        let idx = LineIndex::new("hello\nworld\n".to_string());
        assert_eq!(idx.line_count(), 3);
        assert_eq!(idx.line(0), Some("hello"));
        assert_eq!(idx.line(1), Some("world"));
        assert_eq!(idx.line(2), Some(""));
        assert_eq!(idx.line(3), None);
    }

    #[test]
    fn offset_to_position_multi_line() {
        let idx = LineIndex::new("hello\nworld\ntest".to_string());
        assert_eq!(idx.offset_to_position(0), Position::new(0, 0));
        assert_eq!(idx.offset_to_position(5), Position::new(0, 5));
        assert_eq!(idx.offset_to_position(6), Position::new(1, 0));
        assert_eq!(idx.offset_to_position(11), Position::new(1, 5));
        assert_eq!(idx.offset_to_position(12), Position::new(2, 0));
    }

    #[test]
    fn position_to_offset_multi_line() {
        let idx = LineIndex::new("hello\nworld".to_string());
        assert_eq!(idx.position_to_offset(Position::new(0, 5)), Some(5));
        assert_eq!(idx.position_to_offset(Position::new(1, 0)), Some(6));
        assert_eq!(idx.position_to_offset(Position::new(1, 99)), Some(11));
        assert_eq!(idx.position_to_offset(Position::new(2, 0)), None);
    }

    #[test]
    fn utf16_columns() {
        // '😀' is 4 bytes in UTF-8 but 2 code units in UTF-16
        let idx = LineIndex::new("a😀b".to_string());
        assert_eq!(idx.offset_to_position(1), Position::new(0, 1));
        assert_eq!(idx.offset_to_position(5), Position::new(0, 3));
        assert_eq!(idx.position_to_offset(Position::new(0, 3)), Some(5));
    }

    #[test]
    fn offset_inside_multibyte_char() {
        let idx = LineIndex::new("é\nx".to_string());
        assert_eq!(idx.offset_to_position(1), Position::new(0, 0));
        assert_eq!(idx.offset_to_position(2), Position::new(0, 1));

        // bytes 2..4 of '😀' still map to the column before it
        let idx = LineIndex::new("a😀b".to_string());
        assert_eq!(idx.offset_to_position(3), Position::new(0, 1));
    }

    #[test]
    fn char_span_to_range() {
        let idx = LineIndex::new("é\nworld".to_string());
        let range = idx.char_span_to_range(&(2..7)).unwrap();
        assert_eq!(range.start, Position::new(1, 0));
        assert_eq!(range.end, Position::new(1, 5));
        assert!(idx.char_span_to_range(&(0..8)).is_none());
    }
}
