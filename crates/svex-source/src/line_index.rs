use std::collections::HashMap;

use crate::TextSize;

/// A line/column position, both 0-indexed. `col` is a byte offset from
/// the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// A line/column position with the column counted in UTF-16 code
/// units, as required at the document-edit protocol boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utf16LineCol {
    pub line: u32,
    pub col: u32,
}

/// A character whose UTF-8 byte length differs from its UTF-16 code
/// unit length. `col` is the byte column of its first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WideChar {
    col: u32,
    utf8_len: u32,
    utf16_len: u32,
}

/// Maps byte offsets to line/column positions.
///
/// Built once per file text. Lines are 0-indexed and split on `\n`;
/// for CRLF input the `\r` counts as a regular byte in column math.
/// Non-ASCII characters are tracked per line so byte columns can be
/// converted to UTF-16 code-unit columns without re-reading the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the start of each line. First entry is always 0.
    line_starts: Vec<TextSize>,
    /// Total length of the source text in bytes.
    len: TextSize,
    /// Multi-byte characters keyed by line, each list in column order.
    /// Lines that are pure ASCII have no entry.
    wide_chars: HashMap<u32, Vec<WideChar>>,
}

impl LineIndex {
    /// Build a `LineIndex` by scanning `text`.
    ///
    /// Empty text has exactly 1 line with start offset 0.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        let mut wide_chars: HashMap<u32, Vec<WideChar>> = HashMap::new();
        let mut line: u32 = 0;
        let mut line_start: u32 = 0;

        for (pos, c) in text.char_indices() {
            let pos = pos as u32;
            if c == '\n' {
                line += 1;
                line_start = pos + 1;
                line_starts.push(TextSize::new(line_start));
                continue;
            }
            let utf8_len = c.len_utf8() as u32;
            if utf8_len > 1 {
                wide_chars.entry(line).or_default().push(WideChar {
                    col: pos - line_start,
                    utf8_len,
                    utf16_len: c.len_utf16() as u32,
                });
            }
        }

        Self {
            line_starts,
            len: TextSize::of(text),
            wide_chars,
        }
    }

    /// Convert a byte offset to a line/column position.
    ///
    /// Offsets beyond the end of text are clamped to the EOF position.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = std::cmp::min(offset, self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let col = u32::from(offset) - u32::from(self.line_starts[line]);
        LineCol {
            line: line as u32,
            col,
        }
    }

    /// Convert a line/column position back to a byte offset.
    ///
    /// Returns `None` if `line` is out of range or `col` is past the
    /// end of the line.
    pub fn offset(&self, lc: LineCol) -> Option<TextSize> {
        let line = lc.line as usize;
        let start = *self.line_starts.get(line)?;
        let end = self.line_starts.get(line + 1).copied().unwrap_or(self.len);
        let raw = u32::from(start).checked_add(lc.col)?;
        let offset = TextSize::new(raw);
        if offset > end {
            return None;
        }
        Some(offset)
    }

    /// Convert a byte column to a UTF-16 code-unit column.
    pub fn to_utf16(&self, lc: LineCol) -> Utf16LineCol {
        let mut col = lc.col;
        if let Some(wide) = self.wide_chars.get(&lc.line) {
            for c in wide {
                if c.col >= lc.col {
                    break;
                }
                col -= c.utf8_len - c.utf16_len;
            }
        }
        Utf16LineCol { line: lc.line, col }
    }

    /// Convert a UTF-16 code-unit column back to a byte column.
    ///
    /// A column landing inside a wide character snaps to its start.
    pub fn to_utf8(&self, lc: Utf16LineCol) -> LineCol {
        // Running difference between byte and code-unit columns
        // accumulated over wide chars that precede the position.
        let mut delta: u32 = 0;
        if let Some(wide) = self.wide_chars.get(&lc.line) {
            for c in wide {
                let utf16_start = c.col - delta;
                if lc.col <= utf16_start {
                    break;
                }
                if lc.col < utf16_start + c.utf16_len {
                    return LineCol {
                        line: lc.line,
                        col: c.col,
                    };
                }
                delta += c.utf8_len - c.utf16_len;
            }
        }
        LineCol {
            line: lc.line,
            col: lc.col + delta,
        }
    }

    /// Number of lines in the source text.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
