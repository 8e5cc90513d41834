use std::fmt;

use serde::Serialize;

/// Zero-based line / UTF-16 column position, the unit editors speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(f, "{}-{}", self.start, self.end.character + 1)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// One physical line of a document.
///
/// `code` is the analysis view of `raw`: the interior of every double-quoted
/// string is blanked and any trailing `//` comment removed. Blanking keeps the
/// byte length of each character, so a byte offset into `code` is also a byte
/// offset into `raw`.
#[derive(Debug, Clone)]
pub struct SourceLine<'a> {
    pub index: usize,
    /// Byte offset of the first character of the line in the whole document.
    pub offset: usize,
    pub raw: &'a str,
    pub code: String,
}

impl<'a> SourceLine<'a> {
    pub fn new(index: usize, offset: usize, raw: &'a str) -> Self {
        Self {
            index,
            offset,
            raw,
            code: analysis_view(raw),
        }
    }

    pub fn is_comment(&self) -> bool {
        self.raw.trim_start().starts_with("//")
    }

    pub fn is_blank(&self) -> bool {
        self.code.trim().is_empty()
    }

    /// Byte offset into the line of the first non-whitespace character of `code`.
    pub fn indent(&self) -> usize {
        self.code.len() - self.code.trim_start().len()
    }

    /// Convert an in-line byte span to an editor range.
    pub fn range(&self, start: usize, end: usize) -> Range {
        let line = self.index as u32;
        Range::new(
            Position::new(line, utf16_column(self.raw, start)),
            Position::new(line, utf16_column(self.raw, end)),
        )
    }
}

/// Split a document into physical lines. `\r\n` endings are accepted and the
/// `\r` is not part of the line. A trailing newline does not produce an extra
/// empty line.
pub fn split_lines(text: &str) -> Vec<SourceLine<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0usize;
    for (index, chunk) in text.split_inclusive('\n').enumerate() {
        let body = chunk.strip_suffix('\n').unwrap_or(chunk);
        let body = body.strip_suffix('\r').unwrap_or(body);
        lines.push(SourceLine::new(index, offset, body));
        offset += chunk.len();
    }
    lines
}

/// Blank string interiors and drop a trailing line comment.
pub fn analysis_view(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = raw.char_indices().peekable();
    while let Some((_, ch)) = chars.next() {
        if in_string {
            if escaped {
                escaped = false;
                push_blank(&mut out, ch);
            } else if ch == '\\' {
                escaped = true;
                push_blank(&mut out, ch);
            } else if ch == '"' {
                in_string = false;
                out.push('"');
            } else {
                push_blank(&mut out, ch);
            }
            continue;
        }
        match ch {
            '"' => {
                in_string = true;
                out.push('"');
            }
            '/' if matches!(chars.peek(), Some((_, '/'))) => break,
            _ => out.push(ch),
        }
    }
    out
}

fn push_blank(out: &mut String, ch: char) {
    for _ in 0..ch.len_utf8() {
        out.push(' ');
    }
}

/// Number of UTF-16 code units in `line[..byte]`, clamped to the line.
pub fn utf16_column(line: &str, byte: usize) -> u32 {
    let mut end = byte.min(line.len());
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    line[..end].encode_utf16().count() as u32
}

/// Byte offset in `line` of a UTF-16 column, clamped to the end of the line.
pub fn byte_offset_of_column(line: &str, column: u32) -> usize {
    let target = column as usize;
    let mut seen = 0usize;
    for (idx, ch) in line.char_indices() {
        if seen >= target {
            return idx;
        }
        seen += ch.len_utf16();
    }
    line.len()
}

/// True when `prefix` ends inside an unterminated string literal.
pub fn in_open_string(prefix: &str) -> bool {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for ch in prefix.chars() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == q {
                    quote = None;
                }
            }
            None => {
                if matches!(ch, '"' | '\'' | '`') {
                    quote = Some(ch);
                }
            }
        }
    }
    quote.is_some()
}
