use std::hash::{Hash, Hasher};

use ropey::Rope;
use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent};
use twox_hash::XxHash64;

/// Rope char index of an LSP position (UTF-16 column), clamped to the line.
/// Lines past the end map to the end of the text.
pub(crate) fn char_index(text: &Rope, pos: Position) -> usize {
    let line_idx = pos.line as usize;
    if line_idx >= text.len_lines() {
        return text.len_chars();
    }
    let line_start = text.line_to_char(line_idx);
    let target = pos.character as usize;

    let mut units = 0usize;
    let mut chars = 0usize;
    for ch in text.line(line_idx).chars() {
        if ch == '\n' || ch == '\r' {
            break;
        }
        units += ch.len_utf16();
        if units > target {
            break;
        }
        chars += 1;
    }
    line_start + chars
}

/// Apply one `didChange` event. A change without a range replaces the text.
pub(crate) fn apply_change(text: &mut Rope, change: &TextDocumentContentChangeEvent) {
    let Some(range) = change.range else {
        *text = Rope::from_str(&change.text);
        return;
    };
    let a = char_index(text, range.start);
    let b = char_index(text, range.end);
    let (start, end) = (a.min(b), a.max(b));
    if start != end {
        text.remove(start..end);
    }
    if !change.text.is_empty() {
        text.insert(start, &change.text);
    }
}

pub(crate) fn content_hash(content: &str) -> u64 {
    let mut hasher = XxHash64::default();
    content.hash(&mut hasher);
    hasher.finish()
}
