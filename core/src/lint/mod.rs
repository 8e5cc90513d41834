//! Line-oriented diagnostic rules.
//!
//! Every rule sees one code line at a time through a [`LineContext`] and
//! reports through a [`Reporter`]. Rules are independent: a rule that does not
//! match simply reports nothing.

mod condition;
mod declaration;
mod header;
mod loops;
mod operators;
mod termination;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::trace;

use crate::source::{split_lines, Range, SourceLine};
use crate::symbols::SymbolTable;
use crate::token::{tokenize, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: Severity,
    pub message: String,
}

/// What a rule can see about the line it checks.
pub struct LineContext<'a> {
    pub line: &'a SourceLine<'a>,
    pub tokens: Vec<Token<'a>>,
    pub table: &'a SymbolTable,
    /// Nearest code line above, skipping blank and comment lines.
    pub prev: Option<&'a SourceLine<'a>>,
    /// Nearest code line below, skipping blank and comment lines.
    pub next: Option<&'a SourceLine<'a>>,
}

impl LineContext<'_> {
    pub fn code(&self) -> &str {
        &self.line.code
    }

    pub fn first_is(&self, word: &str) -> bool {
        self.tokens.first().is_some_and(|t| t.is_ident(word))
    }
}

/// Collects the diagnostics of one line. Offsets are byte offsets into the line.
pub struct Reporter<'a> {
    line: &'a SourceLine<'a>,
    out: &'a mut Vec<Diagnostic>,
}

impl<'a> Reporter<'a> {
    pub fn new(line: &'a SourceLine<'a>, out: &'a mut Vec<Diagnostic>) -> Self {
        Self { line, out }
    }

    pub fn report(&mut self, severity: Severity, start: usize, end: usize, message: impl Into<String>) {
        let message = message.into();
        trace!(line = self.line.index, start, end, %message, "diagnostic");
        self.out.push(Diagnostic {
            range: self.line.range(start, end),
            severity,
            message,
        });
    }

    pub fn error(&mut self, start: usize, end: usize, message: impl Into<String>) {
        self.report(Severity::Error, start, end, message);
    }

    pub fn warning(&mut self, start: usize, end: usize, message: impl Into<String>) {
        self.report(Severity::Warning, start, end, message);
    }

    /// Report the first match of `pattern` in `text`, which starts at byte
    /// `base` of the line. `$$` in the message is replaced by the matched
    /// text. With `emphasis`, the range narrows to the first emphasis match
    /// inside the rule match.
    pub fn check(
        &mut self,
        text: &str,
        base: usize,
        pattern: Option<&Regex>,
        emphasis: Option<&Regex>,
        severity: Severity,
        message: &str,
    ) -> bool {
        let Some(found) = pattern.and_then(|re| re.find(text)) else {
            return false;
        };
        let (start, end) = emphasis
            .and_then(|re| re.find(found.as_str()))
            .map(|m| (found.start() + m.start(), found.start() + m.end()))
            .unwrap_or((found.start(), found.end()));
        self.report(severity, base + start, base + end, message.replace("$$", found.as_str()));
        true
    }
}

pub trait LineRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, ctx: &LineContext<'_>, out: &mut Reporter<'_>);
}

static RULES: &[&dyn LineRule] = &[
    &termination::Termination,
    &declaration::Declaration,
    &operators::Operators,
    &condition::Condition,
    &header::Header,
    &loops::Loop,
];

pub fn rule_names() -> impl Iterator<Item = &'static str> {
    RULES.iter().map(|rule| rule.name())
}

/// Run every rule over every code line of `text`.
pub fn lint(text: &str, table: &SymbolTable) -> Vec<Diagnostic> {
    lint_lines(&split_lines(text), table)
}

pub fn lint_lines(lines: &[SourceLine<'_>], table: &SymbolTable) -> Vec<Diagnostic> {
    let code_lines: Vec<&SourceLine<'_>> = lines
        .iter()
        .filter(|line| !line.is_comment() && !line.is_blank())
        .collect();

    let mut diagnostics = Vec::new();
    for (pos, &line) in code_lines.iter().enumerate() {
        let ctx = LineContext {
            line,
            tokens: tokenize(&line.code),
            table,
            prev: pos.checked_sub(1).map(|p| code_lines[p]),
            next: code_lines.get(pos + 1).copied(),
        };
        let mut reporter = Reporter::new(line, &mut diagnostics);
        for rule in RULES {
            rule.check(&ctx, &mut reporter);
        }
    }
    diagnostics
}

pub(crate) fn compile(src: &str) -> Option<Regex> {
    Regex::new(src)
        .map_err(|err| tracing::error!("invalid lint pattern {src}: {err}"))
        .ok()
}

pub(crate) fn pattern(cell: &'static Lazy<Option<Regex>>) -> Option<&'static Regex> {
    let compiled: &'static Option<Regex> = cell;
    compiled.as_ref()
}

/// Start and end byte of the trimmed part of `text`, relative to `text`.
pub(crate) fn trimmed_span(text: &str) -> (usize, usize) {
    let start = text.len() - text.trim_start().len();
    let end = text.trim_end().len();
    (start, end.max(start))
}

pub(crate) fn starts_with_word(text: &str, word: &str) -> bool {
    text.strip_prefix(word)
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
}

/// Byte offset and length of the first character that makes `name` an
/// invalid identifier: it must start with an ASCII letter (or `_` when
/// `underscore_start`) and continue with letters, digits or `_`.
pub(crate) fn invalid_name_char(name: &str, underscore_start: bool) -> Option<(usize, usize)> {
    let mut chars = name.char_indices();
    let (_, first) = chars.next()?;
    if !(first.is_ascii_alphabetic() || (underscore_start && first == '_')) {
        return Some((0, first.len_utf8()));
    }
    chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map(|(idx, c)| (idx, c.len_utf8()))
}

/// A literal operand or a dotted / indexed name, as allowed on either side
/// of a comparison.
pub(crate) const OPERAND: &str = r#"(?:"[^"]*"|[A-Za-z0-9_.\[\]]+)"#;

pub(crate) static ALWAYS_TRUE: Lazy<Option<Regex>> = Lazy::new(|| compile(r"^(true|-?[1-9][0-9]*)$"));
pub(crate) static ALWAYS_FALSE: Lazy<Option<Regex>> = Lazy::new(|| compile(r#"^(false|-?0+|""|null)$"#));
