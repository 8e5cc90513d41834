use tracing::debug;

use crate::completion::{self, Candidate, Resolution, ResolutionKey};
use crate::lint::{self, Diagnostic};
use crate::source::{split_lines, Position};
use crate::symbols::SymbolTable;

/// Everything derived from one snapshot of a document.
///
/// A session is built in one pass and never mutated afterwards, so readers
/// always see a symbol table and diagnostics that belong to the same text.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    text: String,
    table: SymbolTable,
    diagnostics: Vec<Diagnostic>,
}

impl AnalysisSession {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let (table, diagnostics) = {
            let lines = split_lines(&text);
            let table = SymbolTable::from_lines(&lines);
            let diagnostics = lint::lint_lines(&lines, &table);
            debug!(
                lines = lines.len(),
                symbols = table.symbols().len(),
                diagnostics = diagnostics.len(),
                "analysis session built"
            );
            (table, diagnostics)
        };
        Self {
            text,
            table,
            diagnostics,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Completion at `position` in `current_text`, which may be newer than the
    /// text this session was built from.
    pub fn complete(&self, current_text: &str, position: Position) -> Vec<Candidate> {
        completion::complete(current_text, position, &self.table)
    }

    pub fn resolve(&self, key: &ResolutionKey) -> Resolution {
        completion::resolve(key, &self.table)
    }
}

/// Diagnostics for `text`.
pub fn validate(text: &str) -> Vec<Diagnostic> {
    AnalysisSession::new(text).diagnostics
}
