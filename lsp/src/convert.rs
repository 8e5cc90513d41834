//! Mapping between the analysis core's plain data and `lsp_types`.

use macrorify_core::{Candidate, CandidateKind, Resolution, ResolutionKey, Severity};
use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, Diagnostic, DiagnosticSeverity, Documentation, Position, Range,
};

pub const DIAGNOSTIC_SOURCE: &str = "macrorify";

pub fn position_from_lsp(position: Position) -> macrorify_core::Position {
    macrorify_core::Position::new(position.line, position.character)
}

pub fn position_to_lsp(position: macrorify_core::Position) -> Position {
    Position::new(position.line, position.character)
}

pub fn range_to_lsp(range: macrorify_core::Range) -> Range {
    Range::new(position_to_lsp(range.start), position_to_lsp(range.end))
}

pub fn severity_to_lsp(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Error => DiagnosticSeverity::ERROR,
    }
}

pub fn diagnostic_to_lsp(diagnostic: &macrorify_core::Diagnostic) -> Diagnostic {
    Diagnostic {
        range: range_to_lsp(diagnostic.range),
        severity: Some(severity_to_lsp(diagnostic.severity)),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: diagnostic.message.clone(),
        ..Default::default()
    }
}

/// At most `limit` diagnostics, in document order.
pub fn diagnostics_to_lsp(diagnostics: &[macrorify_core::Diagnostic], limit: usize) -> Vec<Diagnostic> {
    diagnostics.iter().take(limit).map(diagnostic_to_lsp).collect()
}

pub fn completion_kind(kind: CandidateKind) -> CompletionItemKind {
    match kind {
        CandidateKind::Method => CompletionItemKind::METHOD,
        CandidateKind::Property => CompletionItemKind::PROPERTY,
        CandidateKind::Constant => CompletionItemKind::CONSTANT,
        CandidateKind::Variable => CompletionItemKind::VARIABLE,
        CandidateKind::Function => CompletionItemKind::FUNCTION,
        CandidateKind::Class => CompletionItemKind::CLASS,
        CandidateKind::Keyword => CompletionItemKind::KEYWORD,
    }
}

/// The resolution key travels in `data` and comes back on `completionItem/resolve`.
pub fn completion_item(candidate: &Candidate) -> CompletionItem {
    CompletionItem {
        label: candidate.label.clone(),
        kind: Some(completion_kind(candidate.kind)),
        insert_text: candidate.insert_text.clone(),
        data: serde_json::to_value(&candidate.resolution_key).ok(),
        ..Default::default()
    }
}

pub fn resolution_key(item: &CompletionItem) -> Option<ResolutionKey> {
    let data = item.data.clone()?;
    serde_json::from_value(data).ok()
}

pub fn apply_resolution(mut item: CompletionItem, resolution: Resolution) -> CompletionItem {
    item.detail = Some(resolution.detail);
    if !resolution.documentation.is_empty() {
        item.documentation = Some(Documentation::String(resolution.documentation));
    }
    item
}
