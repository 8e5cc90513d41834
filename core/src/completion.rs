use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{
    self, CandidateKind, CLASS_HINT, DECLARATION_KEYWORD, FUNCTION_HINT, GLOBAL_FUNCTIONS, KEYWORDS, NAMESPACE_ROOTS,
    VARIABLE_HINT,
};
use crate::resolver;
use crate::source::{analysis_view, byte_offset_of_column, in_open_string, Position};
use crate::symbols::{Scope, Symbol, SymbolId, SymbolTable};
use crate::types::TypeTag;

/// Opaque key carried by a candidate and handed back on resolve.
///
/// Serializes as a plain string for catalogue entries and as
/// `[hint, symbolId]` for symbols declared in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolutionKey {
    Catalog(String),
    Symbol(String, SymbolId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub label: String,
    pub kind: CandidateKind,
    pub resolution_key: ResolutionKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_text: Option<String>,
}

impl Candidate {
    fn catalog(label: &str, kind: CandidateKind, key: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            kind,
            resolution_key: ResolutionKey::Catalog(key.into()),
            insert_text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub detail: String,
    pub documentation: String,
}

/// Candidates for the cursor at `position` in `text`.
pub fn complete(text: &str, position: Position, table: &SymbolTable) -> Vec<Candidate> {
    let Some(line_text) = text.split('\n').nth(position.line as usize) else {
        return Vec::new();
    };
    let line_text = line_text.strip_suffix('\r').unwrap_or(line_text);
    let prefix = &line_text[..byte_offset_of_column(line_text, position.character)];
    if !has_context(prefix) {
        return Vec::new();
    }

    let line = position.line as usize;
    let head = prefix.trim_end_matches(|c: char| c.is_alphanumeric() || c == '_' || c == '$');
    let candidates = match head.strip_suffix('.') {
        Some(before_dot) => member_candidates(owner_expression(before_dot), line, table),
        None => bare_candidates(line, table),
    };
    debug!(line, count = candidates.len(), "completion");
    candidates
}

/// False for declarations still missing `=`, comments, and string interiors.
fn has_context(prefix: &str) -> bool {
    let trimmed = prefix.trim_start();
    if trimmed.starts_with("//") || in_open_string(prefix) {
        return false;
    }
    if trimmed.strip_prefix(DECLARATION_KEYWORD).is_some_and(|rest| {
        !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_') && !rest.contains('=')
    }) {
        return false;
    }
    // A trailing `//` comment shortens the analysis view.
    analysis_view(prefix).len() == prefix.len()
}

/// The expression that ends at the end of `text`: a chain of names, calls,
/// indexing and string literals, stopping at the first unbalanced opener or
/// top-level separator.
fn owner_expression(text: &str) -> &str {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut depth = 0i32;
    let mut start = text.len();
    let mut i = chars.len();
    while i > 0 {
        let (idx, ch) = chars[i - 1];
        match ch {
            '"' | '\'' | '`' => {
                let Some(open) = (0..i - 1).rev().find(|&j| chars[j].1 == ch) else {
                    break;
                };
                start = chars[open].0;
                i = open;
                continue;
            }
            ')' | ']' => depth += 1,
            '(' | '[' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            c if depth > 0 || c.is_alphanumeric() || matches!(c, '_' | '$' | '.') => {}
            _ => break,
        }
        start = idx;
        i -= 1;
    }
    text[start..].trim()
}

fn member_candidates(owner: &str, line: usize, table: &SymbolTable) -> Vec<Candidate> {
    let substituted = resolver::substitute(owner, &table.at_line(line));
    let tag = resolver::classify(&substituted);
    debug!(owner, %substituted, %tag, "member completion");
    if tag == TypeTag::Any {
        return every_member();
    }
    catalog::members(tag)
        .iter()
        .map(|(label, kind)| Candidate::catalog(label, kind, catalog::member_key(tag, label)))
        .collect()
}

/// Union of every built-in's members, for owners that could not be classified.
fn every_member() -> Vec<Candidate> {
    let mut seen = HashSet::new();
    TypeTag::ALL
        .iter()
        .flat_map(|&tag| catalog::members(tag).iter().map(move |(label, kind)| (tag, label, kind)))
        .filter(|&(_, label, kind)| seen.insert((label, kind)))
        .map(|(tag, label, kind)| Candidate::catalog(label, kind, catalog::member_key(tag, label)))
        .collect()
}

fn bare_candidates(line: usize, table: &SymbolTable) -> Vec<Candidate> {
    let mut out = Vec::new();

    let mut seen = HashSet::new();
    for symbol in table.visible_at(line) {
        if !seen.insert(symbol.name.as_str()) {
            continue;
        }
        let id = table.lookup_at(&symbol.name, line).map(|s| s.id).unwrap_or(symbol.id);
        out.push(Candidate {
            label: symbol.name.clone(),
            kind: CandidateKind::Variable,
            resolution_key: ResolutionKey::Symbol(VARIABLE_HINT.to_string(), id),
            insert_text: None,
        });
    }
    for name in table.functions() {
        out.push(Candidate {
            label: name.clone(),
            kind: CandidateKind::Function,
            resolution_key: ResolutionKey::Catalog(FUNCTION_HINT.to_string()),
            insert_text: Some(format!("{name}()")),
        });
    }
    for name in table.classes() {
        out.push(Candidate::catalog(name, CandidateKind::Class, CLASS_HINT));
    }

    out.push(Candidate::catalog(DECLARATION_KEYWORD, CandidateKind::Keyword, DECLARATION_KEYWORD));
    out.extend(KEYWORDS.iter().map(|kw| Candidate::catalog(kw, CandidateKind::Keyword, *kw)));
    out.extend(
        GLOBAL_FUNCTIONS
            .iter()
            .map(|name| Candidate::catalog(name, CandidateKind::Function, *name)),
    );
    out.extend(
        NAMESPACE_ROOTS
            .iter()
            .map(|name| Candidate::catalog(name, CandidateKind::Class, *name)),
    );
    out
}

/// Detail and documentation for a candidate the user highlighted.
pub fn resolve(key: &ResolutionKey, table: &SymbolTable) -> Resolution {
    match key {
        ResolutionKey::Symbol(hint, id) => match table.get(*id) {
            Some(symbol) => describe_symbol(symbol),
            None => resolve_catalog(hint),
        },
        ResolutionKey::Catalog(key) => resolve_catalog(key),
    }
}

fn resolve_catalog(key: &str) -> Resolution {
    match catalog::hint(key) {
        Some(hint) => Resolution {
            detail: hint.detail.to_string(),
            documentation: hint.documentation(),
        },
        None => Resolution {
            detail: "no info".to_string(),
            documentation: String::new(),
        },
    }
}

fn describe_symbol(symbol: &Symbol) -> Resolution {
    let mut doc = format!("Type: {}\n", symbol.tag);
    let scope = match symbol.scope {
        Scope::Global => "global".to_string(),
        Scope::Local { start, end: Some(end) } => format!("lines {}-{}", start + 1, end + 1),
        Scope::Local { start, end: None } => format!("from line {}", start + 1),
    };
    doc.push_str(&format!("Scope: {scope}\n"));
    if symbol.declared_value.is_empty() {
        doc.push_str("Declared without a value\n");
    } else {
        doc.push_str(&format!("Declared value: {}\n", symbol.declared_value));
    }
    if !symbol.reassignments.is_empty() {
        doc.push_str("Reassignments:\n");
        for r in &symbol.reassignments {
            doc.push_str(&format!("  line {}: {} ({})\n", r.line + 1, r.value, r.tag));
        }
    }
    Resolution {
        detail: format!("var {}: {}", symbol.name, symbol.tag),
        documentation: doc,
    }
}
