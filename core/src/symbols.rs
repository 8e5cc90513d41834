use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::resolver::{self, SymbolLookup};
use crate::source::{split_lines, SourceLine};
use crate::token::{matching_close, tokenize, Token, TokenKind};
use crate::types::TypeTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub usize);

/// Kind of an open lexical scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeKind {
    Function,
    Class,
    Block,
    DoWhile,
}

/// Lines on which a symbol is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Scope {
    /// Declared outside every block; visible on every line.
    Global,
    /// Declared inside a block. `end` stays `None` until the block closes.
    Local { start: usize, end: Option<usize> },
}

impl Scope {
    pub fn contains(&self, line: usize) -> bool {
        match *self {
            Scope::Global => true,
            Scope::Local { start, end } => line >= start && end.is_none_or(|end| line <= end),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Scope::Global | Scope::Local { end: None, .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolOrigin {
    Variable,
    Parameter,
    LoopVariable,
}

/// A later `name = value` assignment to an already declared symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reassignment {
    pub line: usize,
    pub value: String,
    pub tag: TypeTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    /// Type inferred from the declaration (or the latest re-declaration).
    pub tag: TypeTag,
    pub origin: SymbolOrigin,
    pub declared_line: usize,
    pub declared_value: String,
    pub reassignments: Vec<Reassignment>,
    /// Line of the latest `var` re-declaration, which set `tag`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redeclared_line: Option<usize>,
    pub scope: Scope,
}

impl Symbol {
    /// Type as seen on `line`: the latest assignment at or before that
    /// line, whether a plain reassignment or a re-declaration.
    pub fn tag_at(&self, line: usize) -> TypeTag {
        let latest = self.reassignments.iter().rev().find(|r| r.line <= line);
        match (latest, self.redeclared_line) {
            (Some(r), Some(redeclared)) if redeclared <= line && r.line < redeclared => self.tag,
            (Some(r), _) => r.tag,
            (None, _) => self.tag,
        }
    }
}

/// Symbols, callables and structural facts of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    functions: Vec<String>,
    classes: Vec<String>,
    #[serde(skip)]
    do_while_closes: Vec<usize>,
}

impl SymbolTable {
    pub fn build(text: &str) -> Self {
        Self::from_lines(&split_lines(text))
    }

    pub fn from_lines(lines: &[SourceLine<'_>]) -> Self {
        let mut builder = Builder::default();
        for line in lines {
            if line.is_comment() || line.is_blank() {
                continue;
            }
            builder.scan_line(line);
        }
        let table = builder.table;
        debug!(
            symbols = table.symbols.len(),
            functions = table.functions.len(),
            classes = table.classes.len(),
            "symbol table built"
        );
        table
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0)
    }

    pub fn functions(&self) -> &[String] {
        &self.functions
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Symbols whose scope covers `line`, in declaration order.
    pub fn visible_at(&self, line: usize) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(move |s| s.scope.contains(line))
    }

    /// The innermost (latest declared) symbol named `name` visible on `line`.
    pub fn lookup_at(&self, name: &str, line: usize) -> Option<&Symbol> {
        self.symbols
            .iter()
            .rev()
            .find(|s| s.name == name && s.scope.contains(line))
    }

    /// True when `name` was declared on or before `line`, as a variable,
    /// parameter, function or class.
    pub fn is_known_at(&self, name: &str, line: usize) -> bool {
        self.symbols.iter().any(|s| s.name == name && s.declared_line <= line)
            || self.functions.iter().any(|f| f == name)
            || self.classes.iter().any(|c| c == name)
    }

    /// True when a `do { ... }` block is closed on `line`.
    pub fn closes_do_while(&self, line: usize) -> bool {
        self.do_while_closes.binary_search(&line).is_ok()
    }

    /// A resolver view of the table as it stands on `line`.
    pub fn at_line(&self, line: usize) -> LineView<'_> {
        LineView { table: self, line }
    }
}

/// [`SymbolLookup`] over the symbols visible on one line.
pub struct LineView<'a> {
    table: &'a SymbolTable,
    line: usize,
}

impl SymbolLookup for LineView<'_> {
    fn tag_of(&self, name: &str) -> Option<TypeTag> {
        self.table.lookup_at(name, self.line).map(|s| s.tag_at(self.line))
    }
}

#[derive(Debug)]
struct ScopeFrame {
    kind: ScopeKind,
    opened_at: usize,
    pending: Vec<SymbolId>,
    /// Header frames (`fun`, `class`, `do`) own the next `{` on their own
    /// line or on the following code line.
    awaiting_brace: bool,
}

#[derive(Default)]
struct Builder {
    table: SymbolTable,
    frames: Vec<ScopeFrame>,
}

impl Builder {
    fn scan_line(&mut self, line: &SourceLine<'_>) {
        let tokens = tokenize(&line.code);
        let Some(first) = tokens.first() else {
            return;
        };

        for (idx, tok) in tokens.iter().enumerate() {
            match tok.kind {
                TokenKind::RBrace => self.close(line.index),
                TokenKind::LBrace => match self.frames.last_mut() {
                    Some(frame) if frame.awaiting_brace => frame.awaiting_brace = false,
                    _ => self.open(ScopeKind::Block, line.index, false),
                },
                TokenKind::Ident if idx == 0 && (tok.text == "fun" || tok.text == "class") => {
                    self.open_header(line, &tokens);
                }
                TokenKind::Ident if tok.text == "do" => self.open(ScopeKind::DoWhile, line.index, true),
                _ => {}
            }
        }
        self.expire_brace_wait(line.index);

        if first.is_ident("var") {
            self.declare_var(line, &tokens);
        } else if first.is_ident("for") {
            self.declare_loop_var(line, &tokens);
        } else {
            self.record_reassignment(line, &tokens);
        }
    }

    fn open(&mut self, kind: ScopeKind, line: usize, awaiting_brace: bool) {
        trace!(?kind, line, "open scope");
        self.frames.push(ScopeFrame {
            kind,
            opened_at: line,
            pending: Vec::new(),
            awaiting_brace,
        });
    }

    fn close(&mut self, line: usize) {
        let Some(frame) = self.frames.pop() else {
            trace!(line, "close marker without open scope");
            return;
        };
        trace!(kind = ?frame.kind, opened_at = frame.opened_at, line, "close scope");
        for id in frame.pending {
            if let Some(symbol) = self.table.symbols.get_mut(id.0) {
                if let Scope::Local { end, .. } = &mut symbol.scope {
                    *end = Some(line);
                }
            }
        }
        if frame.kind == ScopeKind::DoWhile {
            self.table.do_while_closes.push(line);
        }
    }

    /// A header whose `{` is not on its own line or the next code line is
    /// treated as a one-line scope, closed before that next line declares
    /// anything.
    fn expire_brace_wait(&mut self, line: usize) {
        let expired = self
            .frames
            .last()
            .is_some_and(|frame| frame.awaiting_brace && frame.opened_at != line);
        if expired {
            let opened_at = self.frames.last().map(|f| f.opened_at).unwrap_or(line);
            self.close(opened_at);
        }
    }

    fn open_header(&mut self, line: &SourceLine<'_>, tokens: &[Token<'_>]) {
        let kind = if tokens[0].text == "fun" {
            ScopeKind::Function
        } else {
            ScopeKind::Class
        };
        self.open(kind, line.index, true);

        let Some(open) = tokens.iter().position(|t| t.kind == TokenKind::LParen) else {
            return;
        };
        let name = line.code[tokens[0].end()..tokens[open].offset].trim();
        if !name.is_empty() {
            match kind {
                ScopeKind::Class => self.table.classes.push(name.to_string()),
                _ => self.table.functions.push(name.to_string()),
            }
        }

        let params_end = matching_close(tokens, open)
            .map(|close| tokens[close].offset)
            .unwrap_or(line.code.len());
        let params = &line.code[tokens[open].end()..params_end];
        for param in params.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            self.insert(Symbol {
                id: SymbolId(0),
                name: param.to_string(),
                tag: TypeTag::Any,
                origin: SymbolOrigin::Parameter,
                declared_line: line.index,
                declared_value: String::new(),
                reassignments: Vec::new(),
                redeclared_line: None,
                scope: Scope::Global,
            });
        }
    }

    fn declare_var(&mut self, line: &SourceLine<'_>, tokens: &[Token<'_>]) {
        let head_end = tokens[0].end();
        let assign = tokens.iter().position(|t| t.is_assignment());
        let name_end = assign
            .map(|idx| tokens[idx].offset)
            .or_else(|| {
                tokens
                    .iter()
                    .find(|t| t.kind == TokenKind::Semicolon)
                    .map(|t| t.offset)
            })
            .unwrap_or(line.code.len());
        let name = line.code[head_end..name_end].trim();
        if name.is_empty() {
            return;
        }

        let (value, tag) = match assign {
            Some(idx) => {
                let value = initializer_text(line, tokens[idx].offset + 1);
                let tag = self.infer(&value, line.index);
                (value, tag)
            }
            None => (String::new(), TypeTag::Null),
        };
        self.declare(name, value, tag, SymbolOrigin::Variable, line.index);
    }

    /// `for (var x : items)` and `for (var i = 0; ...)` declare their
    /// variable in the block the header opens.
    fn declare_loop_var(&mut self, line: &SourceLine<'_>, tokens: &[Token<'_>]) {
        let (Some(open), Some(var)) = (tokens.get(1), tokens.get(2)) else {
            return;
        };
        if open.kind != TokenKind::LParen || !var.is_ident("var") {
            return;
        }
        let Some(name) = tokens.get(3).filter(|t| t.kind == TokenKind::Ident) else {
            return;
        };
        let (value, tag) = match tokens.get(4) {
            Some(t) if t.is_assignment() => {
                let value = initializer_text(line, t.offset + 1);
                let tag = self.infer(&value, line.index);
                (value, tag)
            }
            Some(t) if t.kind == TokenKind::Colon || t.is_ident("in") || t.is_ident("of") => {
                let end = tokens
                    .iter()
                    .rposition(|t| t.kind == TokenKind::RParen)
                    .map(|idx| tokens[idx].offset)
                    .unwrap_or(line.code.len());
                let value = line.raw.get(t.end()..end).unwrap_or("").trim().to_string();
                (value, TypeTag::Any)
            }
            _ => (String::new(), TypeTag::Null),
        };
        self.declare(name.text, value, tag, SymbolOrigin::LoopVariable, line.index);
    }

    fn record_reassignment(&mut self, line: &SourceLine<'_>, tokens: &[Token<'_>]) {
        let (Some(target), Some(op)) = (tokens.first(), tokens.get(1)) else {
            return;
        };
        if target.kind != TokenKind::Ident || !op.is_assignment() {
            return;
        }
        let value = initializer_text(line, op.offset + 1);
        let Some(id) = self.table.lookup_at(target.text, line.index).map(|s| s.id) else {
            return;
        };
        let tag = self.infer(&value, line.index);
        if let Some(symbol) = self.table.symbols.get_mut(id.0) {
            symbol.reassignments.push(Reassignment {
                line: line.index,
                value,
                tag,
            });
        }
    }

    fn declare(&mut self, name: &str, value: String, tag: TypeTag, origin: SymbolOrigin, line: usize) {
        let live = self
            .table
            .symbols
            .iter_mut()
            .rev()
            .find(|s| s.name == name && s.scope.is_open());
        if let Some(existing) = live {
            existing.tag = tag;
            existing.redeclared_line = Some(line);
            return;
        }
        self.insert(Symbol {
            id: SymbolId(0),
            name: name.to_string(),
            tag,
            origin,
            declared_line: line,
            declared_value: value,
            reassignments: Vec::new(),
            redeclared_line: None,
            scope: Scope::Global,
        });
    }

    /// Append a symbol, scoping it to the innermost open frame if any.
    fn insert(&mut self, mut symbol: Symbol) {
        let id = SymbolId(self.table.symbols.len());
        symbol.id = id;
        if let Some(frame) = self.frames.last_mut() {
            symbol.scope = Scope::Local {
                start: symbol.declared_line,
                end: None,
            };
            frame.pending.push(id);
        }
        self.table.symbols.push(symbol);
    }

    fn infer(&self, value: &str, line: usize) -> TypeTag {
        if value.trim_start().starts_with("fun") {
            return TypeTag::Any;
        }
        resolver::resolve(value, &self.table.at_line(line))
    }
}

/// Raw initializer text after `start`, up to the first top-level `;`.
fn initializer_text(line: &SourceLine<'_>, start: usize) -> String {
    let end = statement_end(&line.code, start);
    line.raw.get(start..end).unwrap_or("").trim().to_string()
}

fn statement_end(code: &str, start: usize) -> usize {
    let mut depth = 0i32;
    for (idx, ch) in code[start..].char_indices() {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ';' if depth <= 0 => return start + idx,
            _ => {}
        }
    }
    code.len()
}
