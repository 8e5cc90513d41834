use once_cell::sync::Lazy;
use regex::Regex;

use super::{
    compile, pattern, trimmed_span, LineContext, LineRule, Reporter, Severity, ALWAYS_FALSE, ALWAYS_TRUE, OPERAND,
};
use crate::token::{matching_close, TokenKind};

/// Where a condition appears. Loop conditions are stricter about constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Site {
    If,
    While,
    ForClause,
}

const COMPARISON: &str = r"(==|!=|<=|>=|<|>)";

static SINGLE_EQ: Lazy<Option<Regex>> = Lazy::new(|| compile(&format!(r"^{OPERAND}\s*=\s*{OPERAND}$")));
static BANG_GT: Lazy<Option<Regex>> = Lazy::new(|| compile(&format!(r"^{OPERAND}\s*!>\s*{OPERAND}$")));
static BANG_LT: Lazy<Option<Regex>> = Lazy::new(|| compile(&format!(r"^{OPERAND}\s*!<\s*{OPERAND}$")));
static EQ_BANG: Lazy<Option<Regex>> = Lazy::new(|| compile(&format!(r"^{OPERAND}\s*=!\s*{OPERAND}$")));
static TRAILING_BANG: Lazy<Option<Regex>> =
    Lazy::new(|| compile(&format!(r"^{OPERAND}\s*(<=!|>=!|<!|>!)\s*{OPERAND}$")));
static SELF_COMPARE: Lazy<Option<Regex>> =
    Lazy::new(|| compile(&format!(r"^({OPERAND})\s*{COMPARISON}\s*({OPERAND})$")));
static MISSING_OPERAND: Lazy<Option<Regex>> =
    Lazy::new(|| compile(&format!(r"^{COMPARISON}|{COMPARISON}$")));

static EMPHASIS_EQ: Lazy<Option<Regex>> = Lazy::new(|| compile("="));
static EMPHASIS_BANG_GT: Lazy<Option<Regex>> = Lazy::new(|| compile("!>"));
static EMPHASIS_BANG_LT: Lazy<Option<Regex>> = Lazy::new(|| compile("!<"));
static EMPHASIS_EQ_BANG: Lazy<Option<Regex>> = Lazy::new(|| compile("=!"));
static EMPHASIS_TRAILING_BANG: Lazy<Option<Regex>> = Lazy::new(|| compile("(<=!|>=!|<!|>!)"));

/// `if (...)`, `else if (...)`, `while (...)` headers and bare `do`.
pub struct Condition;

impl LineRule for Condition {
    fn name(&self) -> &'static str {
        "condition"
    }

    fn check(&self, ctx: &LineContext<'_>, out: &mut Reporter<'_>) {
        let code = ctx.code();
        let tokens = &ctx.tokens;
        let (_, line_end) = trimmed_span(code);

        let mut idx = 0;
        if tokens.get(idx).is_some_and(|t| t.kind == TokenKind::RBrace) {
            idx += 1;
        }
        if tokens.get(idx).is_some_and(|t| t.is_ident("else")) {
            idx += 1;
        }

        if let Some(tok) = tokens.get(idx).filter(|t| t.is_ident("do")) {
            let tail = code[tok.end()..].trim();
            if !tail.is_empty() && !tail.starts_with('{') {
                out.error(tok.offset, line_end, "Statement requires braces after condition");
            }
            return;
        }

        let Some(keyword) = tokens.get(idx).filter(|t| t.is_ident("if") || t.is_ident("while")) else {
            return;
        };
        let site = if keyword.text == "if" { Site::If } else { Site::While };
        let Some(open) = tokens.get(idx + 1).filter(|t| t.kind == TokenKind::LParen) else {
            return;
        };
        let Some(close) = matching_close(tokens, idx + 1).map(|i| tokens[i]) else {
            return;
        };

        let condition = &code[open.end()..close.offset];
        if condition.trim().is_empty() {
            out.error(keyword.offset, close.end(), "Empty condition");
        }

        let tail = code[close.end()..].trim();
        if !tail.is_empty() && !tail.starts_with('{') && !(site == Site::While && closes_do_while(ctx)) {
            out.error(keyword.offset, line_end, "Statement requires braces after condition");
        }

        if !condition.trim().is_empty() {
            check_condition(condition, open.end(), site, out);
        }
    }
}

/// The `while` of `do { } while (...)`, on the closing line or the line after it.
fn closes_do_while(ctx: &LineContext<'_>) -> bool {
    let table = ctx.table;
    table.closes_do_while(ctx.line.index)
        || ctx
            .prev
            .is_some_and(|prev| prev.code.trim() == "}" && table.closes_do_while(prev.index))
}

/// Check the text between the parentheses of a condition. `text` starts at
/// byte `base` of the line.
pub(super) fn check_condition(text: &str, base: usize, site: Site, out: &mut Reporter<'_>) {
    let (start, end) = trimmed_span(text);
    let condition = &text[start..end];
    let base = base + start;
    let whole = (base, base + condition.len());

    if pattern(&ALWAYS_TRUE).is_some_and(|re| re.is_match(condition)) {
        match site {
            Site::If => out.warning(whole.0, whole.1, "Condition is always true and doesn't have any sense"),
            Site::While => out.error(whole.0, whole.1, "Condition is always true and will cause infinity loop"),
            Site::ForClause => out.error(whole.0, whole.1, "Condition is always true. It will cause infinity loop"),
        }
    } else if pattern(&ALWAYS_FALSE).is_some_and(|re| re.is_match(condition)) {
        let message = match site {
            Site::ForClause => "Condition is always false and the loop will never be executed",
            _ => "Condition is always false and will never be executed",
        };
        out.warning(whole.0, whole.1, message);
    }

    let single_eq = match site {
        Site::ForClause => "'=' or '!' expected",
        _ => "'=' or '!' excepted.",
    };
    out.check(condition, base, pattern(&SINGLE_EQ), pattern(&EMPHASIS_EQ), Severity::Error, single_eq);
    out.check(
        condition,
        base,
        pattern(&BANG_GT),
        pattern(&EMPHASIS_BANG_GT),
        Severity::Error,
        "Use <= instead",
    );
    out.check(
        condition,
        base,
        pattern(&BANG_LT),
        pattern(&EMPHASIS_BANG_LT),
        Severity::Error,
        "Use >= instead",
    );
    out.check(
        condition,
        base,
        pattern(&EQ_BANG),
        pattern(&EMPHASIS_EQ_BANG),
        Severity::Error,
        "Move '!' before '='",
    );
    out.check(
        condition,
        base,
        pattern(&TRAILING_BANG),
        pattern(&EMPHASIS_TRAILING_BANG),
        Severity::Error,
        "Operators are fully incorrect",
    );
    out.check(
        condition,
        base,
        pattern(&MISSING_OPERAND),
        None,
        Severity::Error,
        "Comparison '$$' is missing an operand",
    );

    let same_sides = pattern(&SELF_COMPARE)
        .and_then(|re| re.captures(condition))
        .is_some_and(|caps| caps[1] == caps[3] && !caps[1].starts_with('"'));
    if same_sides {
        out.error(whole.0, whole.1, "Comparing a value with itself");
    }
}
