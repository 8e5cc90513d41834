use once_cell::sync::Lazy;
use regex::Regex;

use super::{
    compile, invalid_name_char, pattern, starts_with_word, trimmed_span, LineContext, LineRule, Reporter, Severity,
};
use crate::catalog::{GLOBAL_FUNCTIONS, NAMESPACE_ROOTS};
use crate::resolver;
use crate::token::{tokenize, TokenKind};
use crate::types::TypeTag;

static SINGLE_VAR: Lazy<Option<Regex>> = Lazy::new(|| compile(r"\bvar\b\s*;*\s*$"));
static LET: Lazy<Option<Regex>> = Lazy::new(|| compile(r"\blet\b"));
static CONST: Lazy<Option<Regex>> = Lazy::new(|| compile(r"\bconst\b"));
static SELF_ASSIGN: Lazy<Option<Regex>> =
    Lazy::new(|| compile(r"\b(var\s+)?([A-Za-z_]\w*)\s*=\s*([A-Za-z_]\w*)\s*(?:;|$)"));

const WORD_LITERALS: &[&str] = &["true", "false", "null", "and", "or", "not"];

/// `var` statements and plain `name = name` assignments.
pub struct Declaration;

impl LineRule for Declaration {
    fn name(&self) -> &'static str {
        "declaration"
    }

    fn check(&self, ctx: &LineContext<'_>, out: &mut Reporter<'_>) {
        let code = ctx.code();
        out.check(code, 0, pattern(&SINGLE_VAR), None, Severity::Error, "Single declaration keyword");
        forbid_keyword(
            code,
            pattern(&LET),
            "'let' declaration isn't supported. Use 'var' instead - it has the same properties.",
            out,
        );
        forbid_keyword(
            code,
            pattern(&CONST),
            "'const' declaration isn't supported. Use 'var' instead",
            out,
        );
        if let Some(var) = ctx.tokens.first().filter(|t| t.is_ident("var")) {
            check_declaration(ctx, &code[var.offset..], var.offset, out);
        }
        check_self_assignment(ctx, code, out);
    }
}

/// `let` / `const` are errors unless they are the name in `var let`.
fn forbid_keyword(code: &str, re: Option<&Regex>, message: &str, out: &mut Reporter<'_>) {
    let Some(re) = re else {
        return;
    };
    let hit = re.find_iter(code).find(|m| {
        let before = &code[..m.start()];
        !before
            .strip_suffix(char::is_whitespace)
            .is_some_and(|b| b.ends_with("var"))
    });
    if let Some(m) = hit {
        out.error(m.start(), m.end(), message);
    }
}

/// Check one `var name = value` statement. `text` starts at the `var`
/// keyword, which is byte `base` of the line.
pub(super) fn check_declaration(ctx: &LineContext<'_>, text: &str, base: usize, out: &mut Reporter<'_>) {
    let tokens = tokenize(text);
    let assign = tokens.iter().find(|t| t.is_assignment());
    let head = "var".len();
    let statement_end = tokens
        .iter()
        .find(|t| t.kind == TokenKind::Semicolon)
        .map(|t| t.offset)
        .unwrap_or(text.len());

    let name_end = assign.map(|t| t.offset).unwrap_or(statement_end).max(head);
    let name_region = &text[head..name_end];
    let (name_start, name_stop) = trimmed_span(name_region);
    let name = &name_region[name_start..name_stop];
    if let Some((offset, len)) = invalid_name_char(name, false) {
        let at = base + head + name_start + offset;
        out.error(
            at,
            at + len,
            "Incorrect variable name. It can include only text characters, numbers or '_' and must starts with text character",
        );
    }

    let Some(assign) = assign else {
        return;
    };
    let value_from = assign.offset + 1;
    let value_region = &text[value_from..statement_end.max(value_from)];
    let (value_start, value_stop) = trimmed_span(value_region);
    let value = &value_region[value_start..value_stop];
    let value_at = base + value_from + value_start;
    let (_, text_end) = trimmed_span(text);

    if value.is_empty() {
        out.error(base, base + text_end, "You must assign a value");
    } else if value.starts_with('{') {
        out.error(
            value_at,
            base + text_end,
            "Macrorify syntax doesn't support objects in this format. Use Map instead.",
        );
    } else if starts_with_word(value, "fun") {
        out.error(value_at, base + text_end, "Variable can't contain function as value");
    } else if starts_with_word(value, "undefined") {
        out.error(
            base + assign.offset,
            value_at + "undefined".len(),
            "Macrorify syntax doesn't support undefined",
        );
    } else if value.starts_with(['\'', '`']) {
        out.error(base, base + text_end, "Macrorify syntax supports double quotes only");
    } else if !is_recognized_value(ctx, value) {
        out.error(
            base,
            base + text_end,
            "Incorrect data type assigned. It's not variable, keyword, boolean, string, number, array or null.",
        );
    }
}

/// A value is recognized when it classifies as a literal or built-in, or
/// when any name it starts a chain with is already known.
fn is_recognized_value(ctx: &LineContext<'_>, value: &str) -> bool {
    let line = ctx.line.index;
    if resolver::resolve(value, &ctx.table.at_line(line)) != TypeTag::Any {
        return true;
    }
    let tokens = tokenize(value);
    let mut roots = tokens
        .iter()
        .enumerate()
        .filter(|(idx, tok)| {
            tok.kind == TokenKind::Ident && (*idx == 0 || tokens[idx - 1].kind != TokenKind::Dot)
        })
        .map(|(_, tok)| tok.text)
        .peekable();
    if roots.peek().is_none() {
        return true;
    }
    roots.any(|name| {
        WORD_LITERALS.contains(&name)
            || GLOBAL_FUNCTIONS.contains(&name)
            || NAMESPACE_ROOTS.contains(&name)
            || ctx.table.is_known_at(name, line)
    })
}

fn check_self_assignment(ctx: &LineContext<'_>, code: &str, out: &mut Reporter<'_>) {
    let Some(re) = pattern(&SELF_ASSIGN) else {
        return;
    };
    let Some(caps) = re.captures_iter(code).find(|caps| caps[2] == caps[3]) else {
        return;
    };
    let (Some(name), Some(value)) = (caps.get(2), caps.get(3)) else {
        return;
    };
    if caps.get(1).is_some() {
        out.error(value.start(), value.end(), "Incorrect value assigned on declaration");
    } else if ctx.table.is_known_at(name.as_str(), ctx.line.index) {
        out.warning(value.start(), value.end(), "Changing variable value to the same value");
    } else {
        out.error(value.start(), value.end(), "Variable is not declared");
    }
}
