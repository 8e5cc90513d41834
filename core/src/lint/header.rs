use once_cell::sync::Lazy;
use regex::Regex;

use super::{compile, invalid_name_char, pattern, trimmed_span, LineContext, LineRule, Reporter, Severity};
use crate::token::{matching_close, TokenKind};

static FUNCTION_WORD: Lazy<Option<Regex>> = Lazy::new(|| compile(r"\bfunction\b"));

/// `fun name(params) {` and `class Name(params) {` headers.
pub struct Header;

impl LineRule for Header {
    fn name(&self) -> &'static str {
        "header"
    }

    fn check(&self, ctx: &LineContext<'_>, out: &mut Reporter<'_>) {
        let code = ctx.code();
        out.check(
            code,
            0,
            pattern(&FUNCTION_WORD),
            None,
            Severity::Error,
            "You must declare the function by 'fun' keyword instead",
        );

        let tokens = &ctx.tokens;
        let Some(keyword) = tokens.first().filter(|t| t.is_ident("fun") || t.is_ident("class")) else {
            return;
        };
        let what = if keyword.text == "fun" { "function" } else { "class" };
        let (_, line_end) = trimmed_span(code);

        if tokens[1..].iter().all(|t| t.kind == TokenKind::Semicolon) {
            out.error(keyword.offset, line_end, "Single keyword");
            return;
        }

        let Some(open_idx) = tokens.iter().position(|t| t.kind == TokenKind::LParen) else {
            return;
        };
        let open = tokens[open_idx];
        if open_idx == 1 {
            out.error(open.offset, open.end(), format!("Skipped {what} name"));
        } else {
            let name_region = &code[keyword.end()..open.offset];
            let (start, end) = trimmed_span(name_region);
            let name = &name_region[start..end];
            if invalid_name_char(name, true).is_some() {
                let at = keyword.end() + start;
                out.error(
                    at,
                    at + name.len(),
                    format!(
                        "Incorrect {what} name. It can include only text characters, numbers or '_' and must starts with text character"
                    ),
                );
            }
        }

        let Some(close) = matching_close(tokens, open_idx).map(|i| tokens[i]) else {
            return;
        };
        let tail = code[close.end()..].trim();
        let block_follows = if tail.is_empty() {
            ctx.next.is_some_and(|next| next.code.trim_start().starts_with('{'))
        } else {
            tail.starts_with('{')
        };
        if !block_follows {
            out.error(close.offset, line_end, "Block declaration expected");
        }
    }
}
