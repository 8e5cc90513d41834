use once_cell::sync::Lazy;
use regex::Regex;

use super::condition::{check_condition, Site};
use super::declaration::check_declaration;
use super::{compile, pattern, starts_with_word, trimmed_span, LineContext, LineRule, Reporter, Severity};
use crate::token::{matching_close, split_top_level, Token, TokenKind};

static DOUBLED_SEMICOLON: Lazy<Option<Regex>> = Lazy::new(|| compile(r";\s*;"));

/// `for (var i = 0; cond; step) {` and `for (var x : items) {` headers.
pub struct Loop;

impl LineRule for Loop {
    fn name(&self) -> &'static str {
        "loop"
    }

    fn check(&self, ctx: &LineContext<'_>, out: &mut Reporter<'_>) {
        let code = ctx.code();
        let tokens = &ctx.tokens;
        let Some(keyword) = tokens.first().filter(|t| t.is_ident("for")) else {
            return;
        };
        let Some(open) = tokens.get(1).filter(|t| t.kind == TokenKind::LParen) else {
            out.error(keyword.offset, keyword.end(), "Single 'for' keyword");
            return;
        };
        let (_, line_end) = trimmed_span(code);
        let close = matching_close(tokens, 1).map(|i| (i, tokens[i]));
        let inner_end = close.map(|(_, t)| t.offset).unwrap_or(line_end);
        let header = Header {
            inner: &code[open.end()..inner_end],
            base: open.end(),
            span: (open.offset, close.map(|(_, t)| t.end()).unwrap_or(line_end)),
            keyword: *keyword,
        };

        let clauses = split_top_level(header.inner, ';');
        if clauses.len() == 1 {
            let separator_tokens = &tokens[2..close.map(|(i, _)| i).unwrap_or(tokens.len())];
            check_for_each(&header, separator_tokens, out);
        } else {
            check_three_clauses(ctx, &header, &clauses, out);
        }

        let Some((_, close)) = close else {
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

struct Header<'a> {
    /// Text between the parentheses.
    inner: &'a str,
    /// Line offset of `inner`.
    base: usize,
    /// Line span of the parenthesized part.
    span: (usize, usize),
    keyword: Token<'a>,
}

fn check_for_each(header: &Header<'_>, tokens: &[Token<'_>], out: &mut Reporter<'_>) {
    let mut depth = 0i32;
    let separator = tokens.iter().find(|t| {
        match t.kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => depth -= 1,
            _ => {}
        }
        depth == 0 && (t.kind == TokenKind::Colon || t.is_ident("of") || t.is_ident("in"))
    });
    let Some(separator) = separator else {
        out.error(header.span.0, header.span.1, "First two clauses must end with semicolon");
        return;
    };
    if separator.kind != TokenKind::Colon {
        out.error(
            separator.offset,
            separator.end(),
            format!("Use ':' instead of '{}'", separator.text),
        );
    }

    let (start, end) = trimmed_span(header.inner);
    if !starts_with_word(&header.inner[start..], "var") {
        out.error(
            header.base + start,
            header.base + end,
            "Loop variable must be declared by 'var' keyword",
        );
    }
}

fn check_three_clauses(
    ctx: &LineContext<'_>,
    header: &Header<'_>,
    clauses: &[(usize, &str)],
    out: &mut Reporter<'_>,
) {
    let doubled = out.check(
        header.inner,
        header.base,
        pattern(&DOUBLED_SEMICOLON),
        None,
        Severity::Error,
        "Clauses must end with only one semicolon",
    );

    let semicolons = clauses.len() - 1;
    if semicolons < 2 {
        out.error(header.span.0, header.span.1, "First two clauses must end with semicolon");
    } else if semicolons > 2 && !doubled {
        match clauses.last() {
            Some((offset, last)) if last.trim().is_empty() => {
                let at = header.base + offset - 1;
                out.error(at, at + 1, "Last clause mustn't end with semicolon");
            }
            _ => out.error(header.span.0, header.span.1, "A loop header takes exactly three clauses"),
        }
    }

    let (offset, first) = clauses[0];
    let (start, end) = trimmed_span(first);
    if starts_with_word(&first[start..], "var") {
        check_declaration(ctx, &first[start..end], header.base + offset + start, out);
    } else if start < end {
        out.warning(
            header.base + offset + start,
            header.base + offset + end,
            "Seems skipped variable declaration",
        );
    } else {
        let keyword = header.keyword;
        out.warning(keyword.offset, keyword.end(), "Seems skipped variable declaration");
    }

    if let Some(&(offset, condition)) = clauses.get(1) {
        if !condition.trim().is_empty() {
            check_condition(condition, header.base + offset, Site::ForClause, out);
        }
    }
}
