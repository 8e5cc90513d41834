use super::{LineContext, LineRule, Reporter};
use crate::token::TokenKind;

/// Operators the language does not have, with the suggested replacement.
/// Longer operators come before the shorter ones they contain.
const UNSUPPORTED: &[(&str, &str)] = &[
    ("&&", "Use 'and' instead"),
    ("||", "Use 'or' instead"),
    (
        "===",
        "Three equal signes are not supported. Use '==' instead with type checking or compiling",
    ),
    (
        "!==",
        "Three equal signes are not supported. Use '!=' instead with type checking or compiling",
    ),
    (
        "+=",
        "Such increment is not supported. Declare the variable and increase it then.\nFor example: i = i + 1",
    ),
    (
        "-=",
        "Such decrement is not supported. Declare the variable and decrease it then.\nFor example: i = i - 1",
    ),
    (
        "**=",
        "You can't raise a value by this way. Write it in standard way:\ni = i * i * i... * n",
    ),
    (
        "*=",
        "Such multiplication is not supported. Declare the variable and multiply it then.\nFor example: i = i * 2",
    ),
    (
        "/=",
        "Such division is not supported. Declare the variable and divide it then.\nFor example: i = i / 2",
    ),
    ("++", "This increment is not supported."),
    ("--", "This decrement is not supported."),
];

pub struct Operators;

impl LineRule for Operators {
    fn name(&self) -> &'static str {
        "operators"
    }

    fn check(&self, ctx: &LineContext<'_>, out: &mut Reporter<'_>) {
        let mut reported: Vec<(usize, usize)> = Vec::new();
        for (op, message) in UNSUPPORTED {
            let hit = ctx
                .tokens
                .iter()
                .filter(|t| t.kind == TokenKind::Operator)
                .flat_map(|t| t.text.match_indices(op).map(move |(at, _)| t.offset + at))
                .map(|start| (start, start + op.len()))
                .find(|&(start, end)| !reported.iter().any(|&(s, e)| start < e && s < end));
            if let Some((start, end)) = hit {
                out.error(start, end, *message);
                reported.push((start, end));
            }
        }

        let quoted = ctx
            .tokens
            .iter()
            .find(|t| t.kind == TokenKind::Str && t.text.starts_with(['\'', '`']));
        if let Some(tok) = quoted {
            out.error(tok.offset, tok.end(), "Unsupported quotes");
        }
    }
}
