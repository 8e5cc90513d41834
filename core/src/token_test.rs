#[cfg(test)]
mod tests {
    use crate::token::{matching_close, split_top_level, tokenize, TokenKind};

    fn kinds(code: &str) -> Vec<TokenKind> {
        tokenize(code).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn basic() {
        let tokens = tokenize(r#"var s = "a b";"#);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["var", "s", "=", "\"a b\"", ";"]);
        assert_eq!(tokens[3].offset, 8);
        assert_eq!(tokens[3].end(), 13);
    }

    #[test]
    fn operator_runs_are_maximal() {
        let tokens = tokenize("a **= b && c !== d");
        let ops: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Operator)
            .map(|t| t.text)
            .collect();
        assert_eq!(ops, vec!["**=", "&&", "!=="]);
    }

    #[test]
    fn decimal_numbers_keep_their_point() {
        assert_eq!(
            kinds("3.14.x"),
            vec![TokenKind::Number, TokenKind::Dot, TokenKind::Ident]
        );
    }

    #[test]
    fn unterminated_string_runs_to_end() {
        let tokens = tokenize("x = 'abc");
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Str));
        assert_eq!(tokens.last().map(|t| t.text), Some("'abc"));
    }

    #[test]
    fn matching_close_skips_nested_groups() {
        let tokens = tokenize("if (a(b) == c) {");
        assert_eq!(matching_close(&tokens, 1), Some(8));
        assert_eq!(tokens[8].kind, TokenKind::RParen);
        assert_eq!(matching_close(&tokens, 0), None);
    }

    #[test]
    fn split_top_level_ignores_nested_and_quoted_separators() {
        let parts = split_top_level(r#"Region(0.5, 1).find("a.b").getScore()"#, '.');
        let texts: Vec<&str> = parts.iter().map(|(_, p)| *p).collect();
        assert_eq!(texts, vec!["Region(0.5, 1)", r#"find("a.b")"#, "getScore()"]);
        assert_eq!(parts[1].0, 15);
    }

    #[test]
    fn split_top_level_keeps_decimal_points() {
        let parts = split_top_level("1.5", '.');
        assert_eq!(parts, vec![(0, "1.5")]);
    }
}
