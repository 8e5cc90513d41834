/// Lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,     // name or keyword
    Number,    // 1, 2.5
    Str,       // "..." '...' `...`
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Dot,       // .
    Comma,     // ,
    Semicolon, // ;
    Colon,     // :
    Operator,  // maximal run of = ! < > + - * / % & | ^ ~ ?
    Other,
}

/// A token borrowed from one line, with its byte offset inside that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

impl<'a> Token<'a> {
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    pub fn is_ident(&self, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == word
    }

    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// A plain `=`, possibly fused with a unary operator that follows it
    /// (`=-1`, `=!flag`). The assigned value starts at `offset + 1`.
    pub fn is_assignment(&self) -> bool {
        self.kind == TokenKind::Operator && self.text.starts_with('=') && !self.text.starts_with("==")
    }
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '=' | '!' | '<' | '>' | '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '~' | '?')
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Tokenize one line of code. Never fails: unknown characters become
/// [`TokenKind::Other`] and an unterminated string runs to the end of the line.
pub fn tokenize(code: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chars = code.char_indices().peekable();
    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }
        let kind = match ch {
            '"' | '\'' | '`' => {
                chars.next();
                let mut escaped = false;
                for (_, c) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if c == ch {
                        break;
                    }
                }
                TokenKind::Str
            }
            c if c.is_ascii_digit() => {
                chars.next();
                while let Some(&(idx, c)) = chars.peek() {
                    let fraction = c == '.'
                        && code[idx + 1..].chars().next().is_some_and(|n| n.is_ascii_digit());
                    if c.is_ascii_digit() || fraction {
                        chars.next();
                    } else {
                        break;
                    }
                }
                TokenKind::Number
            }
            c if is_ident_start(c) => {
                chars.next();
                while chars.peek().is_some_and(|&(_, c)| is_ident_continue(c)) {
                    chars.next();
                }
                TokenKind::Ident
            }
            c if is_operator_char(c) => {
                chars.next();
                while chars.peek().is_some_and(|&(_, c)| is_operator_char(c)) {
                    chars.next();
                }
                TokenKind::Operator
            }
            _ => {
                chars.next();
                match ch {
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    '.' => TokenKind::Dot,
                    ',' => TokenKind::Comma,
                    ';' => TokenKind::Semicolon,
                    ':' => TokenKind::Colon,
                    _ => TokenKind::Other,
                }
            }
        };
        let end = chars.peek().map(|&(idx, _)| idx).unwrap_or(code.len());
        tokens.push(Token {
            kind,
            text: &code[start..end],
            offset: start,
        });
    }
    tokens
}

/// Index of the token closing the group opened at `open`, if the line has one.
pub fn matching_close(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    let (open_kind, close_kind) = match tokens.get(open)?.kind {
        TokenKind::LParen => (TokenKind::LParen, TokenKind::RParen),
        TokenKind::LBrace => (TokenKind::LBrace, TokenKind::RBrace),
        TokenKind::LBracket => (TokenKind::LBracket, TokenKind::RBracket),
        _ => return None,
    };
    let mut depth = 0i32;
    for (idx, tok) in tokens.iter().enumerate().skip(open) {
        if tok.kind == open_kind {
            depth += 1;
        } else if tok.kind == close_kind {
            depth -= 1;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}

/// Split `text` on `sep` where it appears outside brackets and string
/// literals. Each part keeps its byte offset in `text`.
pub fn split_top_level(text: &str, sep: char) -> Vec<(usize, &str)> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0usize;
    for (idx, ch) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' | '`' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            c if c == sep && depth <= 0 => {
                if sep != '.' || !is_decimal_point(text, idx) {
                    parts.push((start, &text[start..idx]));
                    start = idx + ch.len_utf8();
                }
            }
            _ => {}
        }
    }
    parts.push((start, &text[start..]));
    parts
}

fn is_decimal_point(text: &str, idx: usize) -> bool {
    let before = text[..idx].chars().next_back();
    let after = text[idx + 1..].chars().next();
    let digits_before = text[..idx]
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .all(|c| c.is_ascii_digit());
    before.is_some_and(|c| c.is_ascii_digit()) && after.is_some_and(|c| c.is_ascii_digit()) && digits_before
}
