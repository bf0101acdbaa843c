use crate::script::error::ScriptError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Number(f64),
    Str(String),
    True,
    False,
    None,

    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Assign,

    Plus,
    Minus,
    Star,
    Slash,

    /// End of a statement. Not emitted inside brackets.
    Newline,
    Eof,
}

pub(crate) fn lex(input: &str) -> Result<Vec<Token>, ScriptError> {
    let mut out: Vec<Token> = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0usize;
    // open brackets; newlines inside them are whitespace
    let mut depth = 0usize;

    while i < bytes.len() {
        let c = bytes[i] as char;
        let start = i;

        if c == '\n' || c == ';' {
            i += 1;
            let last_is_break = out
                .last()
                .is_none_or(|t| t.kind == TokenKind::Newline);
            if depth == 0 && !last_is_break {
                out.push(Token {
                    kind: TokenKind::Newline,
                    span: Span { start, end: i },
                });
            }
            continue;
        }
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if c == '#' {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }
        // explicit line continuation
        if c == '\\' && bytes.get(i + 1) == Some(&b'\n') {
            i += 2;
            continue;
        }

        // Number: [0-9]+(.[0-9]*)?([eE][+-]?[0-9]+)? or .[0-9]+(...)
        if c.is_ascii_digit()
            || (c == '.' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit())
        {
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'.' {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
            if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
                let e_pos = i;
                i += 1;
                if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
                    i += 1;
                }
                let exp_start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                if exp_start == i {
                    return Err(ScriptError::new(
                        e_pos,
                        "invalid number exponent (expected digits)",
                    ));
                }
            }
            let v: f64 = input[start..i]
                .parse()
                .map_err(|_| ScriptError::new(start, "invalid number"))?;
            out.push(Token {
                kind: TokenKind::Number(v),
                span: Span { start, end: i },
            });
            continue;
        }

        if c == '"' || c == '\'' {
            let (s, end) = lex_string(input, start)?;
            i = end;
            out.push(Token {
                kind: TokenKind::Str(s),
                span: Span { start, end: i },
            });
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            i += 1;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            let kind = match &input[start..i] {
                "True" => TokenKind::True,
                "False" => TokenKind::False,
                "None" => TokenKind::None,
                s => TokenKind::Ident(s.to_owned()),
            };
            out.push(Token {
                kind,
                span: Span { start, end: i },
            });
            continue;
        }

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '=' => TokenKind::Assign,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            _ => {
                let ch = input[start..].chars().next().unwrap_or(c);
                return Err(ScriptError::new(start, format!("unexpected character '{ch}'")));
            }
        };
        match kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                depth = depth.saturating_sub(1)
            }
            _ => {}
        }
        i += 1;
        out.push(Token {
            kind,
            span: Span { start, end: i },
        });
    }

    out.push(Token {
        kind: TokenKind::Eof,
        span: Span {
            start: input.len(),
            end: input.len(),
        },
    });

    Ok(out)
}

// Returns the unescaped text and the offset just past the closing quote.
fn lex_string(input: &str, start: usize) -> Result<(String, usize), ScriptError> {
    let bytes = input.as_bytes();
    let quote = bytes[start];
    let mut out = String::new();
    let mut i = start + 1;
    let mut seg = i;
    while i < bytes.len() {
        match bytes[i] {
            b if b == quote => {
                out.push_str(&input[seg..i]);
                return Ok((out, i + 1));
            }
            b'\n' => break,
            b'\\' => {
                out.push_str(&input[seg..i]);
                let escaped = match bytes.get(i + 1) {
                    Some(b'n') => '\n',
                    Some(b't') => '\t',
                    Some(b'\\') => '\\',
                    Some(b'"') => '"',
                    Some(b'\'') => '\'',
                    _ => return Err(ScriptError::new(i, "unsupported escape sequence")),
                };
                out.push(escaped);
                i += 2;
                seg = i;
            }
            _ => i += 1,
        }
    }
    Err(ScriptError::new(start, "unterminated string literal"))
}
