use crate::script::ast::{BinaryOp, Expr, ExprKind, Stmt, UnaryOp};
use crate::script::error::ScriptError;
use crate::script::lexer::{Span, Token, TokenKind, lex};

pub(crate) fn parse_program(src: &str) -> Result<Vec<Stmt>, ScriptError> {
    let tokens = lex(src)?;
    let mut p = Parser { tokens, pos: 0 };
    let mut out = Vec::new();
    loop {
        while p.consume(TokenKind::Newline) {}
        if p.peek().kind == TokenKind::Eof {
            return Ok(out);
        }
        out.push(p.parse_statement()?);
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_at(&self, ahead: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + ahead).min(last)]
    }

    fn bump(&mut self) -> &Token {
        let t = &self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Span, ScriptError> {
        if self.peek().kind == kind {
            Ok(self.bump().span)
        } else {
            Err(ScriptError::new(
                self.span().start,
                format!("expected {}, found {}", describe(&kind), describe(&self.peek().kind)),
            ))
        }
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn parse_statement(&mut self) -> Result<Stmt, ScriptError> {
        let lhs = self.parse_expr()?;
        let stmt = if self.peek().kind == TokenKind::Assign {
            let at = self.bump().span.start;
            let value = self.parse_expr()?;
            match lhs.kind {
                ExprKind::Name(name) => Stmt::Assign { name, value },
                ExprKind::Index { target, index } => Stmt::SetItem {
                    target: *target,
                    index: *index,
                    value,
                },
                _ => return Err(ScriptError::new(at, "cannot assign to this expression")),
            }
        } else {
            Stmt::Expr(lhs)
        };
        if !self.consume(TokenKind::Newline) && self.peek().kind != TokenKind::Eof {
            return Err(ScriptError::new(
                self.span().start,
                format!("expected end of statement, found {}", describe(&self.peek().kind)),
            ));
        }
        Ok(stmt)
    }

    fn parse_expr(&mut self) -> Result<Expr, ScriptError> {
        self.parse_term()
    }

    fn parse_term(&mut self) -> Result<Expr, ScriptError> {
        let mut e = self.parse_factor()?;
        loop {
            let op = if self.consume(TokenKind::Plus) {
                BinaryOp::Add
            } else if self.consume(TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            let r = self.parse_factor()?;
            e = binary(op, e, r);
        }
        Ok(e)
    }

    fn parse_factor(&mut self) -> Result<Expr, ScriptError> {
        let mut e = self.parse_unary()?;
        loop {
            let op = if self.consume(TokenKind::Star) {
                BinaryOp::Mul
            } else if self.consume(TokenKind::Slash) {
                BinaryOp::Div
            } else {
                break;
            };
            let r = self.parse_unary()?;
            e = binary(op, e, r);
        }
        Ok(e)
    }

    fn parse_unary(&mut self) -> Result<Expr, ScriptError> {
        let start = self.span().start;
        let op = if self.consume(TokenKind::Minus) {
            UnaryOp::Neg
        } else if self.consume(TokenKind::Plus) {
            UnaryOp::Pos
        } else {
            return self.parse_postfix();
        };
        let e = self.parse_unary()?;
        let span = Span {
            start,
            end: e.span.end,
        };
        Ok(Expr {
            kind: ExprKind::Unary {
                op,
                expr: Box::new(e),
            },
            span,
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr, ScriptError> {
        let mut e = self.parse_primary()?;

        loop {
            if self.peek().kind == TokenKind::LParen {
                let open = self.bump().span.start;
                let func = match e.kind {
                    ExprKind::Name(name) => name,
                    _ => {
                        return Err(ScriptError::new(
                            open,
                            "call target must be an operation name",
                        ));
                    }
                };
                let (args, kwargs, end) = self.parse_args()?;
                e = Expr {
                    kind: ExprKind::Call { func, args, kwargs },
                    span: Span {
                        start: e.span.start,
                        end,
                    },
                };
                continue;
            }

            if self.consume(TokenKind::LBracket) {
                let index = self.parse_expr()?;
                let end = self.expect(TokenKind::RBracket)?.end;
                let start = e.span.start;
                e = Expr {
                    kind: ExprKind::Index {
                        target: Box::new(e),
                        index: Box::new(index),
                    },
                    span: Span { start, end },
                };
                continue;
            }

            break;
        }

        Ok(e)
    }

    // After the opening parenthesis; returns the end offset of the closing one.
    #[allow(clippy::type_complexity)]
    fn parse_args(&mut self) -> Result<(Vec<Expr>, Vec<(String, Expr)>, usize), ScriptError> {
        let mut args = Vec::new();
        let mut kwargs: Vec<(String, Expr)> = Vec::new();
        loop {
            if self.peek().kind == TokenKind::RParen {
                let end = self.bump().span.end;
                return Ok((args, kwargs, end));
            }
            let keyword = match (&self.peek().kind, &self.peek_at(1).kind) {
                (TokenKind::Ident(name), TokenKind::Assign) => Some(name.clone()),
                _ => None,
            };
            if let Some(name) = keyword {
                let at = self.span().start;
                self.bump();
                self.bump();
                if kwargs.iter().any(|(k, _)| *k == name) {
                    return Err(ScriptError::new(at, format!("keyword argument '{name}' repeated")));
                }
                kwargs.push((name, self.parse_expr()?));
            } else {
                if !kwargs.is_empty() {
                    return Err(ScriptError::new(
                        self.span().start,
                        "positional argument follows keyword argument",
                    ));
                }
                args.push(self.parse_expr()?);
            }
            if !self.consume(TokenKind::Comma) {
                let end = self.expect(TokenKind::RParen)?.end;
                return Ok((args, kwargs, end));
            }
        }
    }

    // Items up to `close`, allowing a trailing comma. Reports whether a comma was seen.
    fn parse_items(&mut self, close: TokenKind) -> Result<(Vec<Expr>, bool, usize), ScriptError> {
        let mut items = Vec::new();
        let mut comma = false;
        loop {
            if self.peek().kind == close {
                let end = self.bump().span.end;
                return Ok((items, comma, end));
            }
            items.push(self.parse_expr()?);
            if self.consume(TokenKind::Comma) {
                comma = true;
            } else {
                let end = self.expect(close)?.end;
                return Ok((items, comma, end));
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ScriptError> {
        let t = self.bump().clone();
        let start = t.span.start;
        let kind = match t.kind {
            TokenKind::Number(v) => ExprKind::Number(v),
            TokenKind::Str(mut s) => {
                // adjacent literals concatenate
                let mut end = t.span.end;
                while let TokenKind::Str(next) = &self.peek().kind {
                    s.push_str(next);
                    end = self.bump().span.end;
                }
                return Ok(Expr {
                    kind: ExprKind::Str(s),
                    span: Span { start, end },
                });
            }
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::None => ExprKind::None,
            TokenKind::Ident(s) => ExprKind::Name(s),
            TokenKind::LParen => {
                let (mut items, comma, end) = self.parse_items(TokenKind::RParen)?;
                let span = Span { start, end };
                if items.len() == 1 && !comma {
                    // parenthesized expression, not a tuple
                    let mut inner = items.remove(0);
                    inner.span = span;
                    return Ok(inner);
                }
                return Ok(Expr {
                    kind: ExprKind::Tuple(items),
                    span,
                });
            }
            TokenKind::LBracket => {
                let (items, _, end) = self.parse_items(TokenKind::RBracket)?;
                return Ok(Expr {
                    kind: ExprKind::List(items),
                    span: Span { start, end },
                });
            }
            TokenKind::LBrace => return self.parse_dict(start),
            other => {
                return Err(ScriptError::new(
                    start,
                    format!("unexpected {}", describe(&other)),
                ));
            }
        };
        Ok(Expr { kind, span: t.span })
    }

    fn parse_dict(&mut self, start: usize) -> Result<Expr, ScriptError> {
        let mut entries = Vec::new();
        loop {
            if self.peek().kind == TokenKind::RBrace {
                break;
            }
            let key = self.parse_expr()?;
            self.expect(TokenKind::Colon)?;
            let value = self.parse_expr()?;
            entries.push((key, value));
            if !self.consume(TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(TokenKind::RBrace)?.end;
        Ok(Expr {
            kind: ExprKind::Dict(entries),
            span: Span { start, end },
        })
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = Span {
        start: left.span.start,
        end: right.span.end,
    };
    Expr {
        kind: ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(s) => format!("name '{s}'"),
        TokenKind::Number(v) => format!("number {v}"),
        TokenKind::Str(_) => "string".to_owned(),
        TokenKind::True | TokenKind::False => "boolean".to_owned(),
        TokenKind::None => "None".to_owned(),
        TokenKind::LParen => "'('".to_owned(),
        TokenKind::RParen => "')'".to_owned(),
        TokenKind::LBracket => "'['".to_owned(),
        TokenKind::RBracket => "']'".to_owned(),
        TokenKind::LBrace => "'{'".to_owned(),
        TokenKind::RBrace => "'}'".to_owned(),
        TokenKind::Comma => "','".to_owned(),
        TokenKind::Colon => "':'".to_owned(),
        TokenKind::Assign => "'='".to_owned(),
        TokenKind::Plus => "'+'".to_owned(),
        TokenKind::Minus => "'-'".to_owned(),
        TokenKind::Star => "'*'".to_owned(),
        TokenKind::Slash => "'/'".to_owned(),
        TokenKind::Newline => "end of line".to_owned(),
        TokenKind::Eof => "end of input".to_owned(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/parser.rs"]
mod tests;
