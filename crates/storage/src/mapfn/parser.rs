//! Recursive-descent parser for map functions
//!
//! Grammar:
//!
//! ```text
//! function   := 'function' IDENT? '(' IDENT (',' IDENT)? ')' block
//! block      := '{' stmt* '}'
//! stmt       := ';'
//!             | 'if' '(' expr ')' body ('else' body)?
//!             | 'emit' '(' expr ',' expr ')' ';'?
//! body       := block | stmt
//! expr       := and ('||' and)*
//! and        := equality ('&&' equality)*
//! equality   := comparison (('==' | '!=') comparison)*
//! comparison := unary (('<' | '<=' | '>' | '>=') unary)*
//! unary      := ('!' | '-') unary | primary
//! primary    := literal | '(' expr ')' | IDENT member*
//! member     := '.' IDENT | '[' (STRING | NUMBER) ']'
//! ```
//!
//! Nesting (unary operators, parentheses, operator chains, nested `if`
//! bodies) is capped at [`MAX_NESTING`] so that neither the parser nor the
//! evaluator can exhaust the stack.

use super::lexer::{Spanned, Token};
use super::MapError;
use serde_json::Value as JsonValue;

/// Maximum expression and statement nesting depth
pub(crate) const MAX_NESTING: usize = 256;

/// Root object a path starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Root {
    Doc,
    Meta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinOp {
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Literal(JsonValue),
    Path { root: Root, segments: Vec<String> },
    Not(Box<Expr>),
    Neg(Box<Expr>),
    Binary { op: BinOp, lhs: Box<Expr>, rhs: Box<Expr> },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Stmt {
    If {
        cond: Expr,
        then: Vec<Stmt>,
        otherwise: Vec<Stmt>,
    },
    Emit {
        key: Expr,
        value: Expr,
    },
}

pub(crate) struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end: usize,
    depth: usize,
    doc_param: String,
    meta_param: Option<String>,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Spanned>, src_len: usize) -> Self {
        Parser {
            tokens,
            pos: 0,
            end: src_len,
            depth: 0,
            doc_param: String::new(),
            meta_param: None,
        }
    }

    /// Parse a complete `function (doc, meta) { ... }`
    pub(crate) fn parse_function(mut self) -> Result<Vec<Stmt>, MapError> {
        self.expect_keyword("function")?;
        if let Some(Token::Ident(_)) = self.peek() {
            // Named functions are accepted; the name is irrelevant
            self.pos += 1;
        }
        self.expect(Token::LParen, "'('")?;
        self.doc_param = self.expect_ident()?;
        if self.eat(&Token::Comma) {
            self.meta_param = Some(self.expect_ident()?);
        }
        self.expect(Token::RParen, "')'")?;
        let body = self.block()?;
        if self.pos < self.tokens.len() {
            return Err(self.error("unexpected input after function body"));
        }
        Ok(body)
    }

    fn block(&mut self) -> Result<Vec<Stmt>, MapError> {
        self.expect(Token::LBrace, "'{'")?;
        let mut stmts = Vec::new();
        loop {
            if self.eat(&Token::RBrace) {
                return Ok(stmts);
            }
            if self.peek().is_none() {
                return Err(self.error("expected '}'"));
            }
            if let Some(stmt) = self.statement()? {
                stmts.push(stmt);
            }
        }
    }

    fn body(&mut self) -> Result<Vec<Stmt>, MapError> {
        if self.peek() == Some(&Token::LBrace) {
            self.block()
        } else {
            Ok(self.statement()?.into_iter().collect())
        }
    }

    fn statement(&mut self) -> Result<Option<Stmt>, MapError> {
        if self.eat(&Token::Semi) {
            return Ok(None);
        }
        match self.peek() {
            Some(Token::Ident(word)) if word == "if" => {
                self.pos += 1;
                self.expect(Token::LParen, "'('")?;
                let cond = self.expr()?;
                self.expect(Token::RParen, "')'")?;
                self.descend()?;
                let then = self.body()?;
                let otherwise = if self.eat_keyword("else") {
                    self.body()?
                } else {
                    Vec::new()
                };
                self.depth -= 1;
                Ok(Some(Stmt::If {
                    cond,
                    then,
                    otherwise,
                }))
            }
            Some(Token::Ident(word)) if word == "emit" => {
                self.pos += 1;
                self.expect(Token::LParen, "'('")?;
                let key = self.expr()?;
                self.expect(Token::Comma, "','")?;
                let value = self.expr()?;
                self.expect(Token::RParen, "')'")?;
                self.eat(&Token::Semi);
                Ok(Some(Stmt::Emit { key, value }))
            }
            _ => Err(self.error("expected 'if' or 'emit' statement")),
        }
    }

    // Each operator in a left-associative chain deepens the tree by one, so
    // chains count against the nesting limit until the chain ends.

    fn expr(&mut self) -> Result<Expr, MapError> {
        let start = self.depth;
        let mut lhs = self.and()?;
        while self.eat(&Token::OrOr) {
            self.descend()?;
            let rhs = self.and()?;
            lhs = binary(BinOp::Or, lhs, rhs);
        }
        self.depth = start;
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, MapError> {
        let start = self.depth;
        let mut lhs = self.equality()?;
        while self.eat(&Token::AndAnd) {
            self.descend()?;
            let rhs = self.equality()?;
            lhs = binary(BinOp::And, lhs, rhs);
        }
        self.depth = start;
        Ok(lhs)
    }

    fn equality(&mut self) -> Result<Expr, MapError> {
        let start = self.depth;
        let mut lhs = self.comparison()?;
        loop {
            let op = match self.peek() {
                Some(Token::EqEq) => BinOp::Eq,
                Some(Token::NotEq) => BinOp::NotEq,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            let rhs = self.comparison()?;
            lhs = binary(op, lhs, rhs);
        }
        self.depth = start;
        Ok(lhs)
    }

    fn comparison(&mut self) -> Result<Expr, MapError> {
        let start = self.depth;
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Lt) => BinOp::Lt,
                Some(Token::Le) => BinOp::Le,
                Some(Token::Gt) => BinOp::Gt,
                Some(Token::Ge) => BinOp::Ge,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs);
        }
        self.depth = start;
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, MapError> {
        let expr = if self.eat(&Token::Bang) {
            self.descend()?;
            Expr::Not(Box::new(self.unary()?))
        } else if self.eat(&Token::Minus) {
            self.descend()?;
            Expr::Neg(Box::new(self.unary()?))
        } else {
            return self.primary();
        };
        self.depth -= 1;
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, MapError> {
        let Some(spanned) = self.tokens.get(self.pos).cloned() else {
            return Err(self.error("unexpected end of input"));
        };
        self.pos += 1;
        match spanned.token {
            Token::Str(s) => Ok(Expr::Literal(JsonValue::String(s))),
            Token::Number(n) => Ok(Expr::Literal(number(n))),
            Token::LParen => {
                self.descend()?;
                let inner = self.expr()?;
                self.expect(Token::RParen, "')'")?;
                self.depth -= 1;
                Ok(inner)
            }
            Token::Ident(word) => match word.as_str() {
                "true" => Ok(Expr::Literal(JsonValue::Bool(true))),
                "false" => Ok(Expr::Literal(JsonValue::Bool(false))),
                "null" | "undefined" => Ok(Expr::Literal(JsonValue::Null)),
                _ => {
                    let root = if word == self.doc_param {
                        Root::Doc
                    } else if self.meta_param.as_deref() == Some(word.as_str()) {
                        Root::Meta
                    } else {
                        return Err(MapError::new(
                            format!("unknown identifier '{}'", word),
                            spanned.offset,
                        ));
                    };
                    let segments = self.members()?;
                    Ok(Expr::Path { root, segments })
                }
            },
            _ => Err(MapError::new("expected an expression", spanned.offset)),
        }
    }

    fn members(&mut self) -> Result<Vec<String>, MapError> {
        let mut segments = Vec::new();
        loop {
            if self.eat(&Token::Dot) {
                segments.push(self.expect_ident()?);
            } else if self.eat(&Token::LBracket) {
                let Some(spanned) = self.tokens.get(self.pos).cloned() else {
                    return Err(self.error("unexpected end of input"));
                };
                self.pos += 1;
                match spanned.token {
                    Token::Str(s) => segments.push(s),
                    Token::Number(n) if n >= 0.0 && n.fract() == 0.0 => {
                        segments.push((n as u64).to_string())
                    }
                    _ => return Err(MapError::new("expected a property name", spanned.offset)),
                }
                self.expect(Token::RBracket, "']'")?;
            } else {
                return Ok(segments);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Token helpers
    // ---------------------------------------------------------------------

    fn descend(&mut self) -> Result<(), MapError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(format!(
                "nesting exceeds maximum depth of {}",
                MAX_NESTING
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        match self.peek() {
            Some(Token::Ident(word)) if word == keyword => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn expect(&mut self, token: Token, what: &str) -> Result<(), MapError> {
        if self.eat(&token) {
            Ok(())
        } else {
            Err(self.error(format!("expected {}", what)))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), MapError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", keyword)))
        }
    }

    fn expect_ident(&mut self) -> Result<String, MapError> {
        match self.peek() {
            Some(Token::Ident(word)) => {
                let word = word.clone();
                self.pos += 1;
                Ok(word)
            }
            _ => Err(self.error("expected an identifier")),
        }
    }

    fn error(&self, message: impl Into<String>) -> MapError {
        let offset = self
            .tokens
            .get(self.pos)
            .map_or(self.end, |s| s.offset);
        MapError::new(message, offset)
    }
}

fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

/// Integral literals stay integers so emitted keys round-trip cleanly
pub(crate) fn number(n: f64) -> JsonValue {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        JsonValue::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number)
    }
}
