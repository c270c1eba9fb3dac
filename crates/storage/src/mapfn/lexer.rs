//! Tokenizer for map function source

use super::MapError;

/// A lexical token with its byte offset
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Ident(String),
    Str(String),
    Number(f64),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Dot,
    Comma,
    Semi,
    Bang,
    Minus,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
}

/// Split `src` into tokens
pub(crate) fn tokenize(src: &str) -> Result<Vec<Spanned>, MapError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];

        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        // Line comments
        if c == b'/' && bytes.get(pos + 1) == Some(&b'/') {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
            continue;
        }

        let start = pos;
        let token = match c {
            b'(' => single(&mut pos, Token::LParen),
            b')' => single(&mut pos, Token::RParen),
            b'{' => single(&mut pos, Token::LBrace),
            b'}' => single(&mut pos, Token::RBrace),
            b'[' => single(&mut pos, Token::LBracket),
            b']' => single(&mut pos, Token::RBracket),
            b'.' if !next_is_digit(bytes, pos) => single(&mut pos, Token::Dot),
            b',' => single(&mut pos, Token::Comma),
            b';' => single(&mut pos, Token::Semi),
            b'-' => single(&mut pos, Token::Minus),
            b'=' => {
                // `==` and `===` compare the same way here
                if bytes.get(pos + 1) != Some(&b'=') {
                    return Err(MapError::new("assignment is not supported", pos));
                }
                pos += 2;
                if bytes.get(pos) == Some(&b'=') {
                    pos += 1;
                }
                Token::EqEq
            }
            b'!' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    pos += 2;
                    if bytes.get(pos) == Some(&b'=') {
                        pos += 1;
                    }
                    Token::NotEq
                } else {
                    single(&mut pos, Token::Bang)
                }
            }
            b'<' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    pos += 2;
                    Token::Le
                } else {
                    single(&mut pos, Token::Lt)
                }
            }
            b'>' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    pos += 2;
                    Token::Ge
                } else {
                    single(&mut pos, Token::Gt)
                }
            }
            b'&' if bytes.get(pos + 1) == Some(&b'&') => {
                pos += 2;
                Token::AndAnd
            }
            b'|' if bytes.get(pos + 1) == Some(&b'|') => {
                pos += 2;
                Token::OrOr
            }
            b'"' | b'\'' => lex_string(src, &mut pos)?,
            b'0'..=b'9' | b'.' => lex_number(src, &mut pos)?,
            c if is_ident_byte(c) && !c.is_ascii_digit() => {
                while pos < bytes.len() && is_ident_byte(bytes[pos]) {
                    pos += 1;
                }
                Token::Ident(src[start..pos].to_string())
            }
            _ => {
                let ch = src[pos..].chars().next().unwrap_or('?');
                return Err(MapError::new(format!("unexpected character '{}'", ch), pos));
            }
        };

        tokens.push(Spanned {
            token,
            offset: start,
        });
    }

    Ok(tokens)
}

fn single(pos: &mut usize, token: Token) -> Token {
    *pos += 1;
    token
}

fn next_is_digit(bytes: &[u8], pos: usize) -> bool {
    bytes.get(pos + 1).map_or(false, |b| b.is_ascii_digit())
}

fn lex_string(src: &str, pos: &mut usize) -> Result<Token, MapError> {
    let start = *pos;
    let mut chars = src[start..].char_indices();
    let (_, quote) = chars
        .next()
        .ok_or_else(|| MapError::new("unterminated string", start))?;
    let mut out = String::new();

    while let Some((i, ch)) = chars.next() {
        if ch == quote {
            *pos = start + i + ch.len_utf8();
            return Ok(Token::Str(out));
        }
        if ch == '\\' {
            let (_, escaped) = chars
                .next()
                .ok_or_else(|| MapError::new("unterminated string", start))?;
            out.push(match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                '0' => '\0',
                other => other,
            });
        } else {
            out.push(ch);
        }
    }

    Err(MapError::new("unterminated string", start))
}

fn lex_number(src: &str, pos: &mut usize) -> Result<Token, MapError> {
    let bytes = src.as_bytes();
    let start = *pos;
    while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
        *pos += 1;
    }
    if *pos < bytes.len() && bytes[*pos] == b'.' {
        *pos += 1;
        while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
            *pos += 1;
        }
    }
    if *pos < bytes.len() && (bytes[*pos] == b'e' || bytes[*pos] == b'E') {
        *pos += 1;
        if *pos < bytes.len() && (bytes[*pos] == b'+' || bytes[*pos] == b'-') {
            *pos += 1;
        }
        while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
            *pos += 1;
        }
    }
    src[start..*pos]
        .parse::<f64>()
        .map(Token::Number)
        .map_err(|_| MapError::new(format!("invalid number '{}'", &src[start..*pos]), start))
}

fn is_ident_byte(b: u8) -> bool {
    b == b'_' || b == b'$' || b.is_ascii_alphanumeric()
}
