use super::token::{Punct, Spanned, Token};
use crate::error::{CompileError, Result};

pub struct Lexer<'a> {
    source: &'a str,
    cursor: usize,
}

type LResult<'a> = Result<Option<Spanned<'a>>>;

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer { source, cursor: 0 }
    }

    /// Get the next token. This consumes the tokens.
    pub fn next_token(&mut self) -> LResult<'a> {
        self.trim();

        let offset = self.cursor;
        let token = match self.next_char(false) {
            Some(b'\n') => Token::Newline,
            Some(b'+') => Token::Punct(Punct::Plus),
            Some(b'-') => Token::Punct(Punct::Minus),
            Some(b'*') => self.either(b'*', Punct::DoubleStar, Punct::Star),
            Some(b'/') => self.either(b'/', Punct::DoubleSlash, Punct::Slash),
            Some(b'%') => Token::Punct(Punct::Percent),
            Some(b'@') => Token::Punct(Punct::At),
            Some(b'~') => Token::Punct(Punct::Tilde),
            Some(b'&') => Token::Punct(Punct::Amp),
            Some(b'|') => Token::Punct(Punct::Pipe),
            Some(b'^') => Token::Punct(Punct::Caret),
            Some(b'=') => self.either(b'=', Punct::Eq, Punct::Assign),
            Some(b'!') if self.next_char(true) == Some(b'=') => {
                self.cursor += 1;
                Token::Punct(Punct::Ne)
            }
            Some(b'<') => match self.next_char(true) {
                Some(b'<') => self.punct_after(Punct::Shl),
                _ => self.either(b'=', Punct::Le, Punct::Lt),
            },
            Some(b'>') => match self.next_char(true) {
                Some(b'>') => self.punct_after(Punct::Shr),
                _ => self.either(b'=', Punct::Ge, Punct::Gt),
            },
            Some(b'(') => Token::Punct(Punct::LParen),
            Some(b')') => Token::Punct(Punct::RParen),
            Some(b'[') => Token::Punct(Punct::LBracket),
            Some(b']') => Token::Punct(Punct::RBracket),
            Some(b',') => Token::Punct(Punct::Comma),
            Some(b';') => Token::Punct(Punct::Semicolon),
            Some(quote @ (b'\'' | b'"')) => self.read_str_literal(quote)?,
            Some(b'.') if !self.next_char(true).is_some_and(|ch| ch.is_ascii_digit()) => {
                Token::Punct(Punct::Dot)
            }
            Some(ch) if ch.is_ascii_digit() || ch == b'.' => self.read_number()?,
            Some(ch) if ch.is_ascii_alphabetic() || ch == b'_' => self.read_word(),
            Some(_) => {
                let ch = self.source[offset..].chars().next().unwrap_or_default();
                return Err(CompileError::syntax(
                    format!("unexpected character `{}`", ch),
                    offset,
                ));
            }
            None => return Ok(None),
        };

        Ok(Some(Spanned { token, offset }))
    }

    /// Trim whitespaces, tabs, carriage returns, form feeds, `#` comments and
    /// `\` line continuations. Other newlines are tokens.
    fn trim(&mut self) {
        while let Some(ch) = self.next_char(true) {
            match ch {
                b'\t' | b'\r' | b'\x0C' | b' ' => self.cursor += 1,
                // Comment runs up to, not including, the newline
                b'#' => {
                    while self.next_char(true).is_some_and(|ch| ch != b'\n') {
                        self.cursor += 1;
                    }
                }
                b'\\' => {
                    let rest = &self.source.as_bytes()[self.cursor + 1..];
                    if rest.starts_with(b"\n") {
                        self.cursor += 2;
                    } else if rest.starts_with(b"\r\n") {
                        self.cursor += 3;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    /// `long` if the next char is `second`, `short` otherwise
    fn either(&mut self, second: u8, long: Punct, short: Punct) -> Token<'a> {
        if self.next_char(true) == Some(second) {
            self.punct_after(long)
        } else {
            Token::Punct(short)
        }
    }

    fn punct_after(&mut self, punct: Punct) -> Token<'a> {
        self.cursor += 1;
        Token::Punct(punct)
    }

    /// Read a numeric literal. Digits and `_` make an integer; a `.` or an
    /// exponent makes it a float. Anything else glued to it is an error.
    fn read_number(&mut self) -> Result<Token<'a>> {
        let start_pos = self.cursor - 1;
        let mut prev = self.source.as_bytes()[start_pos];
        while let Some(ch) = self.next_char(false) {
            let exponent_sign = (ch == b'+' || ch == b'-') && (prev == b'e' || prev == b'E');
            if !ch.is_ascii_alphanumeric() && ch != b'_' && ch != b'.' && !exponent_sign {
                self.cursor -= 1;
                break;
            }
            prev = ch;
        }

        let raw = &self.source[start_pos..self.cursor];
        if raw.bytes().all(|ch| ch.is_ascii_digit() || ch == b'_') {
            Ok(Token::Number(raw))
        } else if raw.replace('_', "").parse::<f64>().is_ok() {
            Ok(Token::Float(raw))
        } else {
            Err(CompileError::syntax(
                format!("invalid numeric literal `{}`", raw),
                start_pos,
            ))
        }
    }

    /// Read a string literal that starts and ends with `quote`
    fn read_str_literal(&mut self, quote: u8) -> Result<Token<'a>> {
        let start_pos = self.cursor;
        let mut escaped = false;
        while let Some(ch) = self.next_char(false) {
            if ch == b'\n' {
                // Strings cannot continue from next line
                break;
            } else if escaped {
                escaped = false;
            } else if ch == b'\\' {
                escaped = true;
            } else if ch == quote {
                return Ok(Token::StringLiteral(
                    &self.source[start_pos..self.cursor - 1],
                ));
            }
        }

        Err(CompileError::syntax(
            "unterminated string literal",
            start_pos - 1,
        ))
    }

    /// Read a name or keyword
    fn read_word(&mut self) -> Token<'a> {
        let start_pos = self.cursor - 1;
        while let Some(ch) = self.next_char(false) {
            // Only alphanumeric characters and '_'
            if !ch.is_ascii_alphanumeric() && ch != b'_' {
                self.cursor -= 1;
                break;
            }
        }

        Token::new(&self.source[start_pos..self.cursor])
    }

    /// Get the next char and increase the cursor if `peek` is false
    fn next_char(&mut self, peek: bool) -> Option<u8> {
        if let Some(ch) = self.source.as_bytes().get(self.cursor) {
            if !peek {
                self.cursor += 1;
            }
            Some(*ch)
        } else {
            None
        }
    }
}
