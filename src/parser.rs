//! Recursive-descent parser producing an [`Expr`] tree
//!
//! The precedence table follows the usual one for expression languages so
//! that constructs outside the accepted grammar are recognized as whole
//! nodes and can be rejected by name:
//!
//! | Level | Operators                    |
//! |-------|------------------------------|
//! | 1     | `or`                         |
//! | 2     | `and`                        |
//! | 3     | `not` (prefix)               |
//! | 4     | `==` `!=` `<` `<=` `>` `>=`  |
//! | 5     | `\|`                         |
//! | 6     | `^`                          |
//! | 7     | `&`                          |
//! | 8     | `<<` `>>`                    |
//! | 9     | `+` `-`                      |
//! | 10    | `*` `/` `//` `%` `@`         |
//! | 11    | `-` `+` `~` (prefix)         |
//! | 12    | `**` (right associative)     |
//! | 13    | calls, subscripts, attributes |

use crate::{
    ast::{Construct, Expr, ExprKind},
    error::{CompileError, Result},
    lexer::Lexer,
    token::{Keyword, Punct, Spanned, Token},
};

/// Default limit for expression nesting, see [`Parser::with_max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

const NOT_BP: u8 = 6;
const UNARY_BP: u8 = 22;

/// Parser for a single expression
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Option<Spanned<'a>>>,
    end: usize,
    depth: usize,
    max_depth: usize,
    // Open parentheses and brackets. Newlines inside them are insignificant.
    groups: usize,
}

/// Infix operators, all of them parsed, only `+` accepted.
#[derive(Debug, Clone, Copy)]
enum Infix {
    Add,
    Comparison(&'static str),
    BoolOp(&'static str),
    Binary(&'static str),
}

impl Infix {
    fn from_token(token: Token<'_>) -> Option<Self> {
        match token {
            Token::Keyword(Keyword::Or) => Some(Infix::BoolOp("or")),
            Token::Keyword(Keyword::And) => Some(Infix::BoolOp("and")),
            Token::Punct(Punct::Plus) => Some(Infix::Add),
            Token::Punct(
                punct @ (Punct::Eq | Punct::Ne | Punct::Lt | Punct::Le | Punct::Gt | Punct::Ge),
            ) => Some(Infix::Comparison(punct.as_str())),
            Token::Punct(
                punct @ (Punct::Minus
                | Punct::Star
                | Punct::DoubleStar
                | Punct::Slash
                | Punct::DoubleSlash
                | Punct::Percent
                | Punct::At
                | Punct::Amp
                | Punct::Pipe
                | Punct::Caret
                | Punct::Shl
                | Punct::Shr),
            ) => Some(Infix::Binary(punct.as_str())),
            _ => None,
        }
    }

    /// Left and right binding power. Left-associative operators bind
    /// tighter on the right.
    fn binding_power(self) -> (u8, u8) {
        match self {
            Infix::BoolOp("or") => (2, 3),
            Infix::BoolOp(_) => (4, 5),
            Infix::Comparison(_) => (8, 9),
            Infix::Binary("|") => (10, 11),
            Infix::Binary("^") => (12, 13),
            Infix::Binary("&") => (14, 15),
            Infix::Binary("<<" | ">>") => (16, 17),
            Infix::Add | Infix::Binary("-") => (18, 19),
            Infix::Binary("**") => (24, 23),
            Infix::Binary(_) => (20, 21),
        }
    }

    fn combine(self, lhs: Expr, rhs: Expr, offset: usize) -> Expr {
        let kind = match self {
            Infix::Add => ExprKind::Add(Box::new(lhs), Box::new(rhs)),
            Infix::Comparison(op) => ExprKind::Unsupported(Construct::Comparison(op)),
            Infix::BoolOp(op) => ExprKind::Unsupported(Construct::BoolOp(op)),
            Infix::Binary(op) => ExprKind::Unsupported(Construct::BinaryOp(op)),
        };
        Expr::new(kind, offset)
    }
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(source),
            peeked: None,
            end: source.len(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            groups: 0,
        }
    }

    /// Limit the nesting of the parsed tree. Deeper input is rejected with a
    /// syntax error instead of exhausting the stack.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse the whole source as exactly one expression
    pub fn parse(mut self) -> Result<Expr> {
        self.skip_newlines()?;
        let first = self.parse_expr(0)?;

        // A bare `1, 2` is a tuple
        let expr = if self.eat(Punct::Comma)? {
            while !self.at_statement_end()? {
                self.parse_expr(0)?;
                if !self.eat(Punct::Comma)? {
                    break;
                }
            }
            Expr::new(ExprKind::Unsupported(Construct::Tuple), first.offset)
        } else {
            first
        };

        let after_newline = self.skip_newlines()?;
        match self.next()? {
            None => Ok(expr),
            Some(Spanned {
                token: Token::Punct(Punct::Assign),
                offset,
            }) => Err(CompileError::syntax("assignments are not supported", offset)),
            Some(Spanned {
                token: Token::Punct(Punct::Semicolon),
                offset,
            }) => Err(CompileError::syntax(
                "multiple statements are not supported",
                offset,
            )),
            Some(Spanned { offset, .. }) if after_newline => Err(CompileError::syntax(
                "multiple statements are not supported",
                offset,
            )),
            next => Err(self.unexpected(next)),
        }
    }

    fn parse_expr(&mut self, min_bp: u8) -> Result<Expr> {
        let entry_depth = self.depth;
        let offset = self.peek_offset()?;
        self.enter(offset)?;

        let mut lhs = self.parse_prefix()?;
        while let Some((infix, offset)) = self.peek_infix()? {
            let (l_bp, r_bp) = infix.binding_power();
            if l_bp < min_bp {
                break;
            }
            self.next()?;
            // Left-leaning chains are walked iteratively downstream, only
            // real nesting counts toward the limit
            let rhs = self.parse_expr(r_bp)?;
            lhs = infix.combine(lhs, rhs, offset);
        }

        self.depth = entry_depth;
        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr> {
        let Some(Spanned { token, offset }) = self.peek()? else {
            return self.parse_postfix();
        };

        let kind = match token {
            Token::Punct(Punct::Minus) => {
                self.next()?;
                let operand = self.parse_expr(UNARY_BP)?;
                ExprKind::Negate(Box::new(operand))
            }
            Token::Punct(punct @ (Punct::Plus | Punct::Tilde)) => {
                self.next()?;
                self.parse_expr(UNARY_BP)?;
                ExprKind::Unsupported(Construct::UnaryOp(punct.as_str()))
            }
            Token::Keyword(Keyword::Not) => {
                self.next()?;
                self.parse_expr(NOT_BP)?;
                ExprKind::Unsupported(Construct::BoolOp("not"))
            }
            _ => return self.parse_postfix(),
        };

        Ok(Expr::new(kind, offset))
    }

    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_atom()?;

        while let Some(Spanned {
            token: Token::Punct(punct),
            offset,
        }) = self.peek()?
        {
            let construct = match punct {
                Punct::LParen => {
                    self.next()?;
                    self.parse_delimited(Punct::RParen)?;
                    Construct::Call
                }
                Punct::LBracket => {
                    self.next()?;
                    self.parse_delimited(Punct::RBracket)?;
                    Construct::Subscript
                }
                Punct::Dot => {
                    self.next()?;
                    match self.next()? {
                        Some(Spanned {
                            token: Token::Name(attr),
                            ..
                        }) => Construct::Attribute(attr.to_string()),
                        next => return Err(self.unexpected(next)),
                    }
                }
                _ => break,
            };
            expr = Expr::new(ExprKind::Unsupported(construct), offset);
        }

        Ok(expr)
    }

    fn parse_atom(&mut self) -> Result<Expr> {
        let spanned = self.next()?;
        let Some(Spanned { token, offset }) = spanned else {
            return Err(self.unexpected(None));
        };

        let kind = match token {
            Token::Number(raw) => ExprKind::IntLiteral(parse_int(raw, offset)?),
            Token::Keyword(Keyword::True) => ExprKind::BoolLiteral(true),
            Token::Keyword(Keyword::False) => ExprKind::BoolLiteral(false),
            Token::Float(raw) => ExprKind::Unsupported(Construct::FloatLiteral(raw.to_string())),
            Token::StringLiteral(_) => ExprKind::Unsupported(Construct::StringLiteral),
            Token::Name(name) => ExprKind::Unsupported(Construct::Name(name.to_string())),
            Token::Punct(Punct::LParen) => {
                let (mut items, trailing_comma) = self.parse_delimited(Punct::RParen)?;
                match items.pop() {
                    // Grouping only, no node of its own
                    Some(inner) if items.is_empty() && !trailing_comma => return Ok(inner),
                    _ => ExprKind::Unsupported(Construct::Tuple),
                }
            }
            Token::Punct(Punct::LBracket) => {
                self.parse_delimited(Punct::RBracket)?;
                ExprKind::Unsupported(Construct::List)
            }
            _ => return Err(self.unexpected(spanned)),
        };

        Ok(Expr::new(kind, offset))
    }

    /// Parse comma separated expressions up to and including `close`. The
    /// opening delimiter is already consumed.
    fn parse_delimited(&mut self, close: Punct) -> Result<(Vec<Expr>, bool)> {
        self.groups += 1;
        let mut items = Vec::new();
        let mut trailing_comma = false;

        loop {
            if self.eat(close)? {
                break;
            }
            items.push(self.parse_expr(0)?);
            trailing_comma = self.eat(Punct::Comma)?;
            if !trailing_comma {
                match self.next()? {
                    Some(Spanned {
                        token: Token::Punct(punct),
                        ..
                    }) if punct == close => break,
                    next => return Err(self.unexpected(next)),
                }
            }
        }

        self.groups -= 1;
        Ok((items, trailing_comma))
    }

    fn enter(&mut self, offset: usize) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            Err(CompileError::syntax("expression nested too deeply", offset))
        } else {
            Ok(())
        }
    }

    /// Consume the next token if it is `punct`
    fn eat(&mut self, punct: Punct) -> Result<bool> {
        match self.peek()? {
            Some(Spanned {
                token: Token::Punct(next),
                ..
            }) if next == punct => {
                self.peeked = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn at_statement_end(&mut self) -> Result<bool> {
        Ok(matches!(
            self.peek()?,
            None | Some(Spanned {
                token: Token::Newline | Token::Punct(Punct::Semicolon),
                ..
            })
        ))
    }

    /// Skip newlines between statements, reporting whether there were any
    fn skip_newlines(&mut self) -> Result<bool> {
        let mut skipped = false;
        while let Some(Spanned {
            token: Token::Newline,
            ..
        }) = self.peek()?
        {
            self.peeked = None;
            skipped = true;
        }
        Ok(skipped)
    }

    fn peek_infix(&mut self) -> Result<Option<(Infix, usize)>> {
        Ok(self.peek()?.and_then(|spanned| {
            Infix::from_token(spanned.token).map(|infix| (infix, spanned.offset))
        }))
    }

    fn peek_offset(&mut self) -> Result<usize> {
        Ok(self.peek()?.map_or(self.end, |spanned| spanned.offset))
    }

    fn peek(&mut self) -> Result<Option<Spanned<'a>>> {
        loop {
            let next = match self.peeked {
                Some(next) => next,
                None => self.lexer.next_token()?,
            };
            self.peeked = Some(next);
            match next {
                Some(Spanned {
                    token: Token::Newline,
                    ..
                }) if self.groups > 0 => self.peeked = None,
                _ => return Ok(next),
            }
        }
    }

    fn next(&mut self) -> Result<Option<Spanned<'a>>> {
        let next = self.peek()?;
        self.peeked = None;
        Ok(next)
    }

    fn unexpected(&self, found: Option<Spanned<'_>>) -> CompileError {
        match found {
            Some(Spanned { token, offset }) => {
                CompileError::syntax(format!("unexpected {}", token), offset)
            }
            None => CompileError::syntax("unexpected end of input", self.end),
        }
    }
}

/// Convert the raw digits of an integer literal
fn parse_int(raw: &str, offset: usize) -> Result<i64> {
    if raw.ends_with('_') || raw.contains("__") {
        return Err(CompileError::syntax(
            format!("invalid decimal literal `{}`", raw),
            offset,
        ));
    }

    let digits = raw.replace('_', "");
    if digits.starts_with('0') && digits.bytes().any(|digit| digit != b'0') {
        return Err(CompileError::syntax(
            format!("leading zeros are not permitted in `{}`", raw),
            offset,
        ));
    }

    digits.parse::<i64>().map_err(|_| {
        CompileError::syntax(format!("integer literal out of range: `{}`", raw), offset)
    })
}
