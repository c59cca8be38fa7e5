use std::fmt;

/// Reserved words of the expression language.
/// ***Only `true` and `false` are accepted by the compiler; the rest exist so they can be rejected by name***
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Keyword {
    True,
    False,
    And,
    Or,
    Not,
}

/// Operators and delimiters
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Punct {
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    At,
    Tilde,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Assign,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Semicolon,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Token<'a> {
    /// Raw digits of an integer literal, `_` separators included
    Number(&'a str),
    Float(&'a str),
    /// String literal without its quotes
    StringLiteral(&'a str),
    Keyword(Keyword),
    Name(&'a str),
    Punct(Punct),
    Newline,
}

/// A token and the byte offset it starts at
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Spanned<'a> {
    pub token: Token<'a>,
    pub offset: usize,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::And => "and",
            Keyword::Or => "or",
            Keyword::Not => "not",
        }
    }
}

impl Punct {
    pub fn as_str(&self) -> &'static str {
        match self {
            Punct::Plus => "+",
            Punct::Minus => "-",
            Punct::Star => "*",
            Punct::DoubleStar => "**",
            Punct::Slash => "/",
            Punct::DoubleSlash => "//",
            Punct::Percent => "%",
            Punct::At => "@",
            Punct::Tilde => "~",
            Punct::Amp => "&",
            Punct::Pipe => "|",
            Punct::Caret => "^",
            Punct::Shl => "<<",
            Punct::Shr => ">>",
            Punct::Eq => "==",
            Punct::Ne => "!=",
            Punct::Lt => "<",
            Punct::Le => "<=",
            Punct::Gt => ">",
            Punct::Ge => ">=",
            Punct::Assign => "=",
            Punct::LParen => "(",
            Punct::RParen => ")",
            Punct::LBracket => "[",
            Punct::RBracket => "]",
            Punct::Comma => ",",
            Punct::Dot => ".",
            Punct::Semicolon => ";",
        }
    }
}

impl<'a> Token<'a> {
    /// Classify a word read by the lexer
    pub fn new(word: &'a str) -> Self {
        match word {
            "true" => Token::Keyword(Keyword::True),
            "false" => Token::Keyword(Keyword::False),
            "and" => Token::Keyword(Keyword::And),
            "or" => Token::Keyword(Keyword::Or),
            "not" => Token::Keyword(Keyword::Not),
            _ => Token::Name(word),
        }
    }
}

/// Renders the token the way it appears in source, for error messages.
impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(raw) | Token::Float(raw) | Token::Name(raw) => write!(f, "`{}`", raw),
            Token::StringLiteral(_) => f.write_str("string literal"),
            Token::Keyword(keyword) => write!(f, "`{}`", keyword.as_str()),
            Token::Punct(punct) => write!(f, "`{}`", punct.as_str()),
            Token::Newline => f.write_str("newline"),
        }
    }
}
