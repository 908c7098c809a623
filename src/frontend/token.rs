use super::span::Span;

/// Closed set of token categories. String literals have no kind of their
/// own: each `"` lexes to a DoubleQuote token and the parser reassembles
/// the raw token values found between a pair of them.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    // Literals.
    Number,
    Identifier,

    // Punctuation.
    Equals,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Semicolon,
    Colon,
    Comma,
    Dot,
    DoubleQuote,

    // `* - + / % > < <= >= ++ -- ==`, distinguished by value.
    BinaryOperator,

    // Keywords.
    Let,
    Const,
    Fn,
    For,

    EndOfFile,
}

/// A token carries its raw source text alongside its kind. The parser
/// leans on the text both for operator dispatch and for string
/// reassembly between DoubleQuote tokens.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub value: String,
    pub kind: TokenKind,
}

#[derive(Debug, PartialEq, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

impl Token {
    pub fn new(value: impl Into<String>, kind: TokenKind) -> Self {
        Token {
            value: value.into(),
            kind,
        }
    }
}

impl SpannedToken {
    pub fn new(token: Token, span: Span) -> Self {
        SpannedToken { token, span }
    }
}
