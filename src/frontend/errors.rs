use super::span::{CodePosition, Span};
use super::token::{Token, TokenKind};

use std::fmt;

/// An unrecognized character in the source text.
#[derive(Debug, PartialEq, Clone)]
pub struct LexerError {
    pub position: CodePosition,
    pub character: char,
}

pub type LexerResult<T> = Result<T, LexerError>;

#[derive(Debug, PartialEq, Clone)]
pub struct ParserError {
    pub span: Span,
    pub kind: ParserErrorKind,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ParserErrorKind {
    /// Lexical error surfaced through the parsing entry point.
    UnrecognizedCharacter(char),
    /// Expected a token of one kind, found something else.
    ExpectedToken(TokenKind, Token),
    /// Expected the start of an expression.
    ExpectedExpr(Token),
    /// Dot access and parameter lists require bare identifiers.
    ExpectedIdentifier,
    /// `const` declarations must carry an initializer.
    ConstWithoutValue(String),
}

pub type ParserResult<T> = Result<T, ParserError>;

impl fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Unrecognized character `{}` at {}.",
            self.character, self.position
        )
    }
}

impl ParserError {
    pub fn new(span: Span, kind: ParserErrorKind) -> Self {
        ParserError { span, kind }
    }
}

impl From<LexerError> for ParserError {
    fn from(e: LexerError) -> Self {
        ParserError {
            span: Span::new(e.position, e.position),
            kind: ParserErrorKind::UnrecognizedCharacter(e.character),
        }
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let line_no = self.span.start_pos.line_no;
        match &self.kind {
            ParserErrorKind::UnrecognizedCharacter(ch) => {
                write!(f, "Unrecognized character `{}` on line {}.", ch, line_no)
            }
            ParserErrorKind::ExpectedToken(expected, found) => {
                write!(
                    f,
                    "Expected {:?} on line {}, but instead got {:?} `{}`.",
                    expected, line_no, found.kind, found.value
                )
            }
            ParserErrorKind::ExpectedExpr(found) => {
                write!(
                    f,
                    "Expected expression on line {}, but instead got {:?} `{}`.",
                    line_no, found.kind, found.value
                )
            }
            ParserErrorKind::ExpectedIdentifier => {
                write!(f, "Expected identifier on line {}.", line_no)
            }
            ParserErrorKind::ConstWithoutValue(name) => {
                write!(
                    f,
                    "Constant `{}` declared without a value on line {}.",
                    name, line_no
                )
            }
        }
    }
}
