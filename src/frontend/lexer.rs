use super::cursor::Cursor;
use super::errors::{LexerError, LexerResult};
use super::span::Span;
use super::token::{SpannedToken, Token, TokenKind};

pub struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
    seen_eof: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer from source.
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            cursor: Cursor::new(source),
            seen_eof: false,
        }
    }

    /// Returns the next token, or None once EndOfFile has been produced.
    pub fn next_token(&mut self) -> Option<LexerResult<SpannedToken>> {
        // Get rid of whitespace.
        self.cursor.take_while(|ch| ch.is_ascii_whitespace());

        let start_pos = self.cursor.get_position();

        let (byte_idx, ch) = match self.cursor.take() {
            Some(t) => t,
            None => {
                if self.seen_eof {
                    return None;
                }
                self.seen_eof = true;
                let span = Span::new(start_pos, start_pos);
                let token = Token::new("EndOfFile", TokenKind::EndOfFile);
                return Some(Ok(SpannedToken::new(token, span)));
            }
        };

        let token = match ch {
            // Single-character punctuation.
            '(' => Token::new("(", TokenKind::OpenParen),
            ')' => Token::new(")", TokenKind::CloseParen),
            '{' => Token::new("{", TokenKind::OpenBrace),
            '}' => Token::new("}", TokenKind::CloseBrace),
            '[' => Token::new("[", TokenKind::OpenBracket),
            ']' => Token::new("]", TokenKind::CloseBracket),
            ';' => Token::new(";", TokenKind::Semicolon),
            ':' => Token::new(":", TokenKind::Colon),
            ',' => Token::new(",", TokenKind::Comma),
            '.' => Token::new(".", TokenKind::Dot),
            '"' => Token::new("\"", TokenKind::DoubleQuote),

            // Operators, extended greedily by one character.
            '*' => Token::new("*", TokenKind::BinaryOperator),
            '/' => Token::new("/", TokenKind::BinaryOperator),
            '%' => Token::new("%", TokenKind::BinaryOperator),
            '+' => self.one_or_two_char('+', "++", "+"),
            '-' => self.one_or_two_char('-', "--", "-"),
            '<' => self.one_or_two_char('=', "<=", "<"),
            '>' => self.one_or_two_char('=', ">=", ">"),

            // `=` is assignment unless it forms `==`.
            '=' => {
                if self.cursor.take_if('=') {
                    Token::new("==", TokenKind::BinaryOperator)
                } else {
                    Token::new("=", TokenKind::Equals)
                }
            }

            // Numbers: unsigned integer digit runs only.
            _ if ch.is_ascii_digit() => self.lex_number(byte_idx),

            // Identifiers and keywords: alphabetic runs only.
            _ if ch.is_alphabetic() => self.lex_identifier_or_kw(byte_idx),

            _ => {
                return Some(Err(LexerError {
                    position: start_pos,
                    character: ch,
                }))
            }
        };

        let end_pos = self.cursor.get_position();
        let span = Span::new(start_pos, end_pos);
        Some(Ok(SpannedToken::new(token, span)))
    }

    /// Checks if the next char equals `second`. If so, consume it and
    /// emit the two-character operator, else the one-character operator.
    fn one_or_two_char(&mut self, second: char, long: &str, short: &str) -> Token {
        if self.cursor.take_if(second) {
            Token::new(long, TokenKind::BinaryOperator)
        } else {
            Token::new(short, TokenKind::BinaryOperator)
        }
    }

    fn lex_number(&mut self, start_idx: usize) -> Token {
        self.cursor.take_while(|ch| ch.is_ascii_digit());
        Token::new(self.run_slice(start_idx), TokenKind::Number)
    }

    /// Scans to the end of the alphabetic run and checks for keywords.
    fn lex_identifier_or_kw(&mut self, start_idx: usize) -> Token {
        self.cursor.take_while(|ch| ch.is_alphabetic());

        let slice = self.run_slice(start_idx);
        let kind = match slice {
            "let" => TokenKind::Let,
            "const" => TokenKind::Const,
            "fn" => TokenKind::Fn,
            "for" => TokenKind::For,
            _ => TokenKind::Identifier,
        };

        Token::new(slice, kind)
    }

    fn run_slice(&mut self, start_idx: usize) -> &'src str {
        let end_idx = match self.cursor.peek() {
            None => self.source.len(),
            Some((i, _)) => i,
        };
        &self.source[start_idx..end_idx]
    }
}

/// Runs the lexer over the whole source. The returned sequence always
/// ends with exactly one EndOfFile token.
pub fn tokenize(source: &str) -> LexerResult<Vec<SpannedToken>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = vec![];

    while let Some(token) = lexer.next_token() {
        tokens.push(token?);
    }

    Ok(tokens)
}
