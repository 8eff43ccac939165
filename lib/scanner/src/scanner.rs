use cursor::{Cursor, Line};
use errors::LoxError;
use log::trace;

pub mod token;
pub use token::{format_number, Literal, Token, TokenType};
use token::TokenType::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanErrorType {
    #[error("Unexpected character: {0}")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Number literal is too large.")]
    NumberTooLarge,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{error} (line {line})")]
pub struct ScanError {
    pub error: ScanErrorType,
    pub line: Line,
}

impl From<ScanError> for LoxError {
    fn from(e: ScanError) -> Self {
        LoxError::new(e.line, e.error)
    }
}

/// Scans the whole source eagerly. Errors don't stop the scan, so the returned tokens are
/// always terminated by a single `EOF` token even if errors were reported.
pub fn scan(source: &str) -> (Vec<Token<'_>>, Vec<ScanError>) {
    Scanner::new(source).scan_tokens()
}

pub struct Scanner<'a> {
    start: Cursor<'a>,
    current: Cursor<'a>,
    tokens: Vec<Token<'a>>,
    errors: Vec<ScanError>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            start: Cursor::new(source),
            current: Cursor::new(source),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn scan_tokens(mut self) -> (Vec<Token<'a>>, Vec<ScanError>) {
        loop {
            self.start = self.current.clone();
            let Some(c) = self.current.next() else {
                break;
            };

            match c {
                '(' => self.add_token(LeftParen),
                ')' => self.add_token(RightParen),
                '{' => self.add_token(LeftBrace),
                '}' => self.add_token(RightBrace),
                ',' => self.add_token(Comma),
                '.' => self.add_token(Dot),
                '-' => self.add_token(Minus),
                '+' => self.add_token(Plus),
                ';' => self.add_token(Semicolon),
                '*' => self.add_token(Star),

                '!' => self.add_token_if_matches('=', BangEqual, Bang),
                '=' => self.add_token_if_matches('=', EqualEqual, Equal),
                '<' => self.add_token_if_matches('=', LessEqual, Less),
                '>' => self.add_token_if_matches('=', GreaterEqual, Greater),

                '/' => {
                    if self.current.consume_if('/') {
                        // Comment, the newline itself is handled by the next iteration
                        self.current.consume_while(|c| c != '\n');
                    } else {
                        self.add_token(Slash)
                    }
                }

                '"' => self.string(),

                d if d.is_ascii_digit() => self.number(),

                c if is_alpha(c) => self.identifier(),

                ' ' | '\r' | '\t' | '\n' => (),

                c => self.error(ScanErrorType::UnexpectedCharacter(c)),
            }
        }

        self.tokens.push(Token::eof(self.current.line()));
        trace!("Scanned {} tokens, {} errors", self.tokens.len(), self.errors.len());

        (self.tokens, self.errors)
    }

    fn lexeme(&self) -> &'a str {
        self.start.slice_until(&self.current)
    }

    fn add_token(&mut self, kind: TokenType) {
        self.push(Token::new(kind, self.lexeme(), None, self.current.line()));
    }

    fn add_literal(&mut self, kind: TokenType, literal: Literal<'a>) {
        self.push(Token::new(kind, self.lexeme(), Some(literal), self.current.line()));
    }

    fn add_token_if_matches(&mut self, expected: char, matched: TokenType, otherwise: TokenType) {
        if self.current.consume_if(expected) {
            self.add_token(matched)
        } else {
            self.add_token(otherwise)
        }
    }

    fn push(&mut self, token: Token<'a>) {
        trace!("Scanned token: {}", token);
        self.tokens.push(token);
    }

    fn error(&mut self, error: ScanErrorType) {
        let error = ScanError { error, line: self.current.line() };
        trace!("Scan error: {}", error);
        self.errors.push(error);
    }

    fn string(&mut self) {
        self.current.consume_while(|c| c != '"');

        if !self.current.consume_if('"') {
            self.error(ScanErrorType::UnterminatedString);
            return;
        }

        let lexeme = self.lexeme();
        self.add_literal(Str, Literal::Str(&lexeme[1..lexeme.len() - 1]));
    }

    fn number(&mut self) {
        self.current.consume_while(|c| c.is_ascii_digit());

        // A trailing '.' is not part of the number
        if self.current.peek() == Some('.')
            && self.current.peek_next().map_or(false, |c| c.is_ascii_digit())
        {
            self.current.next();
            self.current.consume_while(|c| c.is_ascii_digit());
        }

        let value: f64 = self
            .lexeme()
            .parse()
            .unwrap_or_else(|e| unreachable!("Digits should always parse as f64: {e}"));

        // Digit strings past f64::MAX round to infinity, which has no literal form
        if value.is_infinite() {
            self.error(ScanErrorType::NumberTooLarge);
            return;
        }
        self.add_literal(Number, Literal::Number(value));
    }

    fn identifier(&mut self) {
        self.current.consume_while(|c| is_alpha(c) || c.is_ascii_digit());
        self.add_token(TokenType::keyword(self.lexeme()).unwrap_or(Identifier));
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
