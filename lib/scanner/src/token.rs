use std::fmt::{self, Display, Formatter};

use cursor::Line;

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenType,
    pub lexeme: &'a str,
    pub literal: Option<Literal<'a>>,
    pub line: Line,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenType, lexeme: &'a str, literal: Option<Literal<'a>>, line: Line) -> Self {
        Self { kind, lexeme, literal, line }
    }

    pub fn eof(line: Line) -> Self {
        Self::new(TokenType::Eof, "", None, line)
    }
}

/// `<TYPE> <lexeme> <literal>`, with `null` standing in for a missing literal.
impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.literal {
            Some(literal) => write!(f, "{} {} {}", self.kind, self.lexeme, literal),
            None => write!(f, "{} {} null", self.kind, self.lexeme),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal<'a> {
    /// Raw contents between the quotes, escapes are not processed.
    Str(&'a str),
    Number(f64),
}

impl Display for Literal<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) => write!(f, "{s}"),
            Literal::Number(n) => write!(f, "{}", format_number(*n)),
        }
    }
}

/// Canonical rendering of a number literal: integral values always keep one fractional digit
/// (`1234` -> `1234.0`), everything else uses the shortest representation that round-trips.
/// The scanner never produces non-finite numbers, so neither `inf` nor `NaN` show up here.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{n:.1}")
    } else {
        n.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    #[strum(serialize = "STRING")]
    Str,
    Number,

    // Keywords.
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,
    Eof,
}

impl TokenType {
    pub fn keyword(text: &str) -> Option<TokenType> {
        use TokenType::*;
        Some(match text {
            "and" => And,
            "class" => Class,
            "else" => Else,
            "false" => False,
            "fun" => Fun,
            "for" => For,
            "if" => If,
            "nil" => Nil,
            "or" => Or,
            "print" => Print,
            "return" => Return,
            "super" => Super,
            "this" => This,
            "true" => True,
            "var" => Var,
            "while" => While,
            _ => return None,
        })
    }

    /// Tokens that can only appear at the start of a statement.
    pub fn starts_statement(self) -> bool {
        use TokenType::*;
        matches!(self, Class | Fun | Var | For | If | While | Print | Return)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn token_type_names() {
        assert_eq!(TokenType::LeftParen.to_string(), "LEFT_PAREN");
        assert_eq!(TokenType::BangEqual.to_string(), "BANG_EQUAL");
        assert_eq!(TokenType::GreaterEqual.to_string(), "GREATER_EQUAL");
        assert_eq!(TokenType::Str.to_string(), "STRING");
        assert_eq!(TokenType::Identifier.to_string(), "IDENTIFIER");
        assert_eq!(TokenType::While.to_string(), "WHILE");
        assert_eq!(TokenType::Eof.to_string(), "EOF");
    }

    #[test]
    fn numbers() {
        assert_eq!(format_number(1234.0), "1234.0");
        assert_eq!(format_number(0.0), "0.0");
        assert_eq!(format_number(2.25), "2.25");
        assert_eq!(format_number(200.5), "200.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");

        // Large values are written out in full, never in exponent form
        assert_eq!(format_number(1e21), "1000000000000000000000.0");
        let max = format_number(f64::MAX);
        assert!(max.starts_with("17976931348623157") && max.ends_with(".0"), "{max}");
    }

    #[test]
    fn display() {
        assert_eq!(Token::eof(Line(1)).to_string(), "EOF  null");
        assert_eq!(
            Token::new(TokenType::Number, "42", Some(Literal::Number(42.0)), Line(1)).to_string(),
            "NUMBER 42 42.0"
        );
        assert_eq!(
            Token::new(TokenType::Str, "\"hi\"", Some(Literal::Str("hi")), Line(1)).to_string(),
            "STRING \"hi\" hi"
        );
        assert_eq!(
            Token::new(TokenType::Identifier, "foo", None, Line(1)).to_string(),
            "IDENTIFIER foo null"
        );
    }

    #[test]
    fn keywords() {
        assert_eq!(TokenType::keyword("while"), Some(TokenType::While));
        assert_eq!(TokenType::keyword("nil"), Some(TokenType::Nil));
        assert_eq!(TokenType::keyword("While"), None);
        assert_eq!(TokenType::keyword("whiles"), None);
        assert!(TokenType::Return.starts_statement());
        assert!(!TokenType::Semicolon.starts_statement());
    }
}
