mod expr;
mod printer;

use cursor::Line;
use errors::LoxError;
use log::trace;
use scanner::{Literal, Token, TokenType};

pub use expr::{Expr, LiteralValue};
pub use printer::AstPrinter;

use scanner::TokenType::*;

/// How deep parentheses and unary operators may be nested inside each other. Each level costs
/// a handful of stack frames while parsing.
pub const MAX_NESTING: usize = 128;

/// Height limit for a whole expression tree, long chains of binary operators included.
/// Printing and dropping a tree both recurse once per level.
pub const MAX_HEIGHT: usize = 512;

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{error} (line {line})")]
pub struct ParseError {
    pub error: ParseErrorType,
    pub line: Line,
}

impl ParseError {
    fn new(error: ParseErrorType, token: &Token) -> Self {
        Self { error, line: token.line }
    }
}

impl From<ParseError> for LoxError {
    fn from(e: ParseError) -> Self {
        LoxError::new(e.line, e.error)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    #[error("Expect expression.")]
    ExpectedExpression,
    #[error("Expect ')' after expression.")]
    ExpectedRightParen,
    #[error("Expression is nested too deeply.")]
    TooDeeplyNested,
}

/// Stands in for the `Eof` token when the token slice doesn't end with one.
static MISSING_EOF: Token<'static> =
    Token { kind: Eof, lexeme: "", literal: None, line: Line(1) };

/// An expression along with the height of its tree. Leaves have height 0.
struct Node<'a> {
    expr: Expr<'a>,
    height: usize,
}

impl<'a> Node<'a> {
    fn leaf(expr: Expr<'a>) -> Self {
        Self { expr, height: 0 }
    }
}

/// Recursive descent parser over a token sequence as produced by the scanner. The tokens are
/// only ever read. A sequence that is empty or lacks the final `Eof` is treated as if it
/// ended with one.
#[derive(Debug)]
pub struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    current: usize,
    nesting: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        Self { tokens, current: 0, nesting: 0 }
    }

    /// Parses a single expression starting at the current token. Tokens following a complete
    /// expression are left untouched.
    pub fn parse(&mut self) -> Result<Expr<'a>> {
        let expr = self.expression().map(|node| node.expr);
        match &expr {
            Ok(expr) => log::debug!("Parsed expression: {}", expr),
            Err(e) => log::debug!("Parse failed: {}", e),
        }
        expr
    }

    fn expression(&mut self) -> Result<Node<'a>> {
        self.equality()
    }

    fn equality(&mut self) -> Result<Node<'a>> {
        let mut expr = self.comparison()?;

        while let Some(operator) = self.consume_any(&[BangEqual, EqualEqual]) {
            let right = self.comparison()?;
            expr = self.fold(expr, operator, right)?;
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Node<'a>> {
        let mut expr = self.term()?;

        while let Some(operator) = self.consume_any(&[Greater, GreaterEqual, Less, LessEqual]) {
            let right = self.term()?;
            expr = self.fold(expr, operator, right)?;
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Node<'a>> {
        let mut expr = self.factor()?;

        while let Some(operator) = self.consume_any(&[Minus, Plus]) {
            let right = self.factor()?;
            expr = self.fold(expr, operator, right)?;
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Node<'a>> {
        let mut expr = self.unary()?;

        while let Some(operator) = self.consume_any(&[Slash, Star]) {
            let right = self.unary()?;
            expr = self.fold(expr, operator, right)?;
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Node<'a>> {
        if let Some(operator) = self.consume_any(&[Bang, Minus]) {
            let right = self.nested(&operator, Self::unary)?;
            let height = self.check_height(right.height + 1, &operator)?;
            return Ok(Node { expr: Expr::unary(operator, right.expr), height });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Node<'a>> {
        let token = self.peek();
        trace!("Parsing primary expression: {}", token);

        let literal = match (token.kind, &token.literal) {
            (False, _) => LiteralValue::Boolean(false),
            (True, _) => LiteralValue::Boolean(true),
            (Nil, _) => LiteralValue::Nil,
            (Number, Some(Literal::Number(n))) => LiteralValue::Number(*n),
            (Str, Some(Literal::Str(s))) => LiteralValue::Str(*s),
            (LeftParen, _) => {
                let paren = self.advance();
                let inner = self.nested(paren, Self::expression)?;
                self.consume_or_error(RightParen, ParseErrorType::ExpectedRightParen)?;
                let height = self.check_height(inner.height + 1, paren)?;
                return Ok(Node { expr: Expr::grouping(inner.expr), height });
            }
            _ => return Err(self.error_at_current(ParseErrorType::ExpectedExpression)),
        };

        self.advance();
        Ok(Node::leaf(Expr::Literal(literal)))
    }

    fn fold(&self, left: Node<'a>, operator: Token<'a>, right: Node<'a>) -> Result<Node<'a>> {
        trace!("Folding binary expression for {}", operator.lexeme);
        let height = self.check_height(left.height.max(right.height) + 1, &operator)?;
        Ok(Node { expr: Expr::binary(left.expr, operator, right.expr), height })
    }

    /// Discards tokens until the start of what is probably the next statement: just past a
    /// `;`, or in front of a keyword that begins a statement (or at `Eof`).
    ///
    /// Only useful once statements can follow each other, `parse` never calls this.
    pub fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == Semicolon {
                return;
            }

            if self.peek().kind.starts_statement() {
                return;
            }

            trace!("Syncing... skipping {}", self.peek());
            self.advance();
        }
    }
}

// Helpers
impl<'t, 'a> Parser<'t, 'a> {
    fn consume_any(&mut self, kinds: &[TokenType]) -> Option<Token<'a>> {
        if kinds.contains(&self.peek().kind) {
            Some(self.advance().clone())
        } else {
            None
        }
    }

    fn consume_or_error(&mut self, kind: TokenType, error: ParseErrorType) -> Result<Token<'a>> {
        match self.consume_any(&[kind]) {
            Some(token) => Ok(token),
            None => Err(self.error_at_current(error)),
        }
    }

    /// Runs `rule` one nesting level deeper, failing at `token` once [`MAX_NESTING`] is reached.
    fn nested<T>(&mut self, token: &Token, rule: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.nesting >= MAX_NESTING {
            return Err(ParseError::new(ParseErrorType::TooDeeplyNested, token));
        }

        self.nesting += 1;
        let result = rule(self);
        self.nesting -= 1;
        result
    }

    fn check_height(&self, height: usize, token: &Token) -> Result<usize> {
        if height > MAX_HEIGHT {
            return Err(ParseError::new(ParseErrorType::TooDeeplyNested, token));
        }
        Ok(height)
    }

    fn error_at_current(&self, error: ParseErrorType) -> ParseError {
        // Past the end of a slice without `Eof`, the last real token has the better line
        let token = self.tokens.get(self.current).or_else(|| self.tokens.last()).unwrap_or(&MISSING_EOF);
        ParseError::new(error, token)
    }

    fn peek(&self) -> &'t Token<'a> {
        self.tokens.get(self.current).unwrap_or(&MISSING_EOF)
    }

    fn previous(&self) -> &'t Token<'a> {
        self.tokens.get(self.current.saturating_sub(1)).unwrap_or(&MISSING_EOF)
    }

    /// Never moves past `Eof`.
    fn advance(&mut self) -> &'t Token<'a> {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().kind == Eof
    }
}
