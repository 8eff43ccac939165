use std::fmt::{self, Display, Formatter};

use scanner::{format_number, Token};

use crate::AstPrinter;

/// An expression tree. Every node exclusively owns its children, and the tree is never
/// modified once the parser returns it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    Binary { left: Box<Expr<'a>>, operator: Token<'a>, right: Box<Expr<'a>> },
    Grouping(Box<Expr<'a>>),
    Unary { operator: Token<'a>, right: Box<Expr<'a>> },
    Literal(LiteralValue<'a>),
}

impl<'a> Expr<'a> {
    pub fn binary(left: Expr<'a>, operator: Token<'a>, right: Expr<'a>) -> Self {
        Expr::Binary { left: Box::new(left), operator, right: Box::new(right) }
    }

    pub fn unary(operator: Token<'a>, right: Expr<'a>) -> Self {
        Expr::Unary { operator, right: Box::new(right) }
    }

    pub fn grouping(expression: Expr<'a>) -> Self {
        Expr::Grouping(Box::new(expression))
    }
}

impl Display for Expr<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", AstPrinter.print(self))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue<'a> {
    Number(f64),
    Str(&'a str),
    Boolean(bool),
    Nil,
}

impl Display for LiteralValue<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Number(n) => write!(f, "{}", format_number(*n)),
            LiteralValue::Str(s) => write!(f, "{s}"),
            LiteralValue::Boolean(b) => write!(f, "{b}"),
            LiteralValue::Nil => write!(f, "nil"),
        }
    }
}
