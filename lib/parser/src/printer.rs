use itertools::Itertools;

use crate::Expr;

/// Renders an expression tree as canonical, fully parenthesized text, e.g.
/// `1 + 2 * 3` becomes `(+ 1.0 (* 2.0 3.0))`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&self, expr: &Expr) -> String {
        match expr {
            Expr::Binary { left, operator, right } => {
                self.parenthesize(operator.lexeme, &[&**left, &**right])
            }
            Expr::Grouping(expression) => self.parenthesize("group", &[&**expression]),
            Expr::Unary { operator, right } => self.parenthesize(operator.lexeme, &[&**right]),
            Expr::Literal(value) => value.to_string(),
        }
    }

    fn parenthesize(&self, name: &str, exprs: &[&Expr]) -> String {
        format!("({} {})", name, exprs.iter().map(|e| self.print(e)).join(" "))
    }
}
