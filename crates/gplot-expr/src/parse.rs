//! Infix parser for expressions.
//!
//! Parses text like `x^2+2*x+1`, `a*sin(t)` or `max(x,-1)` using
//! precedence climbing.
//!
//! Operator precedence (highest to lowest):
//! - Function calls: `sin(x)`
//! - Power: `^` (right associative)
//! - Unary minus
//! - Multiplication/Division: `*`, `/`
//! - Addition/Subtraction: `+`, `-`

use std::iter::Peekable;
use std::str::CharIndices;

use gplot_core::EvalError;

use crate::ast::{BinOp, Expr, NEG_PRECEDENCE};

/// Token types for the infix parser.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprToken {
    Num(f64),
    Ident(String),
    Op(BinOp),
    LParen,
    RParen,
    Comma,
    End,
}

/// Whether `text` is a valid identifier: a letter or `_`, then letters,
/// digits or `_`.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Tokenize an infix expression string.
pub fn tokenize(input: &str) -> Result<Vec<ExprToken>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let end = scan_number(input, &mut chars);
                let text = &input[start..end];
                let value: f64 = text
                    .parse()
                    .map_err(|_| EvalError::Syntax(format!("invalid number '{}'", text)))?;
                tokens.push(ExprToken::Num(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(ExprToken::Ident(input[start..end].to_string()));
            }
            '+' | '-' | '*' | '/' | '^' => {
                chars.next();
                let op = match ch {
                    '+' => BinOp::Add,
                    '-' => BinOp::Sub,
                    '*' => BinOp::Mul,
                    '/' => BinOp::Div,
                    _ => BinOp::Pow,
                };
                tokens.push(ExprToken::Op(op));
            }
            '(' => {
                chars.next();
                tokens.push(ExprToken::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(ExprToken::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(ExprToken::Comma);
            }
            _ => {
                return Err(EvalError::Syntax(format!("unexpected character '{}'", ch)));
            }
        }
    }

    tokens.push(ExprToken::End);
    Ok(tokens)
}

/// Consume a number (digits, one dot, optional exponent) and return its end.
fn scan_number(input: &str, chars: &mut Peekable<CharIndices<'_>>) -> usize {
    let mut end = input.len();
    let mut has_dot = false;
    while let Some(&(i, c)) = chars.peek() {
        if c.is_ascii_digit() || (c == '.' && !has_dot) {
            has_dot |= c == '.';
            chars.next();
        } else {
            end = i;
            break;
        }
    }

    // Exponent only when digits follow, so `2e` stays a number and a name.
    let rest = &input[end..];
    let mut exp = rest.chars();
    if matches!(exp.next(), Some('e' | 'E')) {
        let mut len = 1;
        let mut next = exp.next();
        if let Some(sign @ ('+' | '-')) = next {
            len += sign.len_utf8();
            next = exp.next();
        }
        if next.is_some_and(|c| c.is_ascii_digit()) {
            let digits = rest[len..]
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len() - len);
            let stop = end + len + digits;
            while chars.peek().is_some_and(|&(i, _)| i < stop) {
                chars.next();
            }
            end = stop;
        }
    }
    end
}

/// Deepest expression tree the parser builds. Evaluation and drop both
/// recurse over the tree, so text cannot ask for more than this.
pub const MAX_NESTING: usize = 100;

/// Parse a complete expression.
pub fn parse(input: &str) -> Result<Expr, EvalError> {
    ExprParser::parse_str(input)
}

/// A parsed subtree and its height.
type Node = (Expr, usize);

/// Parser state for infix expressions.
pub struct ExprParser {
    tokens: Vec<ExprToken>,
    pos: usize,
    nesting: usize,
}

impl ExprParser {
    pub fn new(tokens: Vec<ExprToken>) -> Self {
        Self {
            tokens,
            pos: 0,
            nesting: 0,
        }
    }

    /// Parse from a string, requiring the whole input to be consumed.
    pub fn parse_str(input: &str) -> Result<Expr, EvalError> {
        let tokens = tokenize(input)?;
        let mut parser = Self::new(tokens);
        let (expr, _) = parser.parse_expr(0)?;
        match parser.peek() {
            ExprToken::End => Ok(expr),
            other => Err(EvalError::Syntax(format!(
                "unexpected {} after expression",
                describe(other)
            ))),
        }
    }

    fn peek(&self) -> &ExprToken {
        self.tokens.get(self.pos).unwrap_or(&ExprToken::End)
    }

    fn advance(&mut self) -> ExprToken {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect_rparen(&mut self) -> Result<(), EvalError> {
        match self.advance() {
            ExprToken::RParen => Ok(()),
            other => Err(EvalError::Syntax(format!(
                "expected ')', found {}",
                describe(&other)
            ))),
        }
    }

    /// Parse an expression with the given minimum precedence.
    fn parse_expr(&mut self, min_prec: u8) -> Result<Node, EvalError> {
        self.nesting += 1;
        let result = self.parse_expr_nested(min_prec);
        self.nesting -= 1;
        result
    }

    fn parse_expr_nested(&mut self, min_prec: u8) -> Result<Node, EvalError> {
        if self.nesting > MAX_NESTING {
            return Err(too_deep());
        }
        let (mut left, mut height) = self.parse_prefix()?;

        while let ExprToken::Op(op) = *self.peek() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();

            let next_min_prec = if op.is_right_assoc() { prec } else { prec + 1 };
            let (right, right_height) = self.parse_expr(next_min_prec)?;
            height = checked_height(height.max(right_height))?;
            left = Expr::binary(op, left, right);
        }

        Ok((left, height))
    }

    fn parse_prefix(&mut self) -> Result<Node, EvalError> {
        match self.peek() {
            ExprToken::Op(BinOp::Sub) => {
                self.advance();
                let (operand, height) = self.parse_expr(NEG_PRECEDENCE)?;
                Ok((Expr::neg(operand), checked_height(height)?))
            }
            ExprToken::Op(BinOp::Add) => {
                self.advance();
                self.parse_expr(NEG_PRECEDENCE)
            }
            _ => self.parse_atom(),
        }
    }

    /// Parse a number, variable, function call, or parenthesized expression.
    fn parse_atom(&mut self) -> Result<Node, EvalError> {
        match self.advance() {
            ExprToken::Num(n) => Ok((Expr::num(n), 1)),
            ExprToken::Ident(name) => {
                if matches!(self.peek(), ExprToken::LParen) {
                    self.advance();
                    let (args, height) = self.parse_args()?;
                    self.expect_rparen()?;
                    Ok((Expr::call(name, args), checked_height(height)?))
                } else {
                    Ok((Expr::var(name), 1))
                }
            }
            ExprToken::LParen => {
                let node = self.parse_expr(0)?;
                self.expect_rparen()?;
                Ok(node)
            }
            ExprToken::End => Err(EvalError::Syntax("unexpected end of expression".into())),
            other => Err(EvalError::Syntax(format!(
                "unexpected {}",
                describe(&other)
            ))),
        }
    }

    /// Parse comma-separated arguments; the height is that of the tallest.
    fn parse_args(&mut self) -> Result<(Vec<Expr>, usize), EvalError> {
        let mut args = Vec::new();
        let mut height = 0;
        if matches!(self.peek(), ExprToken::RParen) {
            return Ok((args, height));
        }
        loop {
            let (arg, arg_height) = self.parse_expr(0)?;
            args.push(arg);
            height = height.max(arg_height);
            if matches!(self.peek(), ExprToken::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok((args, height))
    }
}

/// Height of a node whose tallest child is `child` high.
fn checked_height(child: usize) -> Result<usize, EvalError> {
    if child >= MAX_NESTING {
        Err(too_deep())
    } else {
        Ok(child + 1)
    }
}

fn too_deep() -> EvalError {
    EvalError::Syntax(format!("expression nested deeper than {MAX_NESTING} levels"))
}

fn describe(token: &ExprToken) -> String {
    match token {
        ExprToken::Num(n) => format!("number {}", n),
        ExprToken::Ident(name) => format!("'{}'", name),
        ExprToken::Op(op) => format!("operator {:?}", op),
        ExprToken::LParen => "'('".into(),
        ExprToken::RParen => "')'".into(),
        ExprToken::Comma => "','".into(),
        ExprToken::End => "end of expression".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number() {
        assert_eq!(parse("42").unwrap(), Expr::num(42.0));
        assert_eq!(parse("2.5").unwrap(), Expr::num(2.5));
    }

    #[test]
    fn parse_exponent_numbers() {
        assert_eq!(parse("1e3").unwrap(), Expr::num(1000.0));
        assert_eq!(parse("2.5e-9").unwrap(), Expr::num(2.5e-9));
        assert_eq!(parse("1E+2").unwrap(), Expr::num(100.0));
    }

    #[test]
    fn trailing_e_is_not_an_exponent() {
        // `2e` is the number 2 followed by the name e: not a valid expression
        assert!(parse("2e").is_err());
        assert_eq!(tokenize("2e").unwrap()[1], ExprToken::Ident("e".into()));
    }

    #[test]
    fn parse_precedence() {
        let expr = parse("x+y*z").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                BinOp::Add,
                Expr::var("x"),
                Expr::binary(BinOp::Mul, Expr::var("y"), Expr::var("z"))
            )
        );
    }

    #[test]
    fn parse_left_assoc() {
        let expr = parse("x-y-z").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                BinOp::Sub,
                Expr::binary(BinOp::Sub, Expr::var("x"), Expr::var("y")),
                Expr::var("z")
            )
        );
    }

    #[test]
    fn parse_right_assoc_pow() {
        let expr = parse("x^y^z").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                BinOp::Pow,
                Expr::var("x"),
                Expr::binary(BinOp::Pow, Expr::var("y"), Expr::var("z"))
            )
        );
    }

    #[test]
    fn unary_minus_below_pow() {
        assert_eq!(
            parse("-x^2").unwrap(),
            Expr::neg(Expr::binary(BinOp::Pow, Expr::var("x"), Expr::num(2.0)))
        );
        assert_eq!(
            parse("-a*b").unwrap(),
            Expr::binary(BinOp::Mul, Expr::neg(Expr::var("a")), Expr::var("b"))
        );
    }

    #[test]
    fn parse_calls() {
        assert_eq!(
            parse("max(x, -1)").unwrap(),
            Expr::call("max", vec![Expr::var("x"), Expr::neg(Expr::num(1.0))])
        );
        assert_eq!(parse("f()").unwrap(), Expr::call("f", vec![]));
    }

    #[test]
    fn parse_errors() {
        assert!(parse("").is_err());
        assert!(parse("(1+2").is_err());
        assert!(parse("1+").is_err());
        assert!(parse("1 2").is_err());
        assert!(parse("3 # 4").is_err());
        assert!(parse("f(1,)").is_err());
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("x"));
        assert!(is_identifier("_tmp2"));
        assert!(!is_identifier("2x"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a.b"));
    }

    #[test]
    fn deep_nesting_is_an_error() {
        let parens = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert!(matches!(parse(&parens), Err(EvalError::Syntax(_))));

        let minuses = format!("{}1", "-".repeat(100_000));
        assert!(matches!(parse(&minuses), Err(EvalError::Syntax(_))));

        let powers = vec!["2"; 100_000].join("^");
        assert!(parse(&powers).is_err());

        let sum = vec!["1"; 100_000].join("+");
        assert!(parse(&sum).is_err());
    }

    #[test]
    fn nesting_below_the_limit_parses() {
        let depth = MAX_NESTING - 2;
        let parens = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(parse(&parens).unwrap(), Expr::var("x"));

        let sum = vec!["1"; 50].join("+");
        assert!(parse(&sum).is_ok());
    }
}
