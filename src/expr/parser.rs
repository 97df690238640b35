//! Recursive descent parser for derived-column expressions.
//!
//! Precedence, loosest first: `+ -`, `* / %`, unary `+ -`, `**`. Powers are
//! right-associative and bind tighter than a unary minus on their left, so
//! `-x**2` is `-(x**2)` and `2**-1` is allowed.
//!
//! Nesting (signs, parentheses, calls, exponents) and the height of the
//! resulting tree are both capped at [`MAX_DEPTH`], so parsing, evaluation
//! and drop never recurse without bound.

use std::fmt;

use super::lexer::{lex, Spanned, Token};
use super::ExprError;

/// Maximum nesting depth and tree height of a parsed expression
pub const MAX_DEPTH: usize = 256;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%` (result takes the sign of the divisor)
    Rem,
    /// `**`
    Pow,
}

impl BinaryOp {
    /// Apply to two scalars
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Rem => a - b * (a / b).floor(),
            BinaryOp::Pow => a.powf(b),
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "**",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `+x`
    Plus,
    /// `-x`
    Neg,
}

/// Expression syntax tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Const(f64),
    /// Bare identifier: a column, or a named constant
    Name(String),
    /// Backtick-quoted name: always a column
    Column(String),
    /// Unary operation
    Op1(UnaryOp, Box<Expr>),
    /// Binary operation
    Op2(BinaryOp, Box<Expr>, Box<Expr>),
    /// Built-in function call
    Call(String, Vec<Expr>),
}

impl Expr {
    /// Parse expression text into a syntax tree
    pub fn parse(input: &str) -> Result<Expr, ExprError> {
        let tokens = lex(input)?;
        if tokens.is_empty() {
            return Err(ExprError::parse(0, "empty expression"));
        }

        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            end: input.len(),
            depth: 0,
        };
        let (expr, _) = parser.parse_expr()?;

        if let Some((offset, token)) = parser.peek() {
            return Err(ExprError::parse(
                *offset,
                format!("unexpected {} after expression", describe(token)),
            ));
        }
        Ok(expr)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(n) => write!(f, "{}", n),
            Expr::Name(name) => write!(f, "{}", name),
            Expr::Column(name) => write!(f, "`{}`", name),
            Expr::Op1(UnaryOp::Plus, e) => write!(f, "(+{})", e),
            Expr::Op1(UnaryOp::Neg, e) => write!(f, "(-{})", e),
            Expr::Op2(op, l, r) => write!(f, "({} {} {})", l, op.symbol(), r),
            Expr::Call(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Number(n) => format!("number {}", n),
        Token::Ident(name) => format!("name '{}'", name),
        Token::Quoted(name) => format!("name `{}`", name),
        Token::Plus => "'+'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Slash => "'/'".to_string(),
        Token::Percent => "'%'".to_string(),
        Token::Power => "'**'".to_string(),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Comma => "','".to_string(),
    }
}

/// A subtree and its height (a leaf has height 1)
type Node = (Expr, usize);

fn too_deep(offset: usize) -> ExprError {
    ExprError::parse(
        offset,
        format!("expression nested too deeply (limit {})", MAX_DEPTH),
    )
}

fn binary(offset: usize, op: BinaryOp, left: Node, right: Node) -> Result<Node, ExprError> {
    let height = 1 + left.1.max(right.1);
    if height > MAX_DEPTH {
        return Err(too_deep(offset));
    }
    Ok((Expr::Op2(op, Box::new(left.0), Box::new(right.0)), height))
}

struct Parser<'t> {
    tokens: &'t [Spanned],
    pos: usize,
    end: usize,
    /// Active `parse_unary` frames; every recursive path passes through it
    depth: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<&'t Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<&'t Token> {
        self.peek().map(|(_, t)| t)
    }

    fn advance(&mut self) -> Option<&'t Spanned> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn offset(&self) -> usize {
        self.peek().map_or(self.end, |(offset, _)| *offset)
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), ExprError> {
        match self.peek() {
            Some((_, token)) if *token == expected => {
                self.pos += 1;
                Ok(())
            }
            Some((offset, token)) => Err(ExprError::parse(
                *offset,
                format!("expected {}, found {}", what, describe(token)),
            )),
            None => Err(ExprError::parse(
                self.end,
                format!("expected {}, found end of expression", what),
            )),
        }
    }

    fn parse_expr(&mut self) -> Result<Node, ExprError> {
        self.parse_add_sub()
    }

    fn parse_add_sub(&mut self) -> Result<Node, ExprError> {
        let mut left = self.parse_mul_div()?;

        loop {
            let op = match self.peek_token() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            let offset = self.offset();
            self.advance();
            let right = self.parse_mul_div()?;
            left = binary(offset, op, left, right)?;
        }

        Ok(left)
    }

    fn parse_mul_div(&mut self) -> Result<Node, ExprError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.peek_token() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => break,
            };
            let offset = self.offset();
            self.advance();
            let right = self.parse_unary()?;
            left = binary(offset, op, left, right)?;
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Node, ExprError> {
        if self.depth >= MAX_DEPTH {
            return Err(too_deep(self.offset()));
        }
        self.depth += 1;
        let result = self.parse_signed();
        self.depth -= 1;
        result
    }

    fn parse_signed(&mut self) -> Result<Node, ExprError> {
        let op = match self.peek_token() {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Neg,
            _ => return self.parse_power(),
        };
        let offset = self.offset();
        self.advance();
        let (operand, height) = self.parse_unary()?;
        if height + 1 > MAX_DEPTH {
            return Err(too_deep(offset));
        }
        Ok((Expr::Op1(op, Box::new(operand)), height + 1))
    }

    fn parse_power(&mut self) -> Result<Node, ExprError> {
        let base = self.parse_atom()?;

        if let Some(Token::Power) = self.peek_token() {
            let offset = self.offset();
            self.advance();
            // Right operand may carry its own sign: 2**-1
            let exponent = self.parse_unary()?;
            return binary(offset, BinaryOp::Pow, base, exponent);
        }

        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Node, ExprError> {
        let offset = self.offset();

        match self.advance() {
            Some((_, Token::Number(n))) => Ok((Expr::Const(*n), 1)),
            Some((_, Token::Quoted(name))) => Ok((Expr::Column(name.clone()), 1)),
            Some((_, Token::Ident(name))) => {
                if let Some(Token::LParen) = self.peek_token() {
                    self.advance();
                    let args = self.parse_args()?;
                    let height = 1 + args.iter().map(|(_, h)| *h).max().unwrap_or(0);
                    if height > MAX_DEPTH {
                        return Err(too_deep(offset));
                    }
                    let args = args.into_iter().map(|(arg, _)| arg).collect();
                    Ok((Expr::Call(name.clone(), args), height))
                } else {
                    Ok((Expr::Name(name.clone()), 1))
                }
            }
            Some((_, Token::LParen)) => {
                let inner = self.parse_expr()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Some((_, token)) => Err(ExprError::parse(
                offset,
                format!("expected a value, found {}", describe(token)),
            )),
            None => Err(ExprError::parse(
                offset,
                "expected a value, found end of expression",
            )),
        }
    }

    /// Arguments after an opening parenthesis, through the closing one
    fn parse_args(&mut self) -> Result<Vec<Node>, ExprError> {
        let mut args = Vec::new();

        if let Some(Token::RParen) = self.peek_token() {
            self.advance();
            return Ok(args);
        }

        loop {
            args.push(self.parse_expr()?);
            match self.peek_token() {
                Some(Token::Comma) => {
                    self.advance();
                }
                _ => {
                    self.expect(Token::RParen, "',' or ')'")?;
                    return Ok(args);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(input: &str) -> String {
        Expr::parse(input).unwrap().to_string()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(show("a + b * c"), "(a + (b * c))");
        assert_eq!(show("a - b - c"), "((a - b) - c)");
        assert_eq!(show("(a + b) * c"), "((a + b) * c)");
        assert_eq!(show("a * b % c"), "((a * b) % c)");
    }

    #[test]
    fn test_power_binds_tighter_than_unary_and_is_right_assoc() {
        assert_eq!(show("-x**2"), "(-(x ** 2))");
        assert_eq!(show("2**3**2"), "(2 ** (3 ** 2))");
        assert_eq!(show("2**-1"), "(2 ** (-1))");
    }

    #[test]
    fn test_calls() {
        assert_eq!(show("sqrt(x)"), "sqrt(x)");
        assert_eq!(show("atan2(y, x) + pi"), "(atan2(y, x) + pi)");
        assert_eq!(show("mean()"), "mean()");
        assert_eq!(show("`c_1[1]` * 2"), "(`c_1[1]` * 2)");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Expr::parse(""), Err(ExprError::Parse { position: 0, .. })));
        assert!(matches!(Expr::parse("x +"), Err(ExprError::Parse { position: 3, .. })));
        assert!(matches!(Expr::parse("(x"), Err(ExprError::Parse { .. })));
        assert!(matches!(Expr::parse("x y"), Err(ExprError::Parse { position: 2, .. })));
        assert!(matches!(Expr::parse("f(x,)"), Err(ExprError::Parse { .. })));
        assert!(matches!(Expr::parse("2x"), Err(ExprError::Parse { .. })));
    }

    fn is_too_deep(result: Result<Expr, ExprError>) -> bool {
        matches!(result, Err(ExprError::Parse { message, .. }) if message.contains("too deeply"))
    }

    #[test]
    fn test_deep_unary_chain_is_rejected() {
        let input = format!("{}x", "-".repeat(200_000));
        assert!(is_too_deep(Expr::parse(&input)));
    }

    #[test]
    fn test_deep_parentheses_are_rejected() {
        let input = format!("{}x{}", "(".repeat(100_000), ")".repeat(100_000));
        assert!(is_too_deep(Expr::parse(&input)));

        let calls = format!("{}x{}", "abs(".repeat(100_000), ")".repeat(100_000));
        assert!(is_too_deep(Expr::parse(&calls)));
    }

    #[test]
    fn test_long_operator_chain_is_rejected() {
        let input = format!("x{}", " + x".repeat(100_000));
        assert!(is_too_deep(Expr::parse(&input)));

        let powers = format!("2{}", "**2".repeat(100_000));
        assert!(is_too_deep(Expr::parse(&powers)));
    }

    #[test]
    fn test_moderate_nesting_is_accepted() {
        let parens = format!("{}x{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(Expr::parse(&parens).unwrap(), Expr::Name("x".to_string()));

        let chain = format!("x{}", " + 1".repeat(200));
        assert!(Expr::parse(&chain).is_ok());
        assert!(Expr::parse(&format!("{}x", "-".repeat(200))).is_ok());
    }
}
