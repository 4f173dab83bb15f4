//! Recursive-descent parser producing an expression tree.
//!
//! Precedence, lowest to highest:
//!  1. `+`, `-`
//!  2. `*`, `/`, `//`, `%`
//!  3. unary `+`, `-`
//!  4. `**` (right-associative; the exponent may itself carry a sign)
//!  5. numbers, identifiers, calls, parentheses

use super::evaluation::EvalError;
use super::lexer::{Token, tokenize};

/// Binary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
}

/// Expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Ident(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

/// Parse a complete expression. Trailing tokens are an error.
pub fn parse(input: &str) -> Result<Expr, EvalError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::new("empty expression"));
    }

    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(EvalError::new(format!("unexpected token {:?}", token))),
    }
}

/// Deepest tree the parser will build. Evaluation recurses once per level, so
/// this also bounds the evaluator's stack use.
const MAX_DEPTH: usize = 256;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn descend(&mut self) -> Result<(), EvalError> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::new("expression nested too deeply"));
        }
        self.depth += 1;
        Ok(())
    }

    fn ascend(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), EvalError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(EvalError::new(format!(
                "expected {:?}, found {:?}",
                expected,
                self.peek()
            )))
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, EvalError> {
        self.parse_add_sub()
    }

    // Each operator in a chain adds a level to the left-leaning tree.
    fn parse_add_sub(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_mul_div()?;
        let mut levels = 0;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            levels += 1;
            let rhs = self.parse_mul_div()?;
            lhs = binary(op, lhs, rhs);
        }
        self.ascend(levels);
        Ok(lhs)
    }

    fn parse_mul_div(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_unary()?;
        let mut levels = 0;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::DoubleSlash) => BinaryOp::FloorDiv,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            levels += 1;
            let rhs = self.parse_unary()?;
            lhs = binary(op, lhs, rhs);
        }
        self.ascend(levels);
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        let op = match self.peek() {
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Plus) => UnaryOp::Plus,
            _ => return self.parse_power(),
        };
        self.pos += 1;
        self.descend()?;
        let operand = self.parse_unary()?;
        self.ascend(1);
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_power(&mut self) -> Result<Expr, EvalError> {
        let base = self.parse_primary()?;
        if self.eat(&Token::DoubleStar) {
            // Right operand goes back through unary so `2**-1` and `2**3**2` work.
            self.descend()?;
            let exponent = self.parse_unary()?;
            self.ascend(1);
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, EvalError> {
        match self.next_token() {
            Some(Token::Number(value)) => Ok(Expr::Number(value)),
            Some(Token::Ident(name)) => {
                if self.eat(&Token::LParen) {
                    self.descend()?;
                    let args = self.parse_args()?;
                    self.ascend(1);
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            Some(Token::LParen) => {
                self.descend()?;
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                self.ascend(1);
                Ok(inner)
            }
            Some(token) => Err(EvalError::new(format!("unexpected token {:?}", token))),
            None => Err(EvalError::new("unexpected end of expression")),
        }
    }

    /// Argument list after the opening parenthesis, through the closing one.
    fn parse_args(&mut self) -> Result<Vec<Expr>, EvalError> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(&Token::RParen)?;
            return Ok(args);
        }
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
