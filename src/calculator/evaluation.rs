//! Expression evaluation against an explicit binding table.
//!
//! The evaluator only knows the names listed here: the scientific functions,
//! `pi`, `e`, the previous answers, and the physical constants. Anything else
//! is an error.

use super::constants;
use super::format::format_with_precision;
use super::history::AnswerHistory;
use super::parser::{BinaryOp, Expr, UnaryOp, parse};
use serde::{Deserialize, Serialize};
use std::f64::consts::{E, PI};
use std::fmt;
use thiserror::Error;

/// Text shown in place of a result when evaluation fails.
pub const ERROR_TEXT: &str = "Error";

/// Largest integer whose factorial fits in an f64.
///
/// `factorial` takes any integral value, so `factorial(5.0)` and
/// `factorial(10/2)` are both 120.
const MAX_FACTORIAL: f64 = 170.0;

/// Failure to evaluate an expression.
///
/// There is a single failure kind: callers only learn that evaluation
/// failed. The reason is kept for diagnostics.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("evaluation failed: {reason}")]
pub struct EvalError {
    reason: String,
}

impl EvalError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Diagnostic description of what went wrong.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// How trigonometric functions interpret angles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    #[default]
    Degrees,
    Radians,
}

impl AngleMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Degrees => Self::Radians,
            Self::Radians => Self::Degrees,
        }
    }

    /// Short label for the mode toggle.
    pub fn label(self) -> &'static str {
        match self {
            Self::Degrees => "DEG",
            Self::Radians => "RAD",
        }
    }

    fn to_radians(self, angle: f64) -> f64 {
        match self {
            Self::Degrees => angle.to_radians(),
            Self::Radians => angle,
        }
    }

    fn from_radians(self, angle: f64) -> f64 {
        match self {
            Self::Degrees => angle.to_degrees(),
            Self::Radians => angle,
        }
    }
}

/// Single-argument functions callable from expressions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    /// Base-10 logarithm.
    Log,
    /// Natural logarithm.
    Ln,
    Sqrt,
    Abs,
    Factorial,
}

impl Function {
    pub const ALL: [Function; 11] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Asin,
        Function::Acos,
        Function::Atan,
        Function::Log,
        Function::Ln,
        Function::Sqrt,
        Function::Abs,
        Function::Factorial,
    ];

    /// Name as written in expressions.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Log => "log",
            Self::Ln => "ln",
            Self::Sqrt => "sqrt",
            Self::Abs => "abs",
            Self::Factorial => "factorial",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Apply the function to `x`.
    pub fn apply(self, x: f64, angle_mode: AngleMode) -> Result<f64, EvalError> {
        let value = match self {
            Self::Sin => angle_mode.to_radians(x).sin(),
            Self::Cos => angle_mode.to_radians(x).cos(),
            Self::Tan => angle_mode.to_radians(x).tan(),
            Self::Asin => {
                require(x.abs() <= 1.0, self, x)?;
                angle_mode.from_radians(x.asin())
            }
            Self::Acos => {
                require(x.abs() <= 1.0, self, x)?;
                angle_mode.from_radians(x.acos())
            }
            Self::Atan => angle_mode.from_radians(x.atan()),
            Self::Log => {
                require(x > 0.0, self, x)?;
                x.log10()
            }
            Self::Ln => {
                require(x > 0.0, self, x)?;
                x.ln()
            }
            Self::Sqrt => {
                require(x >= 0.0, self, x)?;
                x.sqrt()
            }
            Self::Abs => x.abs(),
            Self::Factorial => factorial(x)?,
        };
        finite(value)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn require(condition: bool, function: Function, x: f64) -> Result<(), EvalError> {
    if condition {
        Ok(())
    } else {
        Err(EvalError::new(format!("{} is undefined for {}", function, x)))
    }
}

fn factorial(x: f64) -> Result<f64, EvalError> {
    if x < 0.0 || x.fract() != 0.0 {
        return Err(EvalError::new(format!(
            "factorial is only defined for non-negative integers, got {}",
            x
        )));
    }
    if x > MAX_FACTORIAL {
        return Err(EvalError::new(format!("factorial of {} overflows", x)));
    }
    Ok((2..=x as u32).fold(1.0, |acc, n| acc * f64::from(n)))
}

/// Names and values an expression may refer to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvalContext {
    pub angle_mode: AngleMode,
    /// Most recent result, bound to `ans`.
    pub ans: f64,
    /// Recent results, bound to `ans1`, `ans2`, `ans3`.
    pub recent: [f64; 3],
}

impl EvalContext {
    pub fn new(angle_mode: AngleMode) -> Self {
        Self {
            angle_mode,
            ..Default::default()
        }
    }

    pub fn with_answer(mut self, ans: f64) -> Self {
        self.ans = ans;
        self
    }

    pub fn with_history(mut self, history: &AnswerHistory) -> Self {
        self.recent = history.slots();
        self
    }

    /// Resolve an identifier to its value.
    pub fn lookup(&self, name: &str) -> Option<f64> {
        match name {
            "ans" => Some(self.ans),
            "ans1" => Some(self.recent[0]),
            "ans2" => Some(self.recent[1]),
            "ans3" => Some(self.recent[2]),
            "pi" => Some(PI),
            "e" => Some(E),
            _ => constants::lookup(name),
        }
    }
}

/// Evaluate `text` in `ctx`.
pub fn evaluate(text: &str, ctx: &EvalContext) -> Result<f64, EvalError> {
    let expr = parse(text)?;
    let value = eval_expr(&expr, ctx)?;
    finite(value)
}

fn eval_expr(expr: &Expr, ctx: &EvalContext) -> Result<f64, EvalError> {
    match expr {
        Expr::Number(value) => Ok(*value),
        Expr::Ident(name) => ctx.lookup(name).ok_or_else(|| {
            if Function::from_name(name).is_some() {
                EvalError::new(format!("function '{}' used as a value", name))
            } else {
                EvalError::new(format!("unknown name '{}'", name))
            }
        }),
        Expr::Unary { op, operand } => {
            let value = eval_expr(operand, ctx)?;
            Ok(match op {
                UnaryOp::Neg => -value,
                UnaryOp::Plus => value,
            })
        }
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval_expr(lhs, ctx)?;
            let rhs = eval_expr(rhs, ctx)?;
            apply_binary(*op, lhs, rhs)
        }
        Expr::Call { name, args } => {
            let function = Function::from_name(name)
                .ok_or_else(|| EvalError::new(format!("'{}' is not a function", name)))?;
            let [arg] = args.as_slice() else {
                return Err(EvalError::new(format!(
                    "{} takes exactly one argument ({} given)",
                    function,
                    args.len()
                )));
            };
            let x = eval_expr(arg, ctx)?;
            function.apply(x, ctx.angle_mode)
        }
    }
}

fn apply_binary(op: BinaryOp, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    match op {
        BinaryOp::Add => Ok(lhs + rhs),
        BinaryOp::Sub => Ok(lhs - rhs),
        BinaryOp::Mul => Ok(lhs * rhs),
        BinaryOp::Div => {
            non_zero(rhs)?;
            Ok(lhs / rhs)
        }
        BinaryOp::FloorDiv => {
            non_zero(rhs)?;
            Ok(floor_div(lhs, rhs))
        }
        BinaryOp::Mod => {
            non_zero(rhs)?;
            Ok(floor_mod(lhs, rhs))
        }
        BinaryOp::Pow => {
            if lhs == 0.0 && rhs < 0.0 {
                return Err(EvalError::new("zero raised to a negative power"));
            }
            finite(lhs.powf(rhs))
        }
    }
}

fn non_zero(divisor: f64) -> Result<(), EvalError> {
    if divisor == 0.0 {
        Err(EvalError::new("division by zero"))
    } else {
        Ok(())
    }
}

/// Remainder with the sign of the divisor.
fn floor_mod(lhs: f64, rhs: f64) -> f64 {
    let rem = lhs % rhs;
    if rem != 0.0 && (rem < 0.0) != (rhs < 0.0) {
        rem + rhs
    } else {
        rem
    }
}

/// Quotient rounded towards negative infinity, consistent with [`floor_mod`].
fn floor_div(lhs: f64, rhs: f64) -> f64 {
    let rem = lhs % rhs;
    let mut div = (lhs - rem) / rhs;
    if rem != 0.0 && (rem < 0.0) != (rhs < 0.0) {
        div -= 1.0;
    }
    let floored = div.floor();
    if div - floored > 0.5 {
        floored + 1.0
    } else {
        floored
    }
}

fn finite(value: f64) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::new(format!("result is not a finite number ({})", value)))
    }
}

/// Outcome of evaluating a standalone expression.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CalcResult {
    /// The expression produced a finite number.
    Success {
        /// Input with surrounding whitespace trimmed.
        expression: String,
        /// The numeric value.
        value: f64,
        /// Formatted for display.
        display: String,
    },
    /// The expression could not be evaluated.
    Error {
        /// Input with surrounding whitespace trimmed.
        expression: String,
        /// Always [`ERROR_TEXT`].
        message: String,
    },
}

impl CalcResult {
    /// Trimmed input, for either outcome.
    pub fn expression(&self) -> &str {
        match self {
            Self::Success { expression, .. } => expression,
            Self::Error { expression, .. } => expression,
        }
    }

    /// Whether a value was produced.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Text for the display: the formatted value, or [`ERROR_TEXT`].
    pub fn display(&self) -> &str {
        match self {
            Self::Success { display, .. } => display,
            Self::Error { message, .. } => message,
        }
    }

    /// The value, or `None` when evaluation failed.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Success { value, .. } => Some(*value),
            Self::Error { .. } => None,
        }
    }
}

/// Evaluate a trimmed expression and package the outcome for display, with
/// `precision` significant digits.
pub fn evaluate_expression(input: &str, ctx: &EvalContext, precision: usize) -> CalcResult {
    let expression = input.trim().to_string();

    match evaluate(&expression, ctx) {
        Ok(value) => CalcResult::Success {
            display: format_with_precision(value, precision),
            expression,
            value,
        },
        Err(err) => {
            tracing::debug!(%expression, reason = err.reason(), "evaluation failed");
            CalcResult::Error {
                expression,
                message: ERROR_TEXT.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str) -> Result<f64, EvalError> {
        evaluate(text, &EvalContext::default())
    }

    fn eval_rad(text: &str) -> Result<f64, EvalError> {
        evaluate(text, &EvalContext::new(AngleMode::Radians))
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("2+3").unwrap(), 5.0);
        assert_eq!(eval("2+3*4").unwrap(), 14.0);
        assert_eq!(eval("(2+3)*4").unwrap(), 20.0);
        assert_eq!(eval("10/4").unwrap(), 2.5);
        assert_eq!(eval("2**10").unwrap(), 1024.0);
        assert_eq!(eval("2**-1").unwrap(), 0.5);
        assert_eq!(eval("2**3**2").unwrap(), 512.0);
        assert_eq!(eval("-2**2").unwrap(), -4.0);
        assert_eq!(eval("--3").unwrap(), 3.0);
        assert_eq!(eval("+4").unwrap(), 4.0);
        assert_eq!(eval("1e3+1").unwrap(), 1001.0);
    }

    #[test]
    fn test_floor_division_and_modulo() {
        assert_eq!(eval("7//2").unwrap(), 3.0);
        assert_eq!(eval("-7//2").unwrap(), -4.0);
        assert_eq!(eval("7//-2").unwrap(), -4.0);
        assert_eq!(eval("7.5//2").unwrap(), 3.0);
        assert_eq!(eval("7%3").unwrap(), 1.0);
        assert_eq!(eval("-7%3").unwrap(), 2.0);
        assert_eq!(eval("7%-3").unwrap(), -2.0);
        assert_eq!(eval("5.5%2").unwrap(), 1.5);
    }

    #[test]
    fn test_trig_in_degrees() {
        assert_close(eval("sin(90)").unwrap(), 1.0);
        assert_close(eval("cos(180)").unwrap(), -1.0);
        assert_close(eval("tan(45)").unwrap(), 1.0);
        assert_close(eval("asin(1)").unwrap(), 90.0);
        assert_close(eval("acos(0)").unwrap(), 90.0);
        assert_close(eval("atan(1)").unwrap(), 45.0);
    }

    #[test]
    fn test_trig_in_radians() {
        assert_close(eval_rad("sin(90)").unwrap(), 90f64.sin());
        assert_close(eval_rad("cos(pi)").unwrap(), -1.0);
        assert_close(eval_rad("asin(1)").unwrap(), PI / 2.0);
        assert_close(eval_rad("atan(1)").unwrap(), PI / 4.0);
    }

    #[test]
    fn test_other_functions() {
        assert_close(eval("log(1000)").unwrap(), 3.0);
        assert_close(eval("ln(e)").unwrap(), 1.0);
        assert_eq!(eval("sqrt(16)").unwrap(), 4.0);
        assert_eq!(eval("abs(-3.5)").unwrap(), 3.5);
        assert_eq!(eval("factorial(0)").unwrap(), 1.0);
        assert_eq!(eval("factorial(5)").unwrap(), 120.0);
        assert_eq!(eval("factorial(5.0)").unwrap(), 120.0);
        assert_eq!(eval("factorial(10/2)").unwrap(), 120.0);
        assert_eq!(eval("sqrt(factorial(4)+1)").unwrap(), 5.0);
    }

    #[test]
    fn test_constants_and_literals() {
        assert_eq!(eval("pi").unwrap(), PI);
        assert_eq!(eval("e").unwrap(), E);
        assert_eq!(eval("c").unwrap(), 2.99792458e8);
        assert_close(eval("h/(2*pi)").unwrap(), 1.0545718176e-34);
        assert_close(eval("m_e*c**2/eV").unwrap(), 510998.95);
    }

    #[test]
    fn test_answer_bindings() {
        let mut history = AnswerHistory::new();
        history.push(30.0);
        history.push(20.0);
        history.push(10.0);
        let ctx = EvalContext::new(AngleMode::Degrees)
            .with_answer(10.0)
            .with_history(&history);
        assert_eq!(evaluate("ans+ans1", &ctx).unwrap(), 20.0);
        assert_eq!(evaluate("ans2*ans3", &ctx).unwrap(), 600.0);

        let empty = EvalContext::default();
        assert_eq!(evaluate("ans+ans1+ans2+ans3", &empty).unwrap(), 0.0);
    }

    #[test]
    fn test_failures_share_one_kind() {
        for input in [
            "1/0",
            "1//0",
            "1%0",
            "0**-1",
            "sqrt(-1)",
            "log(0)",
            "ln(-1)",
            "asin(2)",
            "factorial(-1)",
            "factorial(2.5)",
            "factorial(171)",
            "foo(1)",
            "foo",
            "sin",
            "c(2)",
            "sin(1, 2)",
            "sqrt()",
            "(-8)**(1/3)",
            "10**400",
            "1e400",
            "5sqrt(4)",
            "",
        ] {
            let result: Result<f64, EvalError> = eval(input);
            assert!(result.is_err(), "'{}' should fail", input);
        }
    }

    #[test]
    fn test_evaluate_expression() {
        let ctx = EvalContext::default();
        let result = evaluate_expression("  1/3 ", &ctx, 10);
        assert!(result.is_success());
        assert_eq!(result.expression(), "1/3");
        assert_eq!(result.display(), "0.3333333333");

        let result = evaluate_expression("1/0", &ctx, 10);
        assert!(!result.is_success());
        assert_eq!(result.display(), ERROR_TEXT);
        assert_eq!(result.value(), None);
    }

    #[test]
    fn test_calc_result_json() {
        let result = evaluate_expression("2*3", &EvalContext::default(), 10);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["display"], "6");
        assert_eq!(json["value"], 6.0);
    }

    #[test]
    fn test_function_names() {
        for function in Function::ALL {
            assert_eq!(Function::from_name(function.name()), Some(function));
        }
        assert_eq!(Function::from_name("SIN"), None);
    }

    #[test]
    fn test_angle_mode() {
        assert_eq!(AngleMode::default(), AngleMode::Degrees);
        assert_eq!(AngleMode::Degrees.toggled(), AngleMode::Radians);
        assert_eq!(AngleMode::Radians.label(), "RAD");
    }
}
