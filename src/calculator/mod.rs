//! Calculator core.
//!
//! This module provides functionality to:
//! - Tokenize, parse, and evaluate expressions against a fixed set of names
//! - Format results for the display
//! - Track the edit buffer, recent answers, and the memory register
//! - Copy results to the clipboard

mod clipboard;
pub mod constants;
mod evaluation;
mod format;
mod history;
mod lexer;
mod memory;
mod parser;
mod state;

pub use clipboard::copy_to_clipboard;
pub use constants::{CONSTANTS, PhysicalConstant};
pub use evaluation::{
    AngleMode, CalcResult, ERROR_TEXT, EvalContext, EvalError, Function, evaluate,
    evaluate_expression,
};
pub use format::{SIGNIFICANT_DIGITS, format_number, format_with_precision};
pub use history::{AnswerHistory, HISTORY_CAPACITY};
pub use memory::MemoryRegister;
pub use parser::{BinaryOp, Expr, UnaryOp, parse};
pub use state::{AppendMode, Calculator, Operator};
