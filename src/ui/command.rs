//! Parsing of terminal shell input into keypad commands.
//!
//! A plain line is typed into the display and evaluated. Lines starting with
//! `:` name a single key.

use crate::calculator::{Function, HISTORY_CAPACITY, constants};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    /// `:name` with an optional argument after whitespace.
    static ref COMMAND: Regex = Regex::new(
        r"^:(?P<name>[A-Za-z_+]+)(?:\s+(?P<arg>.*?))?\s*$"
    ).unwrap();
}

/// One action requested from the shell.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Type text and press `=`.
    Enter(String),
    /// Type text without evaluating.
    Type(String),
    /// Press `=`.
    Evaluate,
    Delete,
    ToggleSign,
    ScientificE,
    ToggleAngleMode,
    Function(Function),
    Constant(String),
    /// Recall a recent answer (0 is the newest).
    History(usize),
    Square,
    Power,
    Reciprocal,
    MemoryAdd,
    MemoryRecall,
    MemoryClear,
    Clear,
    Copy,
    ListConstants,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command ':{0}' (try :help)")]
    Unknown(String),
    #[error(":{0} needs an argument")]
    MissingArgument(String),
    #[error("invalid argument '{arg}' for :{command}")]
    InvalidArgument { command: String, arg: String },
}

impl Command {
    /// Parse one line of shell input.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Evaluate);
        }
        if !line.starts_with(':') {
            return Ok(Self::Enter(line.to_string()));
        }

        let Some(caps) = COMMAND.captures(line) else {
            return Err(CommandError::Unknown(line.trim_start_matches(':').to_string()));
        };
        let name = &caps["name"];
        let arg = caps.name("arg").map(|m| m.as_str()).filter(|a| !a.is_empty());

        let command = match name {
            "type" | "t" => Self::Type(required(name, arg)?.to_string()),
            "del" | "back" => Self::Delete,
            "neg" | "pm" => Self::ToggleSign,
            "E" | "exp" => Self::ScientificE,
            "mode" | "deg" | "rad" => Self::ToggleAngleMode,
            "fn" => {
                let arg = required(name, arg)?;
                Self::Function(Function::from_name(arg).ok_or_else(|| invalid(name, arg))?)
            }
            "const" => {
                let arg = required(name, arg)?;
                if !constants::is_constant(arg) && !matches!(arg, "pi" | "e") {
                    return Err(invalid(name, arg));
                }
                Self::Constant(arg.to_string())
            }
            "pi" | "e" => Self::Constant(name.to_string()),
            "ans" => {
                let arg = arg.unwrap_or("1");
                match arg.parse::<usize>() {
                    Ok(n) if (1..=HISTORY_CAPACITY).contains(&n) => Self::History(n - 1),
                    _ => return Err(invalid(name, arg)),
                }
            }
            "sq" => Self::Square,
            "pow" => Self::Power,
            "inv" => Self::Reciprocal,
            "m+" => Self::MemoryAdd,
            "mr" => Self::MemoryRecall,
            "mc" => Self::MemoryClear,
            "clear" => Self::Clear,
            "copy" => Self::Copy,
            "consts" => Self::ListConstants,
            "help" | "h" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => match Function::from_name(other) {
                Some(function) => Self::Function(function),
                None => return Err(CommandError::Unknown(other.to_string())),
            },
        };
        Ok(command)
    }
}

fn required<'a>(command: &str, arg: Option<&'a str>) -> Result<&'a str, CommandError> {
    arg.ok_or_else(|| CommandError::MissingArgument(command.to_string()))
}

fn invalid(command: &str, arg: &str) -> CommandError {
    CommandError::InvalidArgument {
        command: command.to_string(),
        arg: arg.to_string(),
    }
}

/// Help text for the shell.
pub const HELP: &str = "\
Type an expression and press Enter to evaluate it. After a result, input
continues the result (`+3` adds to it). An empty line evaluates the display.

Keys:
  :type TEXT   type without evaluating      :del        delete last character
  :neg         toggle sign                  :E          scientific exponent
  :mode        toggle DEG/RAD               :clear      clear the display
  :fn NAME     insert function (or :sin, :cos, :tan, :asin, :acos, :atan,
               :log, :ln, :sqrt, :abs, :factorial)
  :const NAME  insert constant (or :pi, :e) :consts     list constants
  :ans N       insert answer N (1-3)        :sq :pow :inv  x**2, x**y, 1/x
  :m+ :mr :mc  memory add, recall, clear    :copy       copy the display
  :help        this text                    :quit       exit";
