//! Interactive terminal shell.
//!
//! Reads one command per line, applies it to the [`Calculator`], and renders the
//! status line and display after every step.

use super::command::{Command, HELP};
use crate::calculator::{CONSTANTS, Calculator, copy_to_clipboard, format_number};
use anyhow::Result;
use std::io::{BufRead, Write};

/// Whether the loop should keep reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// A line-oriented shell around a [`Calculator`].
pub struct TerminalShell<R, W> {
    calculator: Calculator,
    prompt: String,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalShell<R, W> {
    pub fn new(calculator: Calculator, prompt: impl Into<String>, input: R, output: W) -> Self {
        Self {
            calculator,
            prompt: prompt.into(),
            input,
            output,
        }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Run until `:quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        self.render()?;
        let mut line = String::new();
        loop {
            write!(self.output, "{}", self.prompt)?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(());
            }

            match Command::parse(&line) {
                Ok(command) => {
                    if self.apply(command)? == Flow::Quit {
                        return Ok(());
                    }
                }
                Err(err) => writeln!(self.output, "{}", err)?,
            }
        }
    }

    fn apply(&mut self, command: Command) -> Result<Flow> {
        tracing::trace!(?command, "applying command");
        let calc = &mut self.calculator;
        match command {
            Command::Enter(text) => {
                calc.append_token(&text);
                calc.evaluate();
            }
            Command::Type(text) => calc.append_token(&text),
            Command::Evaluate => calc.evaluate(),
            Command::Delete => calc.delete_last(),
            Command::ToggleSign => calc.toggle_sign(),
            Command::ScientificE => calc.insert_scientific_e(),
            Command::ToggleAngleMode => calc.toggle_angle_mode(),
            Command::Function(function) => calc.insert_function(function),
            Command::Constant(name) => calc.insert_constant(&name),
            Command::History(index) => calc.insert_history(index),
            Command::Square => calc.insert_square(),
            Command::Power => calc.insert_power(),
            Command::Reciprocal => calc.insert_reciprocal(),
            Command::MemoryAdd => calc.memory_add(),
            Command::MemoryRecall => calc.memory_recall(),
            Command::MemoryClear => calc.memory_clear(),
            Command::Clear => calc.set_display(""),
            Command::Copy => {
                if let Err(err) = copy_to_clipboard(calc.display()) {
                    writeln!(self.output, "{:#}", err)?;
                }
                return Ok(Flow::Continue);
            }
            Command::ListConstants => {
                for constant in CONSTANTS.iter() {
                    writeln!(
                        self.output,
                        "  {:<6} {:<16} {}",
                        constant.name,
                        format_number(constant.value),
                        constant.description
                    )?;
                }
                return Ok(Flow::Continue);
            }
            Command::Help => {
                writeln!(self.output, "{}", HELP)?;
                return Ok(Flow::Continue);
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        self.render()?;
        Ok(Flow::Continue)
    }

    fn render(&mut self) -> Result<()> {
        let calc = &self.calculator;
        let labels = calc.history_labels();
        writeln!(
            self.output,
            "[{}] M={} | {}",
            calc.angle_label(),
            format_number(calc.memory()),
            labels.join(" | ")
        )?;
        writeln!(self.output, "  {}", calc.display())?;
        Ok(())
    }
}
