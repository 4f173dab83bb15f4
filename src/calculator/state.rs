//! The calculator controller: edit buffer, append mode, and every keypad action.
//!
//! A UI shell calls one method per control and then re-reads [`Calculator::display`],
//! [`Calculator::history_labels`], and [`Calculator::angle_label`].

use super::constants;
use super::evaluation::{AngleMode, ERROR_TEXT, EvalContext, Function, evaluate};
use super::format::{SIGNIFICANT_DIGITS, format_with_precision};
use super::history::{AnswerHistory, HISTORY_CAPACITY};
use super::memory::MemoryRegister;

/// How the next token combines with the buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppendMode {
    /// Accepting input; an empty or `Error` buffer is replaced by the next token.
    #[default]
    Ready,
    /// The buffer holds a fresh result; the next token extends it.
    JustProduced,
}

/// Infix operator and parenthesis keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Multiply,
    Divide,
    FloorDivide,
    Modulo,
    OpenParen,
    CloseParen,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::FloorDivide => "//",
            Self::Modulo => "%",
            Self::OpenParen => "(",
            Self::CloseParen => ")",
        }
    }
}

/// Calculator state.
#[derive(Clone, Debug)]
pub struct Calculator {
    buffer: String,
    mode: AppendMode,
    angle_mode: AngleMode,
    answer: f64,
    history: AnswerHistory,
    memory: MemoryRegister,
    precision: usize,
}

impl Default for Calculator {
    fn default() -> Self {
        Self {
            buffer: String::new(),
            mode: AppendMode::Ready,
            angle_mode: AngleMode::Degrees,
            answer: 0.0,
            history: AnswerHistory::new(),
            memory: MemoryRegister::new(),
            precision: SIGNIFICANT_DIGITS,
        }
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_angle_mode(mut self, angle_mode: AngleMode) -> Self {
        self.angle_mode = angle_mode;
        self
    }

    /// Significant digits used when formatting results.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision.max(1);
        self
    }

    // -- read side ----------------------------------------------------------

    pub fn display(&self) -> &str {
        &self.buffer
    }

    pub fn append_mode(&self) -> AppendMode {
        self.mode
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    /// Label for the angle-mode toggle.
    pub fn angle_label(&self) -> &'static str {
        self.angle_mode.label()
    }

    /// The most recent successful result (`ans`).
    pub fn answer(&self) -> f64 {
        self.answer
    }

    pub fn history(&self) -> &AnswerHistory {
        &self.history
    }

    pub fn memory(&self) -> f64 {
        self.memory.value()
    }

    /// Text for the recent-answer labels; empty for missing entries.
    pub fn history_labels(&self) -> [String; HISTORY_CAPACITY] {
        std::array::from_fn(|i| {
            self.history
                .get(i)
                .map(|value| self.format(value))
                .unwrap_or_default()
        })
    }

    /// Bindings for evaluating the current buffer.
    pub fn eval_context(&self) -> EvalContext {
        EvalContext::new(self.angle_mode)
            .with_answer(self.answer)
            .with_history(&self.history)
    }

    fn format(&self, value: f64) -> String {
        format_with_precision(value, self.precision)
    }

    fn is_blank(&self) -> bool {
        self.buffer.is_empty() || self.buffer == ERROR_TEXT
    }

    // -- buffer editing -----------------------------------------------------

    /// Replace the buffer with text edited directly in the display field.
    pub fn set_display(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.mode = AppendMode::Ready;
    }

    /// Append a digit, operator, or point.
    ///
    /// After a result the token extends it (`5` then `+` gives `5+`). Otherwise
    /// an empty or `Error` buffer is replaced.
    pub fn append_token(&mut self, text: &str) {
        match self.mode {
            AppendMode::JustProduced => self.buffer.push_str(text),
            AppendMode::Ready if self.is_blank() => self.buffer = text.to_string(),
            AppendMode::Ready => self.buffer.push_str(text),
        }
        self.mode = AppendMode::Ready;
    }

    /// Append text regardless of mode, clearing an `Error` buffer first.
    ///
    /// Used for functions, constants, and recalled values, so `5` followed by
    /// `sqrt` reads `5sqrt(`.
    pub fn append_literal(&mut self, text: &str) {
        if self.buffer == ERROR_TEXT {
            self.buffer.clear();
        }
        self.buffer.push_str(text);
        self.mode = AppendMode::Ready;
    }

    /// Type a decimal digit key. Values above 9 are not keys and are ignored.
    pub fn append_digit(&mut self, digit: u8) {
        match char::from_digit(u32::from(digit), 10) {
            Some(key) => self.append_token(key.encode_utf8(&mut [0; 4])),
            None => tracing::warn!(digit, "digit out of range ignored"),
        }
    }

    pub fn append_operator(&mut self, operator: Operator) {
        self.append_token(operator.symbol());
    }

    pub fn append_point(&mut self) {
        self.append_token(".");
    }

    pub fn delete_last(&mut self) {
        self.buffer.pop();
        self.mode = AppendMode::Ready;
    }

    /// The `E` key: `e` after a digit, `)` or `.`, otherwise `1e`.
    pub fn insert_scientific_e(&mut self) {
        if self.is_blank() {
            self.append_literal("1e");
            return;
        }
        match self.buffer.chars().last() {
            Some(last) if last.is_ascii_digit() || last == ')' || last == '.' => {
                self.append_literal("e")
            }
            _ => self.append_literal("1e"),
        }
    }

    /// Add or remove a single leading minus. Ignores empty, `0`, and `Error`.
    pub fn toggle_sign(&mut self) {
        if self.is_blank() || self.buffer == "0" {
            return;
        }
        if self.buffer.starts_with('-') {
            self.buffer.remove(0);
        } else {
            self.buffer.insert(0, '-');
        }
    }

    pub fn toggle_angle_mode(&mut self) {
        self.angle_mode = self.angle_mode.toggled();
        tracing::debug!(mode = self.angle_label(), "angle mode toggled");
    }

    // -- scientific keys ----------------------------------------------------

    /// Append `name(` for a function key.
    pub fn insert_function(&mut self, function: Function) {
        self.append_literal(&format!("{}(", function.name()));
    }

    /// Append a constant name (`c`, `hbar`, ..., or `pi`/`e`).
    ///
    /// Unknown names are ignored.
    pub fn insert_constant(&mut self, name: &str) {
        if constants::is_constant(name) || matches!(name, "pi" | "e") {
            self.append_literal(name);
        } else {
            tracing::warn!(name, "unknown constant ignored");
        }
    }

    /// Append the `index`-th most recent answer (0 is the newest), if present.
    pub fn insert_history(&mut self, index: usize) {
        if let Some(value) = self.history.get(index) {
            let text = self.format(value);
            self.append_literal(&text);
        }
    }

    /// The `x²` key.
    pub fn insert_square(&mut self) {
        self.append_literal("**2");
    }

    /// The `xʸ` key.
    pub fn insert_power(&mut self) {
        self.append_literal("**");
    }

    /// The `1/x` key.
    pub fn insert_reciprocal(&mut self) {
        self.append_literal("1/");
    }

    // -- memory -------------------------------------------------------------

    /// M+: add the displayed number to memory. A non-numeric display is ignored.
    pub fn memory_add(&mut self) {
        if !self.memory.add_text(&self.buffer) {
            tracing::debug!(display = %self.buffer, "memory add ignored non-numeric display");
        }
    }

    /// MR: append the memory value.
    pub fn memory_recall(&mut self) {
        let text = self.format(self.memory.value());
        self.append_literal(&text);
    }

    /// MC: reset memory to zero.
    pub fn memory_clear(&mut self) {
        self.memory.clear();
    }

    // -- evaluation ---------------------------------------------------------

    /// The `=` key.
    ///
    /// On success the formatted result replaces the buffer and is recorded as
    /// `ans` and in the history. On any failure the buffer shows `Error`.
    pub fn evaluate(&mut self) {
        let expression = self.buffer.trim();
        if expression.is_empty() {
            return;
        }

        match evaluate(expression, &self.eval_context()) {
            Ok(value) => {
                tracing::debug!(%expression, value, "evaluated");
                self.buffer = self.format(value);
                self.answer = value;
                self.history.push(value);
                self.mode = AppendMode::JustProduced;
            }
            Err(err) => {
                tracing::debug!(%expression, reason = err.reason(), "evaluation failed");
                self.buffer = ERROR_TEXT.to_string();
                self.mode = AppendMode::Ready;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_display(text: &str) -> Calculator {
        let mut calc = Calculator::new();
        calc.set_display(text);
        calc
    }

    fn evaluated(text: &str) -> Calculator {
        let mut calc = with_display(text);
        calc.evaluate();
        calc
    }

    #[test]
    fn test_append_token_builds_expression() {
        let mut calc = Calculator::new();
        calc.append_digit(1);
        calc.append_digit(2);
        calc.append_operator(Operator::Plus);
        calc.append_digit(3);
        calc.append_point();
        calc.append_digit(5);
        assert_eq!(calc.display(), "12+3.5");
        assert_eq!(calc.append_mode(), AppendMode::Ready);
    }

    #[test]
    fn test_append_digit_ignores_out_of_range() {
        let mut calc = with_display("12");
        calc.append_digit(10);
        calc.append_digit(255);
        assert_eq!(calc.display(), "12");
        calc.append_digit(9);
        assert_eq!(calc.display(), "129");
    }

    #[test]
    fn test_append_token_extends_result() {
        let mut calc = evaluated("2+3");
        assert_eq!(calc.display(), "5");
        assert_eq!(calc.append_mode(), AppendMode::JustProduced);

        calc.append_token("+");
        assert_eq!(calc.display(), "5+");
        assert_eq!(calc.append_mode(), AppendMode::Ready);
    }

    #[test]
    fn test_append_token_after_result_keeps_digits() {
        let mut calc = evaluated("2+3");
        calc.append_digit(1);
        assert_eq!(calc.display(), "51");
    }

    #[test]
    fn test_append_token_replaces_error() {
        let mut calc = evaluated("1/0");
        assert_eq!(calc.display(), "Error");
        assert_eq!(calc.append_mode(), AppendMode::Ready);

        calc.append_token("3");
        assert_eq!(calc.display(), "3");
    }

    #[test]
    fn test_append_literal_after_result() {
        let mut calc = evaluated("2+3");
        calc.insert_function(Function::Sqrt);
        assert_eq!(calc.display(), "5sqrt(");
        assert_eq!(calc.append_mode(), AppendMode::Ready);
    }

    #[test]
    fn test_append_literal_clears_error() {
        let mut calc = with_display("Error");
        calc.insert_constant("pi");
        assert_eq!(calc.display(), "pi");
    }

    #[test]
    fn test_delete_last() {
        let mut calc = Calculator::new();
        calc.delete_last();
        assert_eq!(calc.display(), "");

        let mut calc = with_display("12");
        calc.delete_last();
        assert_eq!(calc.display(), "1");

        let mut calc = evaluated("6*7");
        calc.delete_last();
        assert_eq!(calc.display(), "4");
        assert_eq!(calc.append_mode(), AppendMode::Ready);
    }

    #[test]
    fn test_toggle_sign() {
        for text in ["", "0", "Error"] {
            let mut calc = with_display(text);
            calc.toggle_sign();
            assert_eq!(calc.display(), text);
        }

        let mut calc = with_display("5");
        calc.toggle_sign();
        assert_eq!(calc.display(), "-5");
        calc.toggle_sign();
        assert_eq!(calc.display(), "5");
    }

    #[test]
    fn test_toggle_sign_keeps_append_mode() {
        let mut calc = evaluated("2+3");
        calc.toggle_sign();
        assert_eq!(calc.display(), "-5");
        assert_eq!(calc.append_mode(), AppendMode::JustProduced);
    }

    #[test]
    fn test_insert_scientific_e() {
        let mut calc = Calculator::new();
        calc.insert_scientific_e();
        assert_eq!(calc.display(), "1e");

        let mut calc = with_display("3");
        calc.insert_scientific_e();
        assert_eq!(calc.display(), "3e");
        calc.insert_scientific_e();
        assert_eq!(calc.display(), "3e1e");

        let mut calc = with_display("(2)");
        calc.insert_scientific_e();
        assert_eq!(calc.display(), "(2)e");

        let mut calc = with_display("2.");
        calc.insert_scientific_e();
        assert_eq!(calc.display(), "2.e");

        let mut calc = with_display("Error");
        calc.insert_scientific_e();
        assert_eq!(calc.display(), "1e");
    }

    #[test]
    fn test_scientific_e_evaluates() {
        let mut calc = with_display("3");
        calc.insert_scientific_e();
        calc.append_digit(2);
        calc.evaluate();
        assert_eq!(calc.display(), "300");
    }

    #[test]
    fn test_evaluate_records_history() {
        let mut calc = Calculator::new();
        for (i, expression) in ["1+1", "2*5", "3**2", "10-6"].into_iter().enumerate() {
            let before = calc.history().len();
            calc.set_display(expression);
            calc.evaluate();
            assert_eq!(calc.history().get(0), Some(calc.answer()));
            assert_eq!(calc.history().len(), (before + 1).min(HISTORY_CAPACITY));
            assert_eq!(calc.history().len(), (i + 1).min(HISTORY_CAPACITY));
        }
        assert_eq!(calc.answer(), 4.0);
        assert_eq!(calc.history().iter().collect::<Vec<_>>(), vec![4.0, 9.0, 10.0]);
        assert_eq!(calc.history_labels(), ["4".to_string(), "9".to_string(), "10".to_string()]);
    }

    #[test]
    fn test_evaluate_failure_keeps_answer() {
        let mut calc = evaluated("6*7");
        calc.set_display("sqrt(-1)");
        calc.evaluate();
        assert_eq!(calc.display(), "Error");
        assert_eq!(calc.answer(), 42.0);
        assert_eq!(calc.history().len(), 1);
    }

    #[test]
    fn test_evaluate_blank_is_noop() {
        let mut calc = with_display("   ");
        calc.evaluate();
        assert_eq!(calc.display(), "   ");
        assert!(calc.history().is_empty());
    }

    #[test]
    fn test_evaluate_error_text_fails() {
        let mut calc = with_display("Error");
        calc.evaluate();
        assert_eq!(calc.display(), "Error");
        assert!(calc.history().is_empty());
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let mut calc = evaluated("6*7");
        calc.set_display(format!("{}1{}", "(".repeat(5_000), ")".repeat(5_000)));
        calc.evaluate();
        assert_eq!(calc.display(), "Error");
        assert_eq!(calc.answer(), 42.0);

        calc.set_display(format!("{}1", "-".repeat(200_000)));
        calc.evaluate();
        assert_eq!(calc.display(), "Error");

        calc.set_display(vec!["1"; 100_000].join("+"));
        calc.evaluate();
        assert_eq!(calc.display(), "Error");
        assert_eq!(calc.history().len(), 1);
    }

    #[test]
    fn test_moderate_nesting_evaluates() {
        let calc = evaluated(&format!("{}2{}", "(".repeat(100), ")".repeat(100)));
        assert_eq!(calc.display(), "2");

        let calc = evaluated(&format!("{}1", "-".repeat(100)));
        assert_eq!(calc.display(), "1");
    }

    #[test]
    fn test_answers_are_bound() {
        let mut calc = evaluated("10");
        calc.set_display("20");
        calc.evaluate();
        calc.set_display("ans+ans2");
        calc.evaluate();
        assert_eq!(calc.display(), "30");
        calc.set_display("ans1*ans3");
        calc.evaluate();
        assert_eq!(calc.display(), "300");
    }

    #[test]
    fn test_insert_history() {
        let mut calc = evaluated("1/4");
        calc.set_display("2");
        calc.evaluate();

        calc.set_display("");
        calc.insert_history(1);
        assert_eq!(calc.display(), "0.25");
        calc.insert_history(2);
        assert_eq!(calc.display(), "0.25");
        calc.append_operator(Operator::Plus);
        calc.insert_history(0);
        assert_eq!(calc.display(), "0.25+2");
    }

    #[test]
    fn test_history_labels_start_empty() {
        let calc = Calculator::new();
        assert_eq!(calc.history_labels(), [String::new(), String::new(), String::new()]);
    }

    #[test]
    fn test_angle_mode_affects_evaluation() {
        let mut calc = evaluated("sin(90)");
        assert_eq!(calc.display(), "1");
        assert_eq!(calc.angle_label(), "DEG");

        calc.toggle_angle_mode();
        assert_eq!(calc.angle_label(), "RAD");
        calc.set_display("sin(90)");
        calc.evaluate();
        assert_eq!(calc.display(), "0.8939966636");
    }

    #[test]
    fn test_insert_constant() {
        let mut calc = Calculator::new();
        calc.insert_constant("m_e");
        calc.append_operator(Operator::Multiply);
        calc.insert_constant("c");
        calc.insert_square();
        assert_eq!(calc.display(), "m_e*c**2");

        calc.insert_constant("bogus");
        assert_eq!(calc.display(), "m_e*c**2");
    }

    #[test]
    fn test_power_and_reciprocal_keys() {
        let mut calc = with_display("2");
        calc.insert_power();
        calc.append_digit(8);
        calc.evaluate();
        assert_eq!(calc.display(), "256");

        let mut calc = Calculator::new();
        calc.insert_reciprocal();
        calc.append_digit(8);
        calc.evaluate();
        assert_eq!(calc.display(), "0.125");
    }

    #[test]
    fn test_floor_divide_and_modulo_keys() {
        let mut calc = Calculator::new();
        calc.append_digit(7);
        calc.append_operator(Operator::FloorDivide);
        calc.append_digit(2);
        assert_eq!(calc.display(), "7//2");
        calc.evaluate();
        assert_eq!(calc.display(), "3");
        calc.append_operator(Operator::Modulo);
        calc.append_digit(2);
        calc.evaluate();
        assert_eq!(calc.display(), "1");
    }

    #[test]
    fn test_memory() {
        let mut calc = evaluated("2+3");
        calc.memory_add();
        calc.memory_add();
        assert_eq!(calc.memory(), 10.0);

        calc.set_display("2+");
        calc.memory_add();
        assert_eq!(calc.memory(), 10.0);

        calc.memory_recall();
        assert_eq!(calc.display(), "2+10");

        calc.memory_clear();
        assert_eq!(calc.memory(), 0.0);
        calc.set_display("Error");
        calc.memory_recall();
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn test_precision_setting() {
        let mut calc = Calculator::new().with_precision(4);
        calc.set_display("1/3");
        calc.evaluate();
        assert_eq!(calc.display(), "0.3333");
        assert_eq!(calc.history_labels()[0], "0.3333");
    }
}
