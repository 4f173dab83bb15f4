//! Memory register (M+, MR, MC).

/// A single accumulator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MemoryRegister {
    value: f64,
}

impl MemoryRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn add(&mut self, amount: f64) {
        self.value += amount;
    }

    /// Parse `text` as a number and add it.
    ///
    /// Returns `false` and leaves the register untouched when `text` is not a number.
    pub fn add_text(&mut self, text: &str) -> bool {
        match text.trim().parse::<f64>() {
            Ok(amount) => {
                self.add(amount);
                true
            }
            Err(_) => false,
        }
    }

    pub fn clear(&mut self) {
        self.value = 0.0;
    }
}
