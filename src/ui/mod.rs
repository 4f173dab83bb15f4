pub mod command;
pub mod terminal;

pub use command::{Command, CommandError};
pub use terminal::TerminalShell;
