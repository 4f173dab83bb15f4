//! A scientific and physics calculator.
//!
//! The [`calculator`] module holds the core: a restricted expression evaluator,
//! `%g`-style number formatting, and the [`Calculator`](calculator::Calculator)
//! controller that models the keypad, recent answers, and memory. The [`ui`]
//! module drives the controller from a terminal.

pub mod calculator;
pub mod config;
pub mod ui;
