//! Terminal output.
//!
//! Whether output is colored is decided once per run and carried by the
//! [`Printer`] value handed to everything that prints. The bulleted status
//! lines are written through the crate's `info!`, `success!`, `warning!`
//! and `failure!` macros.

use std::fmt;

use colored::{Color, Colorize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Printer {
    colors: bool,
}

impl Printer {
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str, color: Color) -> String {
        if self.colors {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// `[o] message` style line for `level`.
    pub fn status_line(&self, level: Level, args: fmt::Arguments<'_>) -> String {
        let (symbol, color) = match level {
            Level::Info => ("o", Color::Blue),
            Level::Success => ("✓", Color::Green),
            Level::Warning => ("!", Color::Yellow),
            Level::Failure => ("!", Color::Red),
        };
        format!("[{}] {}", self.bold(symbol, color), args)
    }

    pub fn line(&self, level: Level, args: fmt::Arguments<'_>) {
        println!("{}", self.status_line(level, args));
    }

    /// `label: message`, the label in red. Used when the API turns a
    /// request down.
    pub fn rejection(&self, label: &str, message: &str) {
        println!("{}: {}", self.paint(label, Color::Red), message);
    }
}
