//! Terminal detection and styled output

use colored::{ColoredString, Colorize};
use std::io::IsTerminal;

/// How results are rendered for this invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    /// One JSON line per result, no spinners or prompts
    pub machine: bool,
    /// ANSI colors in human mode
    pub color: bool,
}

impl RenderContext {
    /// Machine mode when `--json` is given or stdout/stderr are not both terminals
    pub fn detect(json_output: bool, no_color: bool) -> Self {
        let interactive = std::io::stdout().is_terminal() && std::io::stderr().is_terminal();
        let context = Self::new(
            json_output || !interactive,
            interactive && !no_color && !json_output,
        );
        colored::control::set_override(context.color);
        context
    }

    pub fn new(machine: bool, color: bool) -> Self {
        Self { machine, color }
    }

    pub fn is_interactive(&self) -> bool {
        !self.machine
    }
}

/// Styling helpers; `colored` honours the override set by [`RenderContext::detect`]
pub struct Style;

impl Style {
    pub fn bold(text: &str) -> ColoredString {
        text.bold()
    }

    pub fn dim(text: &str) -> ColoredString {
        text.dimmed()
    }

    pub fn accent(text: &str) -> ColoredString {
        text.cyan()
    }

    pub fn count(text: &str) -> ColoredString {
        text.yellow()
    }

    pub fn success(text: &str) -> ColoredString {
        text.green().bold()
    }

    pub fn failure(text: &str) -> ColoredString {
        text.red().bold()
    }
}
