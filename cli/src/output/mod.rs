//! Operator-facing diagnostics on stderr.

pub mod styles;

use std::fmt::Display;
use std::io::{self, Write};

use console::Term;
use owo_colors::OwoColorize as _;
pub use styles::Styles;

/// Styling for diagnostics.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
}

impl OutputContext {
    /// Colors only when stderr is a terminal and `NO_COLOR` is unset.
    #[must_use]
    pub fn for_stderr() -> Self {
        let use_colors = Term::stderr().is_term() && std::env::var_os("NO_COLOR").is_none();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }
        Self { styles }
    }

    /// Uncolored context for non-terminal sinks.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            styles: Styles::default(),
        }
    }

    /// Write `Error: <msg>` with the prefix in the error style.
    ///
    /// # Errors
    ///
    /// Returns an error if `out` cannot be written.
    pub fn error(&self, out: &mut impl Write, msg: impl Display) -> io::Result<()> {
        writeln!(out, "{} {msg}", "Error:".style(self.styles.error))
    }
}
