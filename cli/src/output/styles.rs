//! Output styles using owo-colors stylesheet pattern

use owo_colors::Style;

/// Centralized stylesheet for diagnostics.
#[derive(Default, Clone)]
pub struct Styles {
    /// Error prefix (bold red)
    pub error: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.error = Style::new().red().bold();
    }
}
