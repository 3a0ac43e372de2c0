//! Markdown output for the terminal.
//!
//! Rich output goes through termimad; `--no-color` prints the markdown as is.

use std::fmt::Display;

use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output.
///
/// Every command builds its output as markdown and hands it to one
/// renderer, so `--no-color` affects all of them at once.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    /// Create a new terminal renderer.
    ///
    /// With `rich_enabled` false nothing is styled and the markdown is
    /// printed verbatim, which keeps output stable for scripts and tests.
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::DarkGrey);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Prints a markdown document.
    ///
    /// # Format
    ///
    /// In rich mode headers are printed in cyan with their leading hashes
    /// kept, and every other line goes through the termimad skin. Plain
    /// mode prints the input unchanged.
    pub fn render(&self, markdown: &str) {
        if !self.rich_enabled {
            print!("{markdown}");
            return;
        }
        for line in markdown.lines() {
            // Headers keep their hashes so nesting stays visible.
            if line.starts_with('#') {
                println!("\x1b[36m{line}\x1b[0m");
            } else {
                self.skin.print_inline(line);
                println!();
            }
        }
    }

    /// Prints anything whose `Display` output is markdown, such as the
    /// wrappers in `coachmark_core::display`.
    pub fn show(&self, item: &impl Display) {
        self.render(&item.to_string());
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
