//! # Display Management
//!
//! Cursor-addressed terminal output using crossterm.
//!
//! The screen is redrawn in full after every command: each line produced by
//! [`compose_screen`] goes to its own row, followed by the input prompt.

use crate::rendering::compose_screen;
use crate::{CrawlerResult, GameState};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::Write;

/// Terminal display manager for the game.
///
/// Generic over the writer so tests can render into a byte buffer.
pub struct TerminalDisplay<W: Write> {
    out: W,
    /// Whether the alternate screen is in use
    alternate_screen: bool,
}

impl TerminalDisplay<std::io::Stdout> {
    /// Takes over stdout, switching to the alternate screen.
    pub fn stdout() -> CrawlerResult<Self> {
        let mut display = Self::new(std::io::stdout());
        queue!(display.out, EnterAlternateScreen)?;
        display.alternate_screen = true;
        display.out.flush()?;
        Ok(display)
    }
}

impl<W: Write> TerminalDisplay<W> {
    /// Wraps an arbitrary writer without touching terminal modes.
    pub fn new(out: W) -> Self {
        Self {
            out,
            alternate_screen: false,
        }
    }

    /// Redraws the whole screen and leaves the cursor on the prompt line.
    ///
    /// `notice` is shown just above the prompt, e.g. why the last command was refused.
    pub fn render(&mut self, state: &GameState, notice: Option<&str>, prompt: &str) -> CrawlerResult<()> {
        let lines = compose_screen(state);
        let width = terminal::size().map(|(w, _)| w as usize).unwrap_or(120);

        queue!(self.out, Hide, MoveTo(0, 0), Clear(ClearType::All))?;
        for (row, line) in lines.iter().enumerate() {
            let text: String = line.chars().take(width).collect();
            queue!(self.out, MoveTo(0, row as u16), Print(text))?;
        }

        let notice_row = lines.len() as u16;
        if let Some(text) = notice {
            queue!(self.out, MoveTo(0, notice_row), Print(format!("! {}", text)))?;
        }

        queue!(self.out, MoveTo(0, notice_row + 1), Print(prompt), Show)?;
        self.out.flush()?;
        Ok(())
    }

    /// Leaves the alternate screen if this display entered it.
    pub fn restore(&mut self) -> CrawlerResult<()> {
        queue!(self.out, Show)?;
        if self.alternate_screen {
            queue!(self.out, LeaveAlternateScreen)?;
            self.alternate_screen = false;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Consumes the display, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
