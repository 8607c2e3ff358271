use std::io;
use std::io::Write;

use crossterm::cursor;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;

/// How successive frames are laid out
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Mode {
    /// Redraw each frame over the previous one
    Animate,

    /// Print frames one after another, separated by a blank line
    Plain,
}

/// Writes rendered frames to `out`
pub struct Screen<W: Write> {
    out: W,
    mode: Mode,

    /// Number of lines taken by the last frame drawn, if any
    drawn: Option<u16>,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W, mode: Mode) -> Self {
        Self {
            out,
            mode,
            drawn: None,
        }
    }

    /// Draw a frame, as given by [`render`](crate::render::render)
    pub fn draw(&mut self, frame: &str) -> io::Result<()> {
        match self.mode {
            Mode::Animate => self.draw_over(frame)?,
            Mode::Plain => {
                writeln!(self.out)?;
                write!(self.out, "{frame}")?;
            }
        }

        self.out.flush()
    }

    fn draw_over(&mut self, frame: &str) -> io::Result<()> {
        if let Some(n) = self.drawn {
            queue!(self.out, cursor::MoveToPreviousLine(n))?;
        }

        let mut n: u16 = 0;

        // `\r\n` since raw mode doesn't return the cursor on `\n`, and `MoveToNextLine` doesn't
        // scroll when the cursor starts on the last row
        for line in frame.lines() {
            queue!(
                self.out,
                style::Print(line),
                terminal::Clear(terminal::ClearType::UntilNewLine),
                style::Print("\r\n")
            )?;

            n = n.saturating_add(1);
        }

        self.drawn = Some(n);

        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
