use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::ResetColor,
    terminal::{Clear, ClearType},
};
use std::io::{self, BufWriter, Stdout, Write};

/// Output side of the playback loop.
pub trait Screen {
    /// Return to the top-left corner so the next frame overwrites the last one.
    fn clear(&mut self) -> io::Result<()>;

    fn present(&mut self, frame: &str) -> io::Result<()>;

    /// Called once before the first frame.
    fn enter(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Called once when playback returns, whether it stopped or failed.
    fn leave(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// ANSI terminal on any writer, stdout in practice.
pub struct TerminalScreen<W: Write> {
    out: W,
    hide_cursor: bool,
    cursor_hidden: bool,
}

impl TerminalScreen<BufWriter<Stdout>> {
    pub fn stdout(hide_cursor: bool) -> Self {
        Self::new(BufWriter::new(io::stdout()), hide_cursor)
    }
}

impl<W: Write> TerminalScreen<W> {
    pub fn new(out: W, hide_cursor: bool) -> Self {
        Self {
            out,
            hide_cursor,
            cursor_hidden: false,
        }
    }

    /// Wipe the whole screen and park the cursor at the top-left.
    pub fn reset(&mut self) -> io::Result<()> {
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))
    }

    pub fn notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{message}")?;
        self.out.flush()
    }
}

impl<W: Write> Screen for TerminalScreen<W> {
    fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, MoveTo(0, 0))?;
        self.out.flush()
    }

    fn present(&mut self, frame: &str) -> io::Result<()> {
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()
    }

    fn enter(&mut self) -> io::Result<()> {
        if self.hide_cursor {
            execute!(self.out, Hide)?;
            self.cursor_hidden = true;
        }
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor)?;
        if self.cursor_hidden {
            queue!(self.out, Show)?;
            self.cursor_hidden = false;
        }
        self.out.flush()
    }
}

impl<W: Write> Drop for TerminalScreen<W> {
    fn drop(&mut self) {
        if self.cursor_hidden {
            let _ = execute!(self.out, Show);
        }
    }
}

/// Writer whose bytes stay readable after the screen owning it is gone.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SharedOutput(std::rc::Rc<std::cell::RefCell<Vec<u8>>>);

#[cfg(test)]
impl SharedOutput {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

#[cfg(test)]
impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
