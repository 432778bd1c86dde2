/// Output surfaces for rendered frames
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
    tty::IsTty,
};
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// Something that can show frames of character rows
pub trait Display {
    /// Prepare the surface. Called once before the first frame.
    fn init(&mut self) -> io::Result<()>;

    /// Show one frame, replacing the previous one
    fn present(&mut self, rows: &[String]) -> io::Result<()>;

    /// Restore the surface. Called once after the last frame, even on error.
    fn teardown(&mut self) -> io::Result<()>;

    /// Whether the user asked to stop. Must not block.
    fn poll_quit(&mut self) -> io::Result<bool> {
        Ok(false)
    }
}

/// ANSI terminal display backed by crossterm.
///
/// When attached to a real terminal it switches to raw mode so `q`, `Esc`
/// and `Ctrl-C` can end the animation; the terminal is restored on
/// [`Display::teardown`] or, failing that, on drop.
pub struct TerminalDisplay<W: Write> {
    out: W,
    interactive: bool,
    clear_between_frames: bool,
    color: Option<Color>,
    active: bool,
}

impl TerminalDisplay<Stdout> {
    pub fn stdout(clear_between_frames: bool, color: Option<Color>) -> Self {
        let out = io::stdout();
        let interactive = out.is_tty();
        Self::new(out, interactive, clear_between_frames, color)
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, interactive: bool, clear_between_frames: bool, color: Option<Color>) -> Self {
        Self {
            out,
            interactive,
            clear_between_frames,
            color,
            active: false,
        }
    }

    pub fn into_inner(mut self) -> W
    where
        W: Default,
    {
        // Skip the restore in Drop; callers take over the writer
        self.active = false;
        std::mem::take(&mut self.out)
    }
}

impl<W: Write> Display for TerminalDisplay<W> {
    fn init(&mut self) -> io::Result<()> {
        if self.interactive {
            terminal::enable_raw_mode()?;
            queue!(self.out, terminal::EnterAlternateScreen)?;
        }
        self.active = true;
        queue!(self.out, cursor::Hide, terminal::Clear(ClearType::All))?;
        self.out.flush()
    }

    fn present(&mut self, rows: &[String]) -> io::Result<()> {
        if self.clear_between_frames {
            queue!(self.out, terminal::Clear(ClearType::All))?;
        }
        if let Some(color) = self.color {
            queue!(self.out, SetForegroundColor(color))?;
        }

        for (y, row) in rows.iter().enumerate() {
            let y = u16::try_from(y).unwrap_or(u16::MAX);
            queue!(self.out, cursor::MoveTo(0, y), Print(row))?;
        }

        if self.color.is_some() {
            queue!(self.out, ResetColor)?;
        }
        self.out.flush()
    }

    fn teardown(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        queue!(self.out, ResetColor, cursor::Show)?;
        if self.interactive {
            queue!(self.out, terminal::LeaveAlternateScreen)?;
            self.out.flush()?;
            terminal::disable_raw_mode()
        } else {
            self.out.flush()
        }
    }

    fn poll_quit(&mut self) -> io::Result<bool> {
        if !self.interactive {
            return Ok(false);
        }

        while event::poll(Duration::ZERO)? {
            if let Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(true)
                    }
                    _ => {}
                }
            }
        }
        Ok(false)
    }
}

impl<W: Write> Drop for TerminalDisplay<W> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.teardown();
        }
    }
}
